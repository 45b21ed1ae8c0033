use std::sync::LazyLock;

use regex::Regex;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d*\.\d+|\d+").unwrap());

/// Every numeric literal in `text`, left to right, after `,` → `.`.
///
/// Tokens carry no meaning of their own: which one is a box count and which
/// a length is decided by the caller's positional assumption.
pub fn numeric_tokens(text: &str) -> Vec<String> {
    let text = text.replace(',', ".");
    NUMBER_RE
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// `"12,50 €"` → `"12.50"`. Still text; coercion happens in the dataset builder.
pub fn normalize_price(text: &str) -> String {
    text.replace('€', "").trim().replace(',', ".")
}
