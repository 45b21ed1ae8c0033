pub mod brands;
pub mod products;
pub mod tokens;

use scraper::{ElementRef, Selector};

pub use brands::{extract_brands, BrandRef};
pub use products::extract_products;

/// Decorative guillemets the shop wraps names in.
const QUOTE_OPEN: &str = "«\u{a0}";
const QUOTE_CLOSE: &str = "\u{a0}»";

/// Selector matching `tag` elements carrying every class in `classes`,
/// whatever other classes they have and in any order.
fn class_selector(tag: &str, classes: &[&str]) -> Selector {
    let attrs: String = classes
        .iter()
        .map(|c| format!("[class~=\"{}\"]", c))
        .collect();
    Selector::parse(&format!("{}{}", tag, attrs)).unwrap()
}

/// Full text content of an element, all descendants concatenated.
fn element_text(el: ElementRef) -> String {
    el.text().collect()
}

fn strip_quotes(text: &str) -> String {
    text.replace(QUOTE_OPEN, "").replace(QUOTE_CLOSE, "").trim().to_string()
}
