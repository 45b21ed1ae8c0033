use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::tokens::{normalize_price, numeric_tokens};
use super::{class_selector, element_text, strip_quotes};
use crate::terroir::Terroir;

static ITEM: LazyLock<Selector> =
    LazyLock::new(|| class_selector("", &["av-catalogue-item-inner"]));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| class_selector("div", &["av-catalogue-title", "av-cart-update-title"]));
static PRICE: LazyLock<Selector> =
    LazyLock::new(|| class_selector("span", &["woocommerce-Price-amount", "amount"]));
static CONTENT: LazyLock<Selector> =
    LazyLock::new(|| class_selector("div", &["av-catalogue-content"]));

/// Raw field list per catalogue item:
/// `brand, category, title?, price*, numeric token*`.
///
/// Arity is whatever the markup yields. A typical item gives unit and box
/// price followed by box count, diameter and length, i.e. 8 fields.
pub fn extract_products(markup: &str, brand: &str, terroir: Terroir) -> Vec<Vec<String>> {
    let doc = Html::parse_document(markup);
    let mut records = Vec::new();

    for item in doc.select(&ITEM) {
        let mut fields = vec![brand.to_string(), terroir.code().to_string()];

        // First title only; items without one fall out as short records.
        if let Some(title) = item.select(&TITLE).next() {
            fields.push(strip_quotes(&element_text(title)));
        }

        fields.extend(
            item.select(&PRICE)
                .map(|span| normalize_price(&element_text(span))),
        );

        for content in item.select(&CONTENT) {
            fields.extend(numeric_tokens(&element_text(content)));
        }

        records.push(fields);
    }

    records
}
