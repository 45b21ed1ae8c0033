use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{class_selector, element_text, strip_quotes};
use crate::terroir::Terroir;

static BRAND_TABLE: LazyLock<Selector> = LazyLock::new(|| {
    class_selector(
        "",
        &[
            "flex_column_table",
            "av-equal-height-column-flextable",
            "-flextable",
        ],
    )
});
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandRef {
    pub name: String,
    pub terroir: Terroir,
}

/// One `BrandRef` per anchor inside the brand tables, in document order.
/// Duplicates are kept.
pub fn extract_brands(markup: &str, terroir: Terroir) -> Vec<BrandRef> {
    let doc = Html::parse_document(markup);
    doc.select(&BRAND_TABLE)
        .flat_map(|table| table.select(&ANCHOR))
        .map(|a| BrandRef {
            name: strip_quotes(&element_text(a)),
            terroir,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/category_cubains.html").unwrap()
    }

    #[test]
    fn anchors_in_document_order() {
        let brands = extract_brands(&fixture(), Terroir::Cubains);
        let names: Vec<&str> = brands.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Cohiba", "Montecristo", "Partagas", "Romeo y Julieta", "Cohiba"]
        );
        assert!(brands.iter().all(|b| b.terroir == Terroir::Cubains));
    }

    #[test]
    fn ignores_anchors_outside_tables() {
        let brands = extract_brands(&fixture(), Terroir::Cubains);
        assert!(brands.iter().all(|b| b.name != "Accueil"));
    }

    #[test]
    fn n_anchors_give_n_refs() {
        let html = r#"<div class="flex_column_table av-equal-height-column-flextable -flextable">
            <a href="/a">«&nbsp;A&nbsp;»</a><a href="/b">B</a><span><a href="/c">C</a></span>
        </div>"#;
        let brands = extract_brands(html, Terroir::Honduriens);
        assert_eq!(brands.len(), 3);
        assert_eq!(brands[0].name, "A");
        assert_eq!(brands[2].name, "C");
    }

    #[test]
    fn no_tables_is_empty() {
        assert!(extract_brands("<html><body><a>x</a></body></html>", Terroir::Cubains).is_empty());
    }
}
