use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::fetch::{brand_url, category_url, Fetch, FetchError};
use crate::parser::{extract_brands, extract_products, BrandRef};
use crate::settings::Settings;

/// What to do when a category lists no brands or a brand page lists no products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmptyPagePolicy {
    Skip,
    Warn,
    Fail,
}

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("category {0} lists no brands")]
    EmptyCategory(String),
    #[error("brand {brand} ({category}) lists no products")]
    EmptyBrand { brand: String, category: String },
}

/// Raw records of a whole run plus the pages that came back empty.
#[derive(Debug, Default)]
pub struct CrawlOutput {
    pub records: Vec<Vec<String>>,
    pub empty_categories: Vec<String>,
    pub empty_brands: Vec<String>,
}

/// Category pages first, then one page per brand, strictly one at a time.
/// The first fetch error ends the run and drops everything gathered so far.
pub fn crawl(fetcher: &impl Fetch, settings: &Settings) -> Result<CrawlOutput, CrawlError> {
    let mut out = CrawlOutput::default();
    let policy = settings.empty_page_policy;

    let mut brands: Vec<BrandRef> = Vec::new();
    for &terroir in &settings.categories {
        let url = category_url(&settings.base_url, terroir.code())?;
        let markup = fetcher.fetch(&url)?;
        let found = extract_brands(&markup, terroir);
        info!("{}: {} brands", terroir.code(), found.len());

        if found.is_empty() {
            on_empty(policy, CrawlError::EmptyCategory(terroir.code().to_string()))?;
            out.empty_categories.push(terroir.code().to_string());
        }
        brands.extend(found);
    }

    let pb = ProgressBar::new(brands.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    for brand in &brands {
        pb.set_message(brand.name.clone());
        let category = brand.terroir.code();
        let url = brand_url(&settings.base_url, category, &brand.name)?;
        let markup = fetcher.fetch(&url)?;
        let records = extract_products(&markup, &brand.name, brand.terroir);
        debug!("{} / {}: {} products", category, brand.name, records.len());

        if records.is_empty() {
            let err = CrawlError::EmptyBrand {
                brand: brand.name.clone(),
                category: category.to_string(),
            };
            if let Err(e) = on_empty(policy, err) {
                pb.abandon();
                return Err(e);
            }
            out.empty_brands.push(format!("{}/{}", category, brand.name));
        }
        out.records.extend(records);
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Crawled {} brands, {} records",
        brands.len(),
        out.records.len()
    );
    Ok(out)
}

fn on_empty(policy: EmptyPagePolicy, err: CrawlError) -> Result<(), CrawlError> {
    match policy {
        EmptyPagePolicy::Skip => {
            debug!("{}", err);
            Ok(())
        }
        EmptyPagePolicy::Warn => {
            warn!("{}", err);
            Ok(())
        }
        EmptyPagePolicy::Fail => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use reqwest::Url;

    use super::*;
    use crate::terroir::Terroir;

    const BASE: &str = "https://shop.test/cigares/";

    /// Serves canned pages and records every URL asked for.
    struct FakeFetcher {
        pages: HashMap<String, String>,
        seen: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn new(pages: &[(&str, String)]) -> Self {
            FakeFetcher {
                pages: pages
                    .iter()
                    .map(|(u, p)| (u.to_string(), p.clone()))
                    .collect(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Fetch for FakeFetcher {
        fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            self.seen.borrow_mut().push(url.to_string());
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    fn settings(categories: Vec<Terroir>, policy: EmptyPagePolicy) -> Settings {
        Settings {
            base_url: BASE.to_string(),
            categories,
            empty_page_policy: policy,
            ..Default::default()
        }
    }

    fn listing(brands: &[&str]) -> String {
        let anchors: String = brands
            .iter()
            .map(|b| format!("<a href=\"#\">«&nbsp;{}&nbsp;»</a>", b))
            .collect();
        format!(
            "<div class=\"flex_column_table av-equal-height-column-flextable -flextable\">{}</div>",
            anchors
        )
    }

    fn product(name: &str, price: &str) -> String {
        format!(
            "<div class=\"av-catalogue-item-inner\">\
             <div class=\"av-catalogue-title av-cart-update-title\">{}</div>\
             <span class=\"woocommerce-Price-amount amount\">{}€</span>\
             <span class=\"woocommerce-Price-amount amount\">100,00€</span>\
             <div class=\"av-catalogue-content\">Boîte de 25 - 1,5 cm - 12 cm</div></div>",
            name, price
        )
    }

    #[test]
    fn walks_categories_then_brands_in_order() {
        let fetcher = FakeFetcher::new(&[
            ("https://shop.test/cigares/cubains/", listing(&["Cohiba", "Partagas"])),
            ("https://shop.test/cigares/honduriens/", listing(&["Camacho"])),
            ("https://shop.test/cigares/cubains/Cohiba/", product("Robustos", "24,50")),
            ("https://shop.test/cigares/cubains/Partagas/", product("Serie D No. 4", "14,20")),
            ("https://shop.test/cigares/honduriens/Camacho/", product("Corojo", "8,30")),
        ]);
        let s = settings(vec![Terroir::Cubains, Terroir::Honduriens], EmptyPagePolicy::Fail);
        let out = crawl(&fetcher, &s).unwrap();

        assert_eq!(out.records.len(), 3);
        assert_eq!(
            out.records[0],
            vec!["Cohiba", "cubains", "Robustos", "24.50", "100.00", "25", "1.5", "12"]
        );
        assert_eq!(out.records[2][0], "Camacho");
        assert_eq!(out.records[2][1], "honduriens");

        let seen = fetcher.seen.borrow();
        assert_eq!(seen.len(), 5);
        assert!(seen[0].ends_with("/cubains/"));
        assert!(seen[1].ends_with("/honduriens/"));
        assert!(seen[2].ends_with("/cubains/Cohiba/"));
    }

    #[test]
    fn fetch_error_aborts_run() {
        let fetcher = FakeFetcher::new(&[
            ("https://shop.test/cigares/cubains/", listing(&["Cohiba", "Ghost"])),
            ("https://shop.test/cigares/cubains/Cohiba/", product("Robustos", "24,50")),
        ]);
        let s = settings(vec![Terroir::Cubains], EmptyPagePolicy::Warn);
        let err = crawl(&fetcher, &s).unwrap_err();
        assert!(matches!(err, CrawlError::Fetch(FetchError::Status { status: 404, .. })));
    }

    #[test]
    fn empty_pages_skipped_and_reported() {
        let fetcher = FakeFetcher::new(&[
            ("https://shop.test/cigares/cubains/", listing(&["Cohiba", "Vide"])),
            ("https://shop.test/cigares/dominicains/", "<p>bientôt</p>".to_string()),
            ("https://shop.test/cigares/cubains/Cohiba/", product("Robustos", "24,50")),
            ("https://shop.test/cigares/cubains/Vide/", "<p>aucun produit</p>".to_string()),
        ]);
        for policy in [EmptyPagePolicy::Skip, EmptyPagePolicy::Warn] {
            let s = settings(vec![Terroir::Cubains, Terroir::Dominicains], policy);
            let out = crawl(&fetcher, &s).unwrap();
            assert_eq!(out.records.len(), 1);
            assert_eq!(out.empty_categories, vec!["dominicains"]);
            assert_eq!(out.empty_brands, vec!["cubains/Vide"]);
        }
    }

    #[test]
    fn fail_policy_stops_on_empty_category() {
        let fetcher = FakeFetcher::new(&[(
            "https://shop.test/cigares/nicaraguayens/",
            "<p>bientôt</p>".to_string(),
        )]);
        let s = settings(vec![Terroir::Nicaraguayens], EmptyPagePolicy::Fail);
        let err = crawl(&fetcher, &s).unwrap_err();
        assert!(matches!(err, CrawlError::EmptyCategory(c) if c == "nicaraguayens"));
    }

    #[test]
    fn fail_policy_stops_on_empty_brand() {
        let fetcher = FakeFetcher::new(&[
            ("https://shop.test/cigares/cubains/", listing(&["Vide"])),
            ("https://shop.test/cigares/cubains/Vide/", String::new()),
        ]);
        let s = settings(vec![Terroir::Cubains], EmptyPagePolicy::Fail);
        let err = crawl(&fetcher, &s).unwrap_err();
        assert!(matches!(err, CrawlError::EmptyBrand { brand, .. } if brand == "Vide"));
    }
}
