use std::collections::BTreeMap;

use crate::dataset::{CigarRow, Dataset};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// `None` when no value is present.
    pub fn of(values: impl Iterator<Item = Option<f64>>) -> Option<Summary> {
        let present: Vec<f64> = values.flatten().collect();
        if present.is_empty() {
            return None;
        }
        let count = present.len();
        let sum: f64 = present.iter().sum();
        Some(Summary {
            count,
            mean: sum / count as f64,
            min: present.iter().copied().fold(f64::INFINITY, f64::min),
            max: present.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OriginStats {
    pub origin: String,
    pub rows: usize,
    pub unit_price: Option<Summary>,
    pub diameter: Option<Summary>,
    pub length: Option<Summary>,
}

/// Price and size statistics per origin, origins in alphabetical order.
pub fn by_origin(dataset: &Dataset) -> Vec<OriginStats> {
    let mut groups: BTreeMap<&str, Vec<&CigarRow>> = BTreeMap::new();
    for row in &dataset.rows {
        groups.entry(row.origin.as_str()).or_default().push(row);
    }

    groups
        .into_iter()
        .map(|(origin, rows)| OriginStats {
            origin: origin.to_string(),
            rows: rows.len(),
            unit_price: Summary::of(rows.iter().map(|r| r.unit_price_eur)),
            diameter: Summary::of(rows.iter().map(|r| r.diameter_cm)),
            length: Summary::of(rows.iter().map(|r| r.length_cm)),
        })
        .collect()
}

/// Brands ordered by mean unit price, most expensive first.
/// Brands with no known price are left out.
pub fn brands_by_price(dataset: &Dataset) -> Vec<(String, f64)> {
    let mut prices: BTreeMap<&str, Vec<Option<f64>>> = BTreeMap::new();
    for row in &dataset.rows {
        prices
            .entry(row.brand.as_str())
            .or_default()
            .push(row.unit_price_eur);
    }

    let mut ranked: Vec<(String, f64)> = prices
        .into_iter()
        .filter_map(|(brand, p)| Summary::of(p.into_iter()).map(|s| (brand.to_string(), s.mean)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

pub fn print(dataset: &Dataset, top: usize) {
    println!(
        "{:<16} | {:>5} | {:>24} | {:>24} | {:>24}",
        "Origin", "Rows", "Unit price (EUR)", "Diameter (cm)", "Length (cm)"
    );
    println!("{}", "-".repeat(105));
    for s in by_origin(dataset) {
        println!(
            "{:<16} | {:>5} | {:>24} | {:>24} | {:>24}",
            s.origin,
            s.rows,
            fmt_summary(s.unit_price),
            fmt_summary(s.diameter),
            fmt_summary(s.length)
        );
    }

    let ranked = brands_by_price(dataset);
    println!("\n{} most expensive brands:", top);
    for (brand, mean) in ranked.iter().take(top) {
        println!("  {:<28} {:>8.2}", brand, mean);
    }
    println!("\n{} least expensive brands:", top);
    for (brand, mean) in ranked.iter().rev().take(top) {
        println!("  {:<28} {:>8.2}", brand, mean);
    }
}

fn fmt_summary(s: Option<Summary>) -> String {
    match s {
        Some(s) => format!("{:.2} [{:.2}-{:.2}] n={}", s.mean, s.min, s.max, s.count),
        None => "-".to_string(),
    }
}
