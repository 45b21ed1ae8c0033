use crate::dataset::{CigarRow, Dataset};
use crate::terroir;

/// Filter criteria. Unset bounds fall back to the observed range of the
/// dataset being queried; unset origins fall back to every known region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub diam_min: Option<f64>,
    pub diam_max: Option<f64>,
    pub len_min: Option<f64>,
    pub len_max: Option<f64>,
    pub origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: Option<f64>,
    max: Option<f64>,
}

impl Bounds {
    fn resolve(
        dataset: &Dataset,
        column: fn(&CigarRow) -> Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        let observed = dataset.range_of(column);
        Bounds {
            min: min.or(observed.map(|(lo, _)| lo)),
            max: max.or(observed.map(|(_, hi)| hi)),
        }
    }

    /// Missing values never pass.
    fn admits(&self, value: Option<f64>) -> bool {
        match (value, self.min, self.max) {
            (Some(v), Some(lo), Some(hi)) => lo <= v && v <= hi,
            _ => false,
        }
    }
}

/// Rows matching every criterion, in table order.
pub fn find(dataset: &Dataset, query: &FindQuery) -> Dataset {
    let price = Bounds::resolve(dataset, |r| r.unit_price_eur, query.price_min, query.price_max);
    let diam = Bounds::resolve(dataset, |r| r.diameter_cm, query.diam_min, query.diam_max);
    let len = Bounds::resolve(dataset, |r| r.length_cm, query.len_min, query.len_max);
    let origins = query
        .origins
        .clone()
        .unwrap_or_else(terroir::display_names);

    let rows = dataset
        .rows
        .iter()
        .filter(|r| {
            price.admits(r.unit_price_eur)
                && diam.admits(r.diameter_cm)
                && len.admits(r.length_cm)
                && origins.contains(&r.origin)
        })
        .cloned()
        .collect();

    Dataset::new(rows)
}
