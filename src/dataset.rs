use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::record::{assemble, Assembled, ProductRecord, COLUMNS};
use crate::terroir;

/// How records with the wrong field count are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Keep conforming records, hand back the rest.
    Flag,
    /// Lay every record out positionally: short ones are padded with missing
    /// values (columns shift), long ones fail the build.
    Parity,
}

#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("record {index} has {arity} fields, table has {expected} columns")]
    TooManyFields {
        index: usize,
        arity: usize,
        expected: usize,
    },
}

/// One typed row. `None` marks a value that could not be read as a number.
///
/// `cig_per_box` is a whole number in `Flag` builds; `Parity` builds keep
/// whatever number shifted into that column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CigarRow {
    pub brand: String,
    pub origin: String,
    pub name: String,
    pub unit_price_eur: Option<f64>,
    pub box_price_eur: Option<f64>,
    pub cig_per_box: Option<f64>,
    pub diameter_cm: Option<f64>,
    pub length_cm: Option<f64>,
}

impl CigarRow {
    fn from_record(r: ProductRecord, mode: BuildMode) -> Self {
        let cig_per_box = match mode {
            BuildMode::Flag => coerce_count(&r.cig_per_box).map(f64::from),
            BuildMode::Parity => coerce_number(&r.cig_per_box),
        };
        CigarRow {
            brand: r.brand,
            origin: r.origin,
            name: r.name,
            unit_price_eur: coerce_number(&r.unit_price),
            box_price_eur: coerce_number(&r.box_price),
            cig_per_box,
            diameter_cm: coerce_number(&r.diameter),
            length_cm: coerce_number(&r.length),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub rows: Vec<CigarRow>,
}

impl Dataset {
    pub fn new(rows: Vec<CigarRow>) -> Self {
        Dataset { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// Observed (min, max) of a numeric column, ignoring missing values.
    pub fn range_of(&self, column: impl Fn(&CigarRow) -> Option<f64>) -> Option<(f64, f64)> {
        self.rows
            .iter()
            .filter_map(column)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// A record the `Flag` build left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub index: usize,
    pub fields: Vec<String>,
    pub arity: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Build {
    pub dataset: Dataset,
    pub rejected: Vec<Rejected>,
}

/// Records → typed table with origins mapped to display names.
pub fn build(records: Vec<Vec<String>>, mode: BuildMode) -> Result<Build, DatasetError> {
    let total = records.len();
    let mut rows = Vec::with_capacity(total);
    let mut rejected = Vec::new();

    for (index, fields) in records.into_iter().enumerate() {
        match mode {
            BuildMode::Flag => match assemble(fields) {
                Assembled::Conforming(record) => rows.push(CigarRow::from_record(record, mode)),
                Assembled::Malformed { fields, arity } => {
                    debug!(index, arity, "rejecting record");
                    rejected.push(Rejected {
                        index,
                        fields,
                        arity,
                    });
                }
            },
            BuildMode::Parity => {
                let record = pad_positional(index, fields)?;
                rows.push(CigarRow::from_record(record, mode));
            }
        }
    }

    let mut dataset = Dataset::new(rows);
    map_origins(&mut dataset, &terroir::origin_lookup());

    info!(
        "Built dataset: {} rows, {} rejected ({} records in)",
        dataset.len(),
        rejected.len(),
        total
    );
    Ok(Build { dataset, rejected })
}

fn pad_positional(index: usize, fields: Vec<String>) -> Result<ProductRecord, DatasetError> {
    let arity = fields.len();
    if arity > COLUMNS.len() {
        return Err(DatasetError::TooManyFields {
            index,
            arity,
            expected: COLUMNS.len(),
        });
    }
    let mut it = fields.into_iter();
    let mut next = || it.next().unwrap_or_default();
    Ok(ProductRecord {
        brand: next(),
        origin: next(),
        name: next(),
        unit_price: next(),
        box_price: next(),
        cig_per_box: next(),
        diameter: next(),
        length: next(),
    })
}

/// Replace origin values found in `lookup`; anything else is left as is.
pub fn map_origins(dataset: &mut Dataset, lookup: &HashMap<String, String>) {
    for row in &mut dataset.rows {
        if let Some(name) = lookup.get(&row.origin) {
            row.origin = name.clone();
        }
    }
}

// ── Coercion ──

/// Text → number; anything unparseable or non-finite is missing.
pub fn coerce_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Box counts must be whole and non-negative.
pub fn coerce_count(text: &str) -> Option<u32> {
    coerce_number(text).and_then(whole_count)
}

fn whole_count(v: f64) -> Option<u32> {
    (v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64).then_some(v as u32)
}
