use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use thiserror::Error;
use tracing::info;

use crate::dataset::{coerce_number, CigarRow, Dataset};
use crate::record::COLUMNS;

const SHEET: &str = "cigars";

#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("writing spreadsheet: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
    #[error("reading spreadsheet: {0}")]
    Read(#[from] calamine::XlsxError),
    #[error("workbook has no sheets")]
    NoSheet,
    #[error("header row is missing column {0:?}")]
    MissingColumn(&'static str),
}

// ── Write ──

/// One sheet, header row = column names, no index column. Overwrites `path`.
pub fn save(dataset: &Dataset, path: &Path) -> Result<(), SpreadsheetError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET)?;

    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }

    for (i, row) in dataset.rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, row.brand.as_str())?;
        sheet.write_string(r, 1, row.origin.as_str())?;
        sheet.write_string(r, 2, row.name.as_str())?;
        let numbers = [
            row.unit_price_eur,
            row.box_price_eur,
            row.cig_per_box,
            row.diameter_cm,
            row.length_cm,
        ];
        // Missing values stay as empty cells.
        for (offset, value) in numbers.into_iter().enumerate() {
            if let Some(v) = value {
                sheet.write_number(r, 3 + offset as u16, v)?;
            }
        }
    }

    workbook.save(path)?;
    info!("Wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}

// ── Read ──

/// Read back the first sheet of a workbook laid out like [`save`] writes it.
/// Columns are found by header name; extra columns are ignored.
pub fn load(path: &Path) -> Result<Dataset, SpreadsheetError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoSheet)??;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();

    let mut index = [0usize; 8];
    for (slot, name) in index.iter_mut().zip(COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h == name)
            .ok_or(SpreadsheetError::MissingColumn(name))?;
    }
    let [brand, origin, name, unit, boxp, count, diam, len] = index;

    let data = rows
        .map(|cells| CigarRow {
            brand: text_cell(cells.get(brand)),
            origin: text_cell(cells.get(origin)),
            name: text_cell(cells.get(name)),
            unit_price_eur: number_cell(cells.get(unit)),
            box_price_eur: number_cell(cells.get(boxp)),
            cig_per_box: number_cell(cells.get(count)),
            diameter_cm: number_cell(cells.get(diam)),
            length_cm: number_cell(cells.get(len)),
        })
        .collect();

    let dataset = Dataset::new(data);
    info!("Loaded {} rows from {}", dataset.len(), path.display());
    Ok(dataset)
}

fn text_cell(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn number_cell(cell: Option<&Data>) -> Option<f64> {
    match cell? {
        Data::Float(f) => Some(*f).filter(|v| v.is_finite()),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => coerce_number(s),
        _ => None,
    }
}
