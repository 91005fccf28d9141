//! Spreadsheet ingestion
//!
//! Reads the published charging infrastructure statistics (ODS, XLSX or XLS)
//! and normalizes them into [`ChargerRecord`]s. Sheets that do not have the
//! expected layout yield an empty table rather than an error, so the API can
//! still start and serve scoring and model requests.

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DatasetConfig;
use crate::domain::ChargerRecord;

pub mod training;

pub use training::{load_training_examples, InvestmentRow};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("sheet has no header row")]
    MissingHeader,

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: column '{column}' is not numeric")]
    NonNumeric { row: usize, column: String },
}

/// Reads every row of `sheet` as raw cells.
pub fn read_sheet(path: &Path, sheet: &str) -> Result<Vec<Vec<Data>>, DatasetError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range(sheet)?;
    debug!(path = %path.display(), sheet, rows = range.height(), "sheet read");
    Ok(range.rows().map(|row| row.to_vec()).collect())
}

/// Loads the charger table described by `cfg`.
///
/// Unreadable files and unexpected layouts are logged and produce an empty
/// table.
pub fn load_chargers(cfg: &DatasetConfig) -> Vec<ChargerRecord> {
    info!(path = %cfg.path.display(), sheet = %cfg.sheet, "loading charger dataset");
    let rows = match read_sheet(&cfg.path, &cfg.sheet) {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, "charger dataset unavailable, starting with an empty table");
            return Vec::new();
        }
    };
    chargers_from_rows(&rows, &cfg.region_column, &cfg.count_column)
}

/// Normalizes raw sheet rows into charger records.
///
/// The first row is the sheet title line; the rows after it are data rows.
/// With more than two data rows, the second data row holds the real column
/// headings and every row after it is a record.
pub fn chargers_from_rows(
    rows: &[Vec<Data>],
    region_column: &str,
    count_column: &str,
) -> Vec<ChargerRecord> {
    let data_rows = rows.get(1..).unwrap_or_default();
    if data_rows.len() <= 2 {
        warn!(
            rows = data_rows.len(),
            "dataset is empty or has an inconsistent structure"
        );
        return Vec::new();
    }

    let header = &data_rows[1];
    let (Some(region_idx), Some(count_idx)) = (
        column_index(header, region_column),
        column_index(header, count_column),
    ) else {
        warn!(
            region_column,
            count_column, "expected columns not found in header row"
        );
        return Vec::new();
    };

    let records: Vec<ChargerRecord> = data_rows[2..]
        .iter()
        .map(|row| ChargerRecord {
            region: row.get(region_idx).map(cell_text).unwrap_or_default(),
            charger_count: row.get(count_idx).and_then(cell_number),
        })
        .collect();

    info!(records = records.len(), "charger dataset processed");
    records
}

pub(crate) fn column_index(header: &[Data], name: &str) -> Option<usize> {
    header.iter().position(|cell| cell_text(cell) == name)
}

pub(crate) fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Numeric coercion: text is parsed, anything else non-numeric is missing.
pub(crate) fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| !v.is_nan())
}
