//! Labeled investment data for offline model training.

use calamine::Data;
use std::collections::BTreeMap;
use std::path::Path;

use super::{cell_number, cell_text, column_index, read_sheet, DatasetError};
use crate::ml::TrainingExample;

const AUTHORITY: &str = "Local Authority";
const ROI: &str = "Projected ROI (%)";
const ADOPTION: &str = "EV Adoption Rate (%)";
const GROWTH: &str = "Projected EV Growth (%)";
const REGULATORY: &str = "Regulatory Complexity Score";
const FEASIBILITY: &str = "Investment Feasibility Score";
const CHARGERS: &str = "EV Chargers";

const REQUIRED: [&str; 7] = [AUTHORITY, ROI, ADOPTION, GROWTH, REGULATORY, FEASIBILITY, CHARGERS];

/// One local authority from the investment sheet, mapped onto model features.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentRow {
    pub authority: String,
    pub chargers: Option<f64>,
    pub example: TrainingExample,
}

/// Loads the investment sheet (headings on the first row) as training data.
///
/// ROI becomes `cost`, the mean of adoption rate and projected growth becomes
/// `demand`, and the complexity score becomes `regulatory`. The feasibility
/// score is the target.
pub fn load_training_examples(path: &Path, sheet: &str) -> Result<Vec<InvestmentRow>, DatasetError> {
    investment_rows(&read_sheet(path, sheet)?)
}

pub fn investment_rows(rows: &[Vec<Data>]) -> Result<Vec<InvestmentRow>, DatasetError> {
    let (header, records) = rows.split_first().ok_or(DatasetError::MissingHeader)?;

    let missing: Vec<String> = REQUIRED
        .iter()
        .filter(|name| column_index(header, name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns(missing));
    }
    let idx = |name: &str| column_index(header, name).unwrap_or_default();
    let (authority, roi, adoption, growth, regulatory, feasibility, chargers) = (
        idx(AUTHORITY),
        idx(ROI),
        idx(ADOPTION),
        idx(GROWTH),
        idx(REGULATORY),
        idx(FEASIBILITY),
        idx(CHARGERS),
    );

    records
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|(i, row)| {
            // header is row 1 of the sheet
            let line = i + 2;
            let number = |col: usize, name: &str| {
                row.get(col)
                    .and_then(cell_number)
                    .ok_or_else(|| DatasetError::NonNumeric {
                        row: line,
                        column: name.to_string(),
                    })
            };

            let demand = (number(adoption, ADOPTION)? + number(growth, GROWTH)?) / 2.0;
            let features = BTreeMap::from([
                ("cost".to_string(), number(roi, ROI)?),
                ("demand".to_string(), demand),
                ("regulatory".to_string(), number(regulatory, REGULATORY)?),
            ]);

            Ok(InvestmentRow {
                authority: row.get(authority).map(cell_text).unwrap_or_default(),
                chargers: row.get(chargers).and_then(cell_number),
                example: TrainingExample {
                    features,
                    target: number(feasibility, FEASIBILITY)?,
                },
            })
        })
        .collect()
}
