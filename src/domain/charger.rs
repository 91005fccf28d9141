use serde::{Deserialize, Serialize};

/// Public charging devices counted for one local authority or region.
///
/// Serialized with the column headings of the published statistics table so
/// clients see the same keys as the source spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargerRecord {
    #[serde(rename = "Local Authority")]
    pub region: String,
    /// `None` when the source cell was blank or not a number.
    #[serde(rename = "EV Chargers")]
    pub charger_count: Option<f64>,
}

impl ChargerRecord {
    pub fn new(region: impl Into<String>, charger_count: Option<f64>) -> Self {
        Self {
            region: region.into(),
            charger_count,
        }
    }

    /// Strict less-than comparison. A missing count never qualifies.
    pub fn is_below(&self, threshold: f64) -> bool {
        matches!(self.charger_count, Some(count) if count < threshold)
    }
}
