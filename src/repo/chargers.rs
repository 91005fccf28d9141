//! Read-only charger table with pagination and threshold queries

use serde::Serialize;
use thiserror::Error;

use crate::domain::ChargerRecord;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const DEFAULT_THRESHOLD: i64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Threshold must be a positive integer.")]
    NegativeThreshold(i64),
}

/// One window of the charger table.
#[derive(Debug, Serialize)]
pub struct ChargerPage<'a> {
    pub total_records: usize,
    pub page: i64,
    pub per_page: i64,
    pub data: &'a [ChargerRecord],
}

/// Charger records in source order. Loaded once and never mutated, so it can
/// be shared across requests without locking.
#[derive(Debug, Clone, Default)]
pub struct ChargerTable {
    records: Vec<ChargerRecord>,
}

impl ChargerTable {
    pub fn new(records: Vec<ChargerRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ChargerRecord] {
        &self.records
    }

    /// Window of `per_page` records starting at `(page - 1) * per_page`.
    ///
    /// Pages are 1-indexed and never rejected. The bounds follow half-open
    /// slice semantics where a negative bound counts back from the end, so
    /// pages past the end are empty and page 0 selects nothing.
    pub fn page(&self, page: i64, per_page: i64) -> ChargerPage<'_> {
        let total = self.records.len();
        // i128 holds (page - 1) * per_page for any pair of i64 inputs
        let start = (i128::from(page) - 1) * i128::from(per_page);
        let end = start + i128::from(per_page);
        let (start, end) = (slice_bound(start, total), slice_bound(end, total));
        let data: &[ChargerRecord] = if start < end {
            &self.records[start..end]
        } else {
            &[]
        };

        ChargerPage {
            total_records: total,
            page,
            per_page,
            data,
        }
    }

    /// Records whose charger count is strictly below `threshold`.
    pub fn underserved(&self, threshold: i64) -> Result<Vec<&ChargerRecord>, QueryError> {
        if threshold < 0 {
            return Err(QueryError::NegativeThreshold(threshold));
        }
        let limit = threshold as f64;
        Ok(self.records.iter().filter(|r| r.is_below(limit)).collect())
    }
}

fn slice_bound(index: i128, len: usize) -> usize {
    let len_i = len as i128;
    let bound = if index < 0 {
        (index + len_i).max(0)
    } else {
        index.min(len_i)
    };
    usize::try_from(bound).unwrap_or(len)
}
