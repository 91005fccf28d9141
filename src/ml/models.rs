//! Fitted regression model

use serde::{Deserialize, Serialize};

use super::{training::join, FeatureRow, ModelError, ModelMetadata};

/// Linear Regression Model
///
/// `coefficients[i]` belongs to `metadata.feature_names[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    pub metadata: ModelMetadata,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressionModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64, metadata: ModelMetadata) -> Self {
        Self {
            metadata,
            coefficients,
            intercept,
        }
    }

    pub fn feature_names(&self) -> &[String] {
        &self.metadata.feature_names
    }

    pub(crate) fn apply(coefficients: &[f64], intercept: f64, features: &[f64]) -> f64 {
        features
            .iter()
            .zip(coefficients)
            .map(|(f, c)| f * c)
            .sum::<f64>()
            + intercept
    }

    /// Predict one row. Its feature names must match the trained set exactly;
    /// key order is irrelevant.
    pub fn predict_row(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        if !row.keys().eq(self.feature_names().iter()) {
            return Err(ModelError::FeatureMismatch(format!(
                "expected features [{}], got [{}]",
                join(self.feature_names().iter()),
                join(row.keys()),
            )));
        }
        let features: Vec<f64> = row.values().copied().collect();
        Ok(Self::apply(&self.coefficients, self.intercept, &features))
    }

    /// Predict a batch; the first mismatching row fails the whole batch.
    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                self.predict_row(row).map_err(|e| match e {
                    ModelError::FeatureMismatch(msg) => {
                        ModelError::FeatureMismatch(format!("row {i}: {msg}"))
                    }
                    other => other,
                })
            })
            .collect()
    }
}
