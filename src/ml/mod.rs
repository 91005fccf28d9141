//! Regression Model Service
//!
//! Trains a linear regression on ad-hoc labeled records, keeps the most
//! recent model in a single on-disk slot and serves predictions from it.
//!
//! # Architecture
//! - [`training`]: dataset assembly and the least-squares fit
//! - [`models`]: the fitted model and its prediction rule
//! - [`store`]: the model slot (persistence, lazy reload, single writer)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub mod models;
pub mod store;
pub mod training;

pub use models::LinearRegressionModel;
pub use store::ModelStore;
pub use training::{ModelTrainer, TrainingConfig, TrainingDataset};

/// Named numeric inputs for one prediction.
pub type FeatureRow = BTreeMap<String, f64>;

/// One labeled record: a flat JSON object holding `target` plus features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    #[serde(flatten)]
    pub features: FeatureRow,
    pub target: f64,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model not loaded")]
    NotLoaded,

    #[error("invalid training data: {0}")]
    InvalidTrainingData(String),

    #[error("feature mismatch: {0}")]
    FeatureMismatch(String),

    #[error("model fit failed: {0}")]
    Fit(String),

    #[error("model slot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("model serialization failed: {0}")]
    Serialization(#[from] bincode::Error),
}

/// ML Model Metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: uuid::Uuid,
    pub trained_at: chrono::DateTime<chrono::Utc>,
    pub training_samples: usize,
    pub feature_names: Vec<String>,
    pub validation_metrics: ValidationMetrics,
}

/// Goodness of fit, measured on the training data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub mae: f64,  // Mean Absolute Error
    pub rmse: f64, // Root Mean Square Error
    pub mape: f64, // Mean Absolute Percentage Error
    pub r2: f64,   // R-squared
}

impl ValidationMetrics {
    /// Compare predictions with the targets they should reproduce.
    pub fn evaluate(predictions: &[f64], targets: &[f64]) -> Result<Self, ModelError> {
        if predictions.len() != targets.len() {
            return Err(ModelError::Fit(format!(
                "{} predictions for {} targets",
                predictions.len(),
                targets.len()
            )));
        }
        if predictions.is_empty() {
            return Err(ModelError::Fit("no predictions to evaluate".to_string()));
        }

        let n = predictions.len() as f64;
        let residuals = || predictions.iter().zip(targets);

        let mae = residuals().map(|(p, t)| (p - t).abs()).sum::<f64>() / n;
        let mse = residuals().map(|(p, t)| (p - t).powi(2)).sum::<f64>() / n;

        // zero targets are left out of the percentage error
        let mape = residuals()
            .filter(|(_, t)| t.abs() > 1e-10)
            .map(|(p, t)| ((p - t) / t).abs() * 100.0)
            .sum::<f64>()
            / n;

        let mean_target = targets.iter().sum::<f64>() / n;
        let ss_tot: f64 = targets.iter().map(|t| (t - mean_target).powi(2)).sum();
        let ss_res = mse * n;
        let r2 = if ss_tot.abs() < 1e-10 {
            if ss_res.abs() < 1e-10 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        };

        Ok(Self {
            mae,
            rmse: mse.sqrt(),
            mape,
            r2,
        })
    }
}
