//! ML Model Training Pipeline
//!
//! Assembles labeled examples into a design matrix and fits ordinary least
//! squares with an intercept.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    models::LinearRegressionModel, ModelError, ModelMetadata, TrainingExample, ValidationMetrics,
};

/// Training Dataset
///
/// Rows are stored in the column order of `feature_names`, which is sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingDataset {
    pub feature_names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl TrainingDataset {
    /// Every example must carry the same set of feature names.
    pub fn from_examples(examples: &[TrainingExample]) -> Result<Self, ModelError> {
        let first = examples.first().ok_or_else(|| {
            ModelError::InvalidTrainingData("at least one training example is required".to_string())
        })?;
        let feature_names: Vec<String> = first.features.keys().cloned().collect();
        if feature_names.is_empty() {
            return Err(ModelError::InvalidTrainingData(
                "training examples carry no features besides the target".to_string(),
            ));
        }

        let mut rows = Vec::with_capacity(examples.len());
        let mut targets = Vec::with_capacity(examples.len());
        for (i, example) in examples.iter().enumerate() {
            if !example.features.keys().eq(feature_names.iter()) {
                return Err(ModelError::InvalidTrainingData(format!(
                    "example {} has features [{}], expected [{}]",
                    i,
                    join(example.features.keys()),
                    join(feature_names.iter()),
                )));
            }
            rows.push(example.features.values().copied().collect());
            targets.push(example.target);
        }

        Ok(Self {
            feature_names,
            rows,
            targets,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}

pub(crate) fn join<'a>(names: impl Iterator<Item = &'a String>) -> String {
    names.map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Training Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Singular values below this are treated as zero by the solver.
    pub singular_value_eps: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            singular_value_eps: 1e-10,
        }
    }
}

/// Model Trainer
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainingConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Least-squares fit with an intercept.
    ///
    /// Features and targets are centered before solving. With at least as many
    /// examples as features the system goes through an SVD. With fewer, the
    /// minimum-norm solution `Xᵀ (X Xᵀ)⁺ y` is used, which reproduces every
    /// training target.
    pub fn train_linear_regression(
        &self,
        dataset: &TrainingDataset,
    ) -> Result<LinearRegressionModel, ModelError> {
        if dataset.is_empty() {
            return Err(ModelError::InvalidTrainingData(
                "cannot train on an empty dataset".to_string(),
            ));
        }

        let (n, p) = (dataset.len(), dataset.n_features());
        let x = DMatrix::from_fn(n, p, |i, j| dataset.rows[i][j]);
        let y = DVector::from_column_slice(&dataset.targets);

        let x_mean: Vec<f64> = (0..p).map(|j| x.column(j).mean()).collect();
        let y_mean = y.mean();
        let x_centered = DMatrix::from_fn(n, p, |i, j| x[(i, j)] - x_mean[j]);
        let y_centered = y.map(|v| v - y_mean);

        let eps = self.config.singular_value_eps;
        let weights = if n < p {
            let gram = &x_centered * x_centered.transpose();
            let gram_inv = gram
                .pseudo_inverse(eps)
                .map_err(|e| ModelError::Fit(e.to_string()))?;
            x_centered.transpose() * gram_inv * &y_centered
        } else {
            x_centered
                .svd(true, true)
                .solve(&y_centered, eps)
                .map_err(|e| ModelError::Fit(e.to_string()))?
        };

        let coefficients: Vec<f64> = weights.iter().copied().collect();
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Fit("solver produced non-finite coefficients".to_string()));
        }
        let intercept = y_mean
            - x_mean
                .iter()
                .zip(&coefficients)
                .map(|(m, c)| m * c)
                .sum::<f64>();

        let predictions: Vec<f64> = dataset
            .rows
            .iter()
            .map(|row| LinearRegressionModel::apply(&coefficients, intercept, row))
            .collect();
        let metrics = ValidationMetrics::evaluate(&predictions, &dataset.targets)?;
        debug!(
            samples = n,
            features = p,
            r2 = metrics.r2,
            rmse = metrics.rmse,
            "linear regression fitted"
        );

        let metadata = ModelMetadata {
            model_id: uuid::Uuid::new_v4(),
            trained_at: chrono::Utc::now(),
            training_samples: n,
            feature_names: dataset.feature_names.clone(),
            validation_metrics: metrics,
        };

        Ok(LinearRegressionModel::new(coefficients, intercept, metadata))
    }
}
