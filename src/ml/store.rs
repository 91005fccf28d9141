//! Model slot
//!
//! The slot holds the most recently trained model. It is persisted as a single
//! bincode file and cached in memory once loaded. Training takes the write
//! lock for the whole fit-persist-swap sequence, so concurrent retrains are
//! serialized and readers keep the previous model until the new one is on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{
    FeatureRow, LinearRegressionModel, ModelError, ModelTrainer, TrainingDataset,
    TrainingExample,
};

pub struct ModelStore {
    path: PathBuf,
    trainer: ModelTrainer,
    slot: RwLock<Option<Arc<LinearRegressionModel>>>,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>, trainer: ModelTrainer) -> Self {
        Self {
            path: path.into(),
            trainer,
            slot: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fit a new model, persist it and make it current.
    ///
    /// On any failure the previous model, if there was one, stays in place.
    pub async fn train(
        &self,
        examples: &[TrainingExample],
    ) -> Result<Arc<LinearRegressionModel>, ModelError> {
        let dataset = TrainingDataset::from_examples(examples)?;

        let mut slot = self.slot.write().await;
        let trainer = self.trainer.clone();
        let model = tokio::task::spawn_blocking(move || trainer.train_linear_regression(&dataset))
            .await
            .map_err(|e| ModelError::Fit(format!("training task failed: {e}")))??;
        self.persist(&model).await?;

        let model = Arc::new(model);
        *slot = Some(Arc::clone(&model));
        info!(
            model_id = %model.metadata.model_id,
            samples = model.metadata.training_samples,
            r2 = model.metadata.validation_metrics.r2,
            path = %self.path.display(),
            "model trained and saved"
        );
        Ok(model)
    }

    /// Read the persisted model. `None` when nothing has been trained yet.
    pub async fn load(&self) -> Result<Option<LinearRegressionModel>, ModelError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "model file not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Some(bincode::deserialize(&bytes)?))
    }

    /// The current model, loading it from disk on first use after a restart.
    pub async fn current(&self) -> Result<Arc<LinearRegressionModel>, ModelError> {
        {
            let slot = self.slot.read().await;
            if let Some(model) = slot.as_ref() {
                return Ok(Arc::clone(model));
            }
        }

        let mut slot = self.slot.write().await;
        // a concurrent caller may have filled the slot meanwhile
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }
        let model = match self.load().await? {
            Some(model) => Arc::new(model),
            None => {
                warn!(path = %self.path.display(), "prediction requested before any model was trained");
                return Err(ModelError::NotLoaded);
            }
        };
        info!(model_id = %model.metadata.model_id, "model loaded from disk");
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    pub async fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        self.current().await?.predict(rows)
    }

    /// Whether a model is cached or present on disk, without loading it.
    pub async fn has_model(&self) -> bool {
        if self.slot.read().await.is_some() {
            return true;
        }
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn persist(&self, model: &LinearRegressionModel) -> Result<(), ModelError> {
        let bytes = bincode::serialize(model)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
