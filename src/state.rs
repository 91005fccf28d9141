use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::dataset;
use crate::ml::{ModelStore, ModelTrainer};
use crate::repo::ChargerTable;

/// Process-wide state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub chargers: Arc<ChargerTable>,
    pub models: Arc<ModelStore>,
}

impl AppState {
    /// Loads the charger table and opens the model slot named in `cfg`.
    ///
    /// The model itself is read lazily on first use.
    pub async fn new(cfg: Config) -> Result<Self> {
        let dataset_cfg = cfg.dataset.clone();
        let records =
            tokio::task::spawn_blocking(move || dataset::load_chargers(&dataset_cfg)).await?;
        let chargers = ChargerTable::new(records);

        info!(
            records = chargers.len(),
            cost_weight = cfg.scoring.cost,
            demand_weight = cfg.scoring.demand,
            regulatory_weight = cfg.scoring.regulatory,
            model_path = %cfg.model.path.display(),
            "application state initialised"
        );

        let models = ModelStore::new(cfg.model.path.clone(), ModelTrainer::default());
        Ok(Self::from_parts(cfg, chargers, models))
    }

    pub fn from_parts(cfg: Config, chargers: ChargerTable, models: ModelStore) -> Self {
        Self {
            cfg,
            chargers: Arc::new(chargers),
            models: Arc::new(models),
        }
    }
}
