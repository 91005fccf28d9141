use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use super::ApiError;
use crate::ml::{FeatureRow, ModelMetadata, TrainingExample};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub message: String,
    pub model: ModelMetadata,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: Vec<f64>,
}

/// POST /train - fit a new model and overwrite the model slot
pub async fn train(
    State(st): State<AppState>,
    body: Result<Json<Vec<TrainingExample>>, JsonRejection>,
) -> Result<Json<TrainResponse>, ApiError> {
    let Json(examples) = body?;
    info!(examples = examples.len(), "training request received");
    let model = st.models.train(&examples).await?;
    Ok(Json(TrainResponse {
        message: "Model trained and saved successfully.".to_string(),
        model: model.metadata.clone(),
    }))
}

/// POST /predict - apply the current model to each row
pub async fn predict(
    State(st): State<AppState>,
    body: Result<Json<Vec<FeatureRow>>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(rows) = body?;
    let prediction = st.models.predict(&rows).await?;
    info!(rows = rows.len(), "predictions served");
    Ok(Json(PredictResponse { prediction }))
}

/// GET /model - metadata of the current model
pub async fn model_info(State(st): State<AppState>) -> Result<Json<ModelMetadata>, ApiError> {
    let model = st.models.current().await?;
    Ok(Json(model.metadata.clone()))
}
