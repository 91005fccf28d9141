use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use super::ApiError;
use crate::domain::{feasibility_score, FeasibilityInput};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FeasibilityResponse {
    pub feasibility_score: f64,
}

/// POST /feasibility - weighted investment feasibility score
pub async fn calculate_feasibility(
    State(st): State<AppState>,
    body: Result<Json<FeasibilityInput>, JsonRejection>,
) -> Result<Json<FeasibilityResponse>, ApiError> {
    let Json(input) = body?;
    let score = feasibility_score(&input, &st.cfg.scoring);
    info!(
        cost = input.cost,
        demand = input.demand,
        regulatory = input.regulatory,
        score,
        "feasibility score calculated"
    );
    Ok(Json(FeasibilityResponse {
        feasibility_score: score,
    }))
}
