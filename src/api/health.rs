use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: chrono::DateTime<chrono::Utc>,
    checks: HealthChecks,
}

/// Individual health checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    dataset: ComponentHealth,
    model: ComponentHealth,
}

/// Health status of a component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<usize>,
}

impl ComponentHealth {
    fn dataset(records: usize) -> Self {
        Self {
            status: if records > 0 { "loaded" } else { "empty" },
            records: Some(records),
        }
    }

    fn model(trained: bool) -> Self {
        Self {
            status: if trained { "trained" } else { "untrained" },
            records: None,
        }
    }
}

/// GET /health - Health check endpoint
///
/// The service is healthy whenever it can answer. An empty charger table or
/// an untrained model is reported but does not fail the check.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now(),
        checks: HealthChecks {
            dataset: ComponentHealth::dataset(state.chargers.len()),
            model: ComponentHealth::model(state.models.has_model().await),
        },
    };

    (StatusCode::OK, Json(response))
}
