use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};

use super::ApiError;
use crate::repo::chargers::{DEFAULT_PAGE, DEFAULT_PER_PAGE, DEFAULT_THRESHOLD};
use crate::state::AppState;

/// Raw pagination parameters. Values that are not integers fall back to the
/// defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UnderservedQuery {
    pub threshold: Option<String>,
}

fn int_param(name: &str, raw: Option<&str>, default: i64) -> i64 {
    let Some(raw) = raw else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        debug!(param = name, value = raw, fallback = default, "ignoring non-integer query parameter");
        default
    })
}

/// GET /chargers - paginated charger counts per local authority
pub async fn list_chargers(
    State(st): State<AppState>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(q) = query?;
    let page = int_param("page", q.page.as_deref(), DEFAULT_PAGE);
    let per_page = int_param("per_page", q.per_page.as_deref(), DEFAULT_PER_PAGE);
    info!(page, per_page, "fetching charger availability");
    Ok(Json(st.chargers.page(page, per_page)).into_response())
}

/// GET /underserved - areas with fewer chargers than the threshold
pub async fn list_underserved(
    State(st): State<AppState>,
    query: Result<Query<UnderservedQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(q) = query?;
    let threshold = int_param("threshold", q.threshold.as_deref(), DEFAULT_THRESHOLD);
    info!(threshold, "fetching underserved areas");
    let underserved = st.chargers.underserved(threshold)?;
    Ok(Json(underserved).into_response())
}
