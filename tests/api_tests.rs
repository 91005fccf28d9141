//! HTTP-level tests driving the router in process.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use ev_charging_investment_api::api;
use ev_charging_investment_api::config::Config;
use ev_charging_investment_api::domain::{ChargerRecord, ScoringWeights};
use ev_charging_investment_api::ml::{ModelStore, ModelTrainer};
use ev_charging_investment_api::repo::ChargerTable;
use ev_charging_investment_api::state::AppState;

struct TestApp {
    router: Router,
    _dir: tempfile::TempDir,
}

fn sample_records() -> Vec<ChargerRecord> {
    let mut records: Vec<ChargerRecord> = (0..23)
        .map(|i| ChargerRecord::new(format!("Authority {i}"), Some(i as f64)))
        .collect();
    records.push(ChargerRecord::new("Isles of Scilly", None));
    records.push(ChargerRecord::new("Authority 0", Some(0.0)));
    records
}

fn app_with(weights: ScoringWeights) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = Config::default();
    cfg.scoring = weights;
    cfg.model.path = dir.path().join("model.bin");

    let state = AppState::from_parts(
        cfg.clone(),
        ChargerTable::new(sample_records()),
        ModelStore::new(cfg.model.path.clone(), ModelTrainer::default()),
    );
    TestApp {
        router: api::router(state, &cfg),
        _dir: dir,
    }
}

fn app() -> TestApp {
    app_with(ScoringWeights::default())
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

fn training_batch() -> Value {
    json!([
        {"cost": 0.5, "demand": 0.7, "regulatory": 0.3, "target": 1.0},
        {"cost": 0.6, "demand": 0.8, "regulatory": 0.4, "target": 1.2}
    ])
}

#[tokio::test]
async fn home_reports_running() {
    let app = app();
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "EV Charging Investment API is running");
}

#[tokio::test]
async fn chargers_default_pagination() {
    let app = app();
    let (status, body) = get(&app, "/chargers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 25);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 10);
    assert_eq!(data[0], json!({"Local Authority": "Authority 0", "EV Chargers": 0.0}));
}

#[tokio::test]
async fn chargers_last_and_out_of_range_pages() {
    let app = app();

    let (_, body) = get(&app, "/chargers?page=3&per_page=10").await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(data[3], json!({"Local Authority": "Isles of Scilly", "EV Chargers": null}));

    let (status, body) = get(&app, "/chargers?page=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 25);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn chargers_non_integer_parameters_use_defaults() {
    let app = app();
    let (status, body) = get(&app, "/chargers?page=abc&per_page=2.5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn chargers_negative_parameters_are_not_errors() {
    let app = app();

    // bounds -20..-10 select records 5..15
    let (status, body) = get(&app, "/chargers?page=-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], -1);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 10);
    assert_eq!(data[0]["Local Authority"], "Authority 5");

    let (status, body) = get(&app, "/chargers?per_page=-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["per_page"], -1);
    assert_eq!(body["data"].as_array().unwrap().len(), 24);
}

#[tokio::test]
async fn underserved_default_threshold() {
    let app = app();
    let (status, body) = get(&app, "/underserved").await;
    assert_eq!(status, StatusCode::OK);
    let data = body.as_array().unwrap();
    // counts 0..=4 plus the duplicate "Authority 0"; the missing count is excluded
    assert_eq!(data.len(), 6);
    assert!(data.iter().all(|r| r["EV Chargers"].as_f64().unwrap() < 5.0));
}

#[tokio::test]
async fn underserved_custom_and_zero_threshold() {
    let app = app();
    let (_, body) = get(&app, "/underserved?threshold=2").await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = get(&app, "/underserved?threshold=0").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn underserved_negative_threshold_is_client_error() {
    let app = app();
    let (status, body) = get(&app, "/underserved?threshold=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Threshold must be a positive integer.");
}

#[tokio::test]
async fn underserved_non_integer_threshold_uses_default() {
    let app = app();
    for uri in ["/underserved?threshold=abc", "/underserved?threshold=2.5"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body.as_array().unwrap().len(), 6, "{uri}");
    }
}

#[tokio::test]
async fn feasibility_defaults_and_weights() {
    let app = app();
    let (status, body) = post_json(&app, "/feasibility", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let score = body["feasibility_score"].as_f64().unwrap();
    assert!((score - 1.0).abs() < 1e-12);

    let (_, body) = post_json(
        &app,
        "/feasibility",
        json!({"cost": 0.5, "demand": 0.7, "regulatory": 0.3}),
    )
    .await;
    let score = body["feasibility_score"].as_f64().unwrap();
    assert!((score - 0.52).abs() < 1e-12);
}

#[tokio::test]
async fn feasibility_uses_configured_weights() {
    let app = app_with(ScoringWeights {
        cost: 1.0,
        demand: 2.0,
        regulatory: -1.0,
    });
    let (_, body) = post_json(&app, "/feasibility", json!({"cost": 3, "demand": 1})).await;
    assert_eq!(body["feasibility_score"].as_f64().unwrap(), 4.0);
}

#[tokio::test]
async fn feasibility_rejects_malformed_body() {
    let app = app();
    let request = Request::post("/feasibility")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&app, "/feasibility", json!({"cost": "cheap"})).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn predict_before_train_reports_model_unavailable() {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/predict",
        json!([{"cost": 0.5, "demand": 0.7, "regulatory": 0.3}]),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "ModelUnavailable");
    assert_eq!(body["message"], "Model not loaded");

    let (status, _) = get(&app, "/model").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn train_then_predict() {
    let app = app();
    let (status, body) = post_json(&app, "/train", training_batch()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Model trained and saved successfully.");
    assert_eq!(body["model"]["training_samples"], 2);
    assert_eq!(
        body["model"]["feature_names"],
        json!(["cost", "demand", "regulatory"])
    );

    let (status, body) = post_json(
        &app,
        "/predict",
        json!([
            {"cost": 0.5, "demand": 0.7, "regulatory": 0.3},
            {"regulatory": 0.4, "demand": 0.8, "cost": 0.6}
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let prediction: Vec<f64> = body["prediction"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(prediction.len(), 2);
    assert!((prediction[0] - 1.0).abs() < 1e-6);
    assert!((prediction[1] - 1.2).abs() < 1e-6);

    let (status, body) = get(&app, "/model").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["training_samples"], 2);
}

#[tokio::test]
async fn predict_with_wrong_features_is_server_error_with_message() {
    let app = app();
    post_json(&app, "/train", training_batch()).await;

    let (status, body) = post_json(&app, "/predict", json!([{"cost": 0.5}])).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "PredictionFailed");
    assert!(body["message"].as_str().unwrap().contains("expected features"));
}

#[tokio::test]
async fn train_rejects_invalid_batches() {
    let app = app();

    let (status, _) = post_json(&app, "/train", json!([])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &app,
        "/train",
        json!([
            {"cost": 0.5, "demand": 0.7, "target": 1.0},
            {"cost": 0.6, "supply": 0.8, "target": 1.2}
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("example 1"));

    let (status, _) = post_json(&app, "/train", json!([{"cost": 0.5}])).await;
    assert!(status.is_client_error());

    let (status, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_reports_components() {
    let app = app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["dataset"]["records"], 25);
    assert_eq!(body["checks"]["model"]["status"], "untrained");

    post_json(&app, "/train", training_batch()).await;
    let (_, body) = get(&app, "/health").await;
    assert_eq!(body["checks"]["model"]["status"], "trained");
}
