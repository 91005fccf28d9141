//! Offline feasibility report.
//!
//! Trains the regression model from the synthetic investment sheet, stores it
//! in the model slot, reloads it and prints, per local authority, the model
//! prediction next to the charger count, the weighted feasibility score and
//! whether the area is underserved.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use ev_charging_investment_api::config::Config;
use ev_charging_investment_api::dataset::load_training_examples;
use ev_charging_investment_api::domain::{feasibility_score, FeasibilityInput};
use ev_charging_investment_api::ml::{FeatureRow, ModelStore, ModelTrainer, TrainingExample};
use ev_charging_investment_api::telemetry::init_tracing;

#[derive(Debug, Parser)]
#[command(
    name = "feasibility-report",
    about = "Train on the investment sheet and report per-authority scores"
)]
struct Args {
    /// Spreadsheet with the synthetic investment data
    #[arg(long, default_value = "Synthetic-data.ods")]
    data: PathBuf,

    /// Sheet to read
    #[arg(long, default_value = "Sheet1")]
    sheet: String,

    /// Charger count below which an area is underserved
    #[arg(long, default_value_t = 5)]
    threshold: i64,

    /// Model slot to write; defaults to the configured model path
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Number of rows to print (0 prints all)
    #[arg(long, default_value_t = 5)]
    rows: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let cfg = Config::load()?;

    let rows = load_training_examples(&args.data, &args.sheet)
        .with_context(|| format!("reading {}", args.data.display()))?;
    let examples: Vec<TrainingExample> = rows.iter().map(|r| r.example.clone()).collect();
    info!(examples = examples.len(), "investment data loaded");

    let store = ModelStore::new(
        args.model_path.unwrap_or(cfg.model.path),
        ModelTrainer::default(),
    );
    let trained = store.train(&examples).await?;
    info!(
        r2 = trained.metadata.validation_metrics.r2,
        rmse = trained.metadata.validation_metrics.rmse,
        "model trained and saved"
    );

    let model = store
        .load()
        .await?
        .context("model slot is empty after training")?;

    let features: Vec<FeatureRow> = examples.iter().map(|e| e.features.clone()).collect();
    let predictions = model.predict(&features)?;

    let limit = if args.rows == 0 { rows.len() } else { args.rows };
    println!(
        "{:<32} {:>12} {:>10} {:>12} {:>12}",
        "Local Authority", "Prediction", "Chargers", "Feasibility", "Underserved"
    );
    for (row, prediction) in rows.iter().zip(&predictions).take(limit) {
        let feature = |name: &str| row.example.features.get(name).copied().unwrap_or(1.0);
        let input = FeasibilityInput {
            cost: feature("cost"),
            demand: feature("demand"),
            regulatory: feature("regulatory"),
        };
        let chargers = row
            .chargers
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let underserved = row.chargers.is_some_and(|c| c < args.threshold as f64);

        println!(
            "{:<32} {:>12.4} {:>10} {:>12.4} {:>12}",
            row.authority,
            prediction,
            chargers,
            feasibility_score(&input, &cfg.scoring),
            underserved
        );
    }

    Ok(())
}
