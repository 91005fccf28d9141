use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Used when `RUST_LOG` is unset or unparsable. Spreadsheet parsing is noisy
/// below warn.
pub const DEFAULT_FILTER: &str =
    "info,ev_charging_investment_api=info,calamine=warn,hyper=warn,tower_http=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// One structured record of the settings the service starts with.
pub fn log_startup(cfg: &Config) {
    info!(
        service = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        host = %cfg.server.host,
        port = cfg.server.port,
        request_timeout_secs = cfg.server.request_timeout_secs,
        cors = cfg.server.enable_cors,
        dataset = %cfg.dataset.path.display(),
        sheet = %cfg.dataset.sheet,
        model_path = %cfg.model.path.display(),
        "configuration loaded"
    );
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! { _ = ctrl_c => {}, _ = terminate => {}, }
    info!("shutdown signal received");
}
