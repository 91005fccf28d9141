use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::ScoringWeights;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub scoring: ScoringWeights,
    pub dataset: DatasetConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5002,
            request_timeout_secs: 30,
            enable_cors: false,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Where the charger statistics come from and which columns to keep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub sheet: String,
    pub region_column: String,
    pub count_column: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(
                "electric-vehicle-public-charging-infrastructure-statistics-january-2025.ods",
            ),
            sheet: "1a".to_string(),
            region_column: "Local authority / region name".to_string(),
            count_column: "Jan-25".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("model.bin"),
        }
    }
}

/// Flat weight variables recognised for compatibility with existing deployments.
const LEGACY_WEIGHT_VARS: [&str; 3] = ["COST_WEIGHT", "DEMAND_WEIGHT", "REGULATORY_WEIGHT"];

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self::figment().extract()?)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("EVCI__").split("__"))
            .merge(legacy_weights())
    }
}

fn legacy_weights() -> Env {
    Env::raw().only(&LEGACY_WEIGHT_VARS).map(|key| {
        let field = key.as_str().to_ascii_lowercase();
        format!("scoring.{}", field.trim_end_matches("_weight")).into()
    })
}
