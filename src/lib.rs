//! EV Charging Investment API
//!
//! Serves regional public charger statistics, a weighted investment
//! feasibility score and a linear regression model trained on demand.

pub mod api;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod ml;
pub mod repo;
pub mod state;
pub mod telemetry;
