pub mod app_config;
pub mod config;
pub mod cycle;
pub mod facilities;

pub use app_config::{
    AppConfig, DEFAULT_GEOCODER_COUNTRY, DEFAULT_GEOCODER_URL, DEFAULT_OVERPASS_ENDPOINTS,
    DEFAULT_SEARCH_RADIUS_METERS, DEFAULT_USER_AGENT,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use cycle::{
    analyze_cycle, CycleAnalysis, CycleError, Flow, PeriodEntry, RiskLevel, KNOWN_SYMPTOMS,
    MAX_PERIODS,
};
pub use facilities::{Coordinate, Facility};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
