//! Shared configuration for the FINSIG document-intelligence pipeline.
//!
//! Holds the application config loaded from environment variables and the
//! validation that must reject bad chunking parameters and risk weights
//! before any processing starts.

pub mod app_config;
pub mod config;
pub mod error;

pub use app_config::{AppConfig, GenerationMode, RiskWeights};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
