use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid chunking config: {0}")]
    InvalidChunking(String),

    #[error("risk weights must sum to 1.0, got {0}")]
    InvalidWeights(f64),
}
