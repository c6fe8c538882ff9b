use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("embedding dimension mismatch: index expects {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error(transparent)]
    Config(#[from] finsig_core::ConfigError),
}
