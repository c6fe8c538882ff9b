use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How the generation collaborator is driven.
///
/// Selected once at configuration time. `Simulated` produces deterministic
/// canned answers and never touches the network, so test environments pick
/// it explicitly rather than falling back on missing credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Live,
    Simulated,
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationMode::Live => write!(f, "live"),
            GenerationMode::Simulated => write!(f, "simulated"),
        }
    }
}

/// Component weights for the risk aggregator.
///
/// Expected to sum to 1.0; validated at load time, not re-checked during
/// each computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    pub sentiment: f64,
    pub frequency: f64,
    pub recency: f64,
    pub credibility: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            sentiment: 0.4,
            frequency: 0.3,
            recency: 0.2,
            credibility: 0.1,
        }
    }
}

impl RiskWeights {
    /// Check the weights sum to 1.0 within a 0.001 tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWeights`] with the actual sum otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sum = self.sentiment + self.frequency + self.recency + self.credibility;
        if (sum - 1.0).abs() > 0.001 {
            return Err(ConfigError::InvalidWeights(sum));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub embedding_url: String,
    pub generation_url: Option<String>,
    pub generation_mode: GenerationMode,
    pub request_timeout_secs: u64,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub risk_weights: RiskWeights,
    pub default_credibility: f64,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("embedding_url", &self.embedding_url)
            .field(
                "generation_url",
                &self.generation_url.as_ref().map(|_| "[redacted]"),
            )
            .field("generation_mode", &self.generation_mode)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("top_k", &self.top_k)
            .field("risk_weights", &self.risk_weights)
            .field("default_credibility", &self.default_credibility)
            .field("log_level", &self.log_level)
            .finish()
    }
}
