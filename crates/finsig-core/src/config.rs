use crate::app_config::{AppConfig, GenerationMode, RiskWeights};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let embedding_url = require("FINSIG_EMBEDDING_URL")?;
    let generation_url = lookup("FINSIG_GENERATION_URL").ok();
    let generation_mode = parse_generation_mode(&or_default("FINSIG_GENERATION_MODE", "simulated"))?;

    // Live mode without an endpoint cannot work; catch it at load time.
    if generation_mode == GenerationMode::Live && generation_url.is_none() {
        return Err(ConfigError::MissingEnvVar("FINSIG_GENERATION_URL".to_string()));
    }

    let request_timeout_secs = parse_u64("FINSIG_REQUEST_TIMEOUT_SECS", "30")?;
    let chunk_size = parse_usize("FINSIG_CHUNK_SIZE", "1000")?;
    let chunk_overlap = parse_usize("FINSIG_CHUNK_OVERLAP", "200")?;
    let top_k = parse_usize("FINSIG_TOP_K", "4")?;

    if chunk_size == 0 {
        return Err(ConfigError::InvalidChunking("chunk_size must be > 0".to_string()));
    }
    if chunk_overlap >= chunk_size {
        return Err(ConfigError::InvalidChunking(format!(
            "overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }

    let risk_weights = RiskWeights {
        sentiment: parse_f64("FINSIG_WEIGHT_SENTIMENT", "0.4")?,
        frequency: parse_f64("FINSIG_WEIGHT_FREQUENCY", "0.3")?,
        recency: parse_f64("FINSIG_WEIGHT_RECENCY", "0.2")?,
        credibility: parse_f64("FINSIG_WEIGHT_CREDIBILITY", "0.1")?,
    };
    risk_weights.validate()?;

    let default_credibility = parse_f64("FINSIG_DEFAULT_CREDIBILITY", "0.5")?;
    let log_level = or_default("FINSIG_LOG_LEVEL", "info");

    Ok(AppConfig {
        embedding_url,
        generation_url,
        generation_mode,
        request_timeout_secs,
        chunk_size,
        chunk_overlap,
        top_k,
        risk_weights,
        default_credibility,
        log_level,
    })
}

/// Parse a string into a `GenerationMode` variant.
fn parse_generation_mode(s: &str) -> Result<GenerationMode, ConfigError> {
    match s {
        "live" => Ok(GenerationMode::Live),
        "simulated" => Ok(GenerationMode::Simulated),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FINSIG_GENERATION_MODE".to_string(),
            reason: format!("expected 'live' or 'simulated', got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid defaults.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("FINSIG_EMBEDDING_URL", "http://localhost:8080");
        m
    }

    #[test]
    fn parse_generation_mode_live() {
        assert_eq!(parse_generation_mode("live").unwrap(), GenerationMode::Live);
    }

    #[test]
    fn parse_generation_mode_simulated() {
        assert_eq!(
            parse_generation_mode("simulated").unwrap(),
            GenerationMode::Simulated
        );
    }

    #[test]
    fn parse_generation_mode_unknown_is_rejected() {
        let result = parse_generation_mode("auto");
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FINSIG_GENERATION_MODE"),
            "expected InvalidEnvVar(FINSIG_GENERATION_MODE), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_without_embedding_url() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "FINSIG_EMBEDDING_URL"),
            "expected MissingEnvVar(FINSIG_EMBEDDING_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_defaults() {
        let map = full_env();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.generation_mode, GenerationMode::Simulated);
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.chunk_size, 1000);
        assert_eq!(cfg.chunk_overlap, 200);
        assert_eq!(cfg.top_k, 4);
        assert_eq!(cfg.default_credibility, 0.5);
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.generation_url.is_none());
    }

    #[test]
    fn build_app_config_default_weights_sum_to_one() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.risk_weights.validate().is_ok());
        assert_eq!(cfg.risk_weights.sentiment, 0.4);
        assert_eq!(cfg.risk_weights.frequency, 0.3);
        assert_eq!(cfg.risk_weights.recency, 0.2);
        assert_eq!(cfg.risk_weights.credibility, 0.1);
    }

    #[test]
    fn build_app_config_rejects_overlap_not_smaller_than_chunk_size() {
        let mut map = full_env();
        map.insert("FINSIG_CHUNK_SIZE", "200");
        map.insert("FINSIG_CHUNK_OVERLAP", "200");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidChunking(_))),
            "expected InvalidChunking, got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_zero_chunk_size() {
        let mut map = full_env();
        map.insert("FINSIG_CHUNK_SIZE", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidChunking(_))),
            "expected InvalidChunking, got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_weights_not_summing_to_one() {
        let mut map = full_env();
        map.insert("FINSIG_WEIGHT_SENTIMENT", "0.9");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidWeights(_))),
            "expected InvalidWeights, got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_accepts_overridden_weights_summing_to_one() {
        let mut map = full_env();
        map.insert("FINSIG_WEIGHT_SENTIMENT", "0.25");
        map.insert("FINSIG_WEIGHT_FREQUENCY", "0.25");
        map.insert("FINSIG_WEIGHT_RECENCY", "0.25");
        map.insert("FINSIG_WEIGHT_CREDIBILITY", "0.25");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.risk_weights.sentiment, 0.25);
    }

    #[test]
    fn build_app_config_live_mode_requires_generation_url() {
        let mut map = full_env();
        map.insert("FINSIG_GENERATION_MODE", "live");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "FINSIG_GENERATION_URL"),
            "expected MissingEnvVar(FINSIG_GENERATION_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_live_mode_with_url_succeeds() {
        let mut map = full_env();
        map.insert("FINSIG_GENERATION_MODE", "live");
        map.insert("FINSIG_GENERATION_URL", "http://localhost:9090/chat");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.generation_mode, GenerationMode::Live);
        assert_eq!(cfg.generation_url.as_deref(), Some("http://localhost:9090/chat"));
    }

    #[test]
    fn build_app_config_invalid_timeout_is_rejected() {
        let mut map = full_env();
        map.insert("FINSIG_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FINSIG_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(FINSIG_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }
}
