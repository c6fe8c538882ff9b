//! Generation collaborator client with an explicit simulated mode.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RetrievalError;

/// Response from a generation call that may carry structured output.
///
/// A response that parses as JSON (after stripping markdown code fences)
/// becomes `Parsed`; anything else stays `Raw`. Callers pattern-match on
/// the tag instead of probing the payload shape.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutput {
    Parsed(serde_json::Value),
    Raw(String),
}

enum Backend {
    Live { client: reqwest::Client, url: String },
    Simulated,
}

/// Client for the external text-generation service.
///
/// The mode is fixed at construction: `simulated` produces deterministic
/// canned answers with no network access, so tests and offline environments
/// select it explicitly rather than discovering missing credentials at call
/// time.
pub struct GenerationClient {
    backend: Backend,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    result: String,
}

impl GenerationClient {
    /// Create a client that calls the configured chat endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Generation`] if the HTTP client cannot be
    /// built.
    pub fn live(url: &str, timeout_secs: u64) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RetrievalError::Generation(format!("client build failed: {e}")))?;
        Ok(Self {
            backend: Backend::Live {
                client,
                url: url.to_string(),
            },
        })
    }

    /// Create a client that answers deterministically without the network.
    #[must_use]
    pub fn simulated() -> Self {
        Self {
            backend: Backend::Simulated,
        }
    }

    #[must_use]
    pub fn is_simulated(&self) -> bool {
        matches!(self.backend, Backend::Simulated)
    }

    /// Generate text for a prompt.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Generation`] on a failed request, a
    /// non-success status, or a malformed response body. Simulated mode
    /// never fails.
    pub async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, RetrievalError> {
        match &self.backend {
            Backend::Simulated => Ok(simulated_response(prompt)),
            Backend::Live { client, url } => {
                let request = GenerateRequest {
                    prompt,
                    max_tokens,
                    temperature,
                };
                let response = client
                    .post(url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| {
                        RetrievalError::Generation(format!("generation request failed: {e}"))
                    })?;

                if !response.status().is_success() {
                    return Err(RetrievalError::Generation(format!(
                        "generation service returned status {}",
                        response.status()
                    )));
                }

                let body: GenerateResponse = response.json().await.map_err(|e| {
                    RetrievalError::Generation(format!("generation response parse error: {e}"))
                })?;
                Ok(body.result)
            }
        }
    }

    /// Generate and classify the output as structured or raw text.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`GenerationClient::generate`].
    pub async fn generate_structured(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<GenerationOutput, RetrievalError> {
        let response = self.generate(prompt, max_tokens, temperature).await?;
        Ok(classify_output(&response))
    }
}

/// Classify a generation response as parsed JSON or raw text.
///
/// Markdown code fences are stripped first; some models wrap JSON in them.
#[must_use]
pub fn classify_output(response: &str) -> GenerationOutput {
    let cleaned = response
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string();
    if cleaned.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&cleaned) {
            return GenerationOutput::Parsed(value);
        }
    }
    GenerationOutput::Raw(response.to_string())
}

/// Deterministic canned output keyed on prompt content.
fn simulated_response(prompt: &str) -> String {
    let lowered = prompt.to_lowercase();
    if lowered.contains("risk") {
        serde_json::json!({
            "risk_level": "MEDIUM",
            "risk_score": 55,
            "key_risks": [
                "Market volatility concerns",
                "Supply chain disruptions",
                "Regulatory uncertainty"
            ]
        })
        .to_string()
    } else if lowered.contains("metric") {
        serde_json::json!({
            "revenue": {"value": "$10.5B", "change": "+12%", "period": "Q4 2024"},
            "profit": {"value": "$2.1B", "change": "+8%", "period": "Q4 2024"},
            "eps": {"value": "$3.45", "change": "+10%"}
        })
        .to_string()
    } else {
        "This is a simulated response. The company showed strong performance with revenue growth of 12% YoY.".to_string()
    }
}
