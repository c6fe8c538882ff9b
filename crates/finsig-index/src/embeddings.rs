//! Embedding collaborator client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::IndexError;

/// Maximum number of texts per /embed call.
const BATCH_SIZE: usize = 64;

/// Produces one fixed-dimensionality vector per input text, in order.
///
/// The same model must serve both index time and query time; mixing models
/// makes cosine distances meaningless. That is an operational invariant,
/// not something this trait can check.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Embedding`] if the collaborator fails or
    /// returns a malformed response.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, IndexError>;
}

/// HTTP client for a TEI-style embedding service.
pub struct HttpEmbedder {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
}

impl HttpEmbedder {
    /// Create a new `HttpEmbedder` against `{base_url}/embed`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Embedding`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, IndexError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| IndexError::Embedding(format!("client build failed: {e}")))?;
        Ok(Self {
            client,
            url: format!("{base_url}/embed"),
        })
    }

    /// One `/embed` round-trip. The batch never exceeds [`BATCH_SIZE`].
    async fn embed_batch(&self, batch: &[&str]) -> Result<Vec<Vec<f32>>, IndexError> {
        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest { inputs: batch })
            .send()
            .await
            .map_err(|e| IndexError::Embedding(format!("embed request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IndexError::Embedding(format!(
                "embedding service returned status {status}"
            )));
        }

        let vectors: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| IndexError::Embedding(format!("embed response parse error: {e}")))?;

        if vectors.len() == batch.len() {
            Ok(vectors)
        } else {
            Err(IndexError::Embedding(format!(
                "embedding service returned {} vectors for {} inputs",
                vectors.len(),
                batch.len()
            )))
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    /// Generate embeddings for a batch of texts.
    ///
    /// Inputs are sent in groups of [`BATCH_SIZE`] (64) per request and the
    /// per-batch results are concatenated, so the output order matches the
    /// input order across batch boundaries.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, IndexError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(BATCH_SIZE) {
            vectors.append(&mut self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }
}
