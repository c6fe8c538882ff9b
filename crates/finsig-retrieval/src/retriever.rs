//! Query orchestration: embed, search, assemble context, generate.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::timeout;

use finsig_index::{Embedder, SearchFilter, SearchHit, VectorIndex};

use crate::error::RetrievalError;
use crate::generation::GenerationClient;
use crate::prompts;

/// Answer returned when the search produced no matches. A normal outcome,
/// not an error.
pub const NO_MATCH_ANSWER: &str = "No relevant information found.";

/// Character budget for source previews.
const PREVIEW_CHARS: usize = 200;

/// Output token budget for answer generation.
const ANSWER_MAX_TOKENS: u32 = 500;

const ANSWER_TEMPERATURE: f32 = 0.7;

/// One retrieved source backing an answer.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRef {
    pub chunk_id: usize,
    pub document_id: i64,
    /// Similarity of this chunk to the query, in [0,1].
    pub relevance: f32,
    /// First 200 characters of the chunk, with `...` when truncated.
    pub preview: String,
}

/// Result of one query. Transient; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalResult {
    pub answer: String,
    pub context: String,
    pub sources: Vec<SourceRef>,
    /// `1 - best match distance`, clamped to [0,1]. Absent when there were
    /// no matches or the pipeline degraded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl RetrievalResult {
    fn no_match() -> Self {
        Self {
            answer: NO_MATCH_ANSWER.to_string(),
            context: String::new(),
            sources: Vec::new(),
            confidence: None,
        }
    }

    fn degraded(error: &RetrievalError) -> Self {
        Self {
            answer: format!("Error processing query: {error}"),
            context: String::new(),
            sources: Vec::new(),
            confidence: None,
        }
    }
}

/// Retrieval pipeline over a shared embedder, index, and generation client.
///
/// All three collaborators are process-wide and read-mostly; the retriever
/// itself holds no per-query state.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    generator: GenerationClient,
    default_top_k: usize,
    call_timeout: Duration,
}

impl Retriever {
    #[must_use]
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        generator: GenerationClient,
        default_top_k: usize,
        call_timeout: Duration,
    ) -> Self {
        Self {
            embedder,
            index,
            generator,
            default_top_k,
            call_timeout,
        }
    }

    /// Answer a question from indexed document chunks.
    ///
    /// Zero matches yield the [`NO_MATCH_ANSWER`] result. Any failure or
    /// timeout in embedding, search, or generation degrades to a result
    /// whose answer describes the failure; this method never returns an
    /// error.
    pub async fn query(
        &self,
        question: &str,
        document_id: Option<i64>,
        top_k: Option<usize>,
    ) -> RetrievalResult {
        match self.run_query(question, document_id, top_k).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "query degraded to explanatory answer");
                RetrievalResult::degraded(&e)
            }
        }
    }

    async fn run_query(
        &self,
        question: &str,
        document_id: Option<i64>,
        top_k: Option<usize>,
    ) -> Result<RetrievalResult, RetrievalError> {
        let embeddings = timeout(self.call_timeout, self.embedder.embed(&[question]))
            .await
            .map_err(|_| RetrievalError::Timeout("embedding"))??;
        let query_embedding = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RetrievalError::Generation("embedder returned no vector".to_string()))?;

        let filter = document_id.map_or_else(SearchFilter::default, SearchFilter::for_document);
        let hits = self
            .index
            .search(
                &query_embedding,
                top_k.unwrap_or(self.default_top_k),
                &filter,
            )
            .await?;

        if hits.is_empty() {
            return Ok(RetrievalResult::no_match());
        }

        let context = assemble_context(&hits);
        let prompt = prompts::answer_prompt(question, &context);

        let answer = timeout(
            self.call_timeout,
            self.generator
                .generate(&prompt, ANSWER_MAX_TOKENS, ANSWER_TEMPERATURE),
        )
        .await
        .map_err(|_| RetrievalError::Timeout("generation"))??;

        let confidence = hits
            .iter()
            .map(SearchHit::similarity)
            .fold(f32::MIN, f32::max);
        let sources = hits.iter().map(source_ref).collect();

        Ok(RetrievalResult {
            answer,
            context,
            sources,
            confidence: Some(confidence),
        })
    }
}

/// Concatenate hit texts as `[Source i] text`, 1-indexed in rank order.
fn assemble_context(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| format!("[Source {}] {}", i + 1, hit.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn source_ref(hit: &SearchHit) -> SourceRef {
    let preview: String = hit.text.chars().take(PREVIEW_CHARS).collect();
    let preview = if hit.text.chars().count() > PREVIEW_CHARS {
        format!("{preview}...")
    } else {
        preview
    };
    SourceRef {
        chunk_id: hit.metadata.chunk_index,
        document_id: hit.metadata.document_id,
        relevance: hit.similarity(),
        preview,
    }
}
