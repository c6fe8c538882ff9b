//! Document ingestion: chunk, embed, and upsert in one batch per document.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::chunker::{chunk_text, ChunkingConfig};
use crate::embeddings::Embedder;
use crate::error::IndexError;
use crate::index::VectorIndex;
use crate::types::{vector_id, ChunkMetadata, DocumentChunk, IndexedVector, SearchFilter};

/// Wire shape produced by the external text-extraction collaborator.
///
/// Only `text` feeds chunking and indexing; confidence and page count are
/// passed through to storage by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub success: bool,
    pub text: String,
    pub confidence: f64,
    pub pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionOutcome {
    /// Text to index, if extraction succeeded and produced any.
    #[must_use]
    pub fn text_for_indexing(&self) -> Option<&str> {
        if self.success && !self.text.trim().is_empty() {
            Some(&self.text)
        } else {
            None
        }
    }
}

/// Chunk a document's text into ordered [`DocumentChunk`] records.
///
/// `chunk_index` follows document order; reading the chunks back in index
/// order reconstructs the document (modulo overlap and trimming).
///
/// # Errors
///
/// Returns [`IndexError`] for an invalid chunking config.
pub fn document_chunks(
    document_id: i64,
    text: &str,
    config: &ChunkingConfig,
) -> Result<Vec<DocumentChunk>, IndexError> {
    let spans = chunk_text(text, config)?;
    let total_chunks = spans.len();
    Ok(spans
        .into_iter()
        .enumerate()
        .map(|(chunk_index, span)| DocumentChunk {
            document_id,
            chunk_index,
            text: span.text,
            char_start: span.char_start,
            char_end: span.char_end,
            total_chunks,
        })
        .collect())
}

/// Chunk a document's text, embed each chunk, and upsert the vectors.
///
/// Vector ids follow the canonical `doc_{document_id}_chunk_{i}` scheme, so
/// re-indexing the same document overwrites its previous vectors instead of
/// duplicating them. The whole document lands in one upsert batch.
///
/// Returns the number of chunks indexed (zero for empty text).
///
/// # Errors
///
/// Returns [`IndexError`] for invalid chunking config, embedding failure,
/// or an embedding dimension mismatch.
pub async fn index_document(
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    document_id: i64,
    text: &str,
    config: &ChunkingConfig,
    extra: HashMap<String, String>,
) -> Result<usize, IndexError> {
    let chunks = document_chunks(document_id, text, config)?;
    if chunks.is_empty() {
        tracing::info!(document_id, "no indexable text, nothing to do");
        return Ok(0);
    }

    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    let embeddings = embedder.embed(&texts).await?;

    if embeddings.len() != chunks.len() {
        return Err(IndexError::Embedding(format!(
            "got {} embeddings for {} chunks",
            embeddings.len(),
            chunks.len()
        )));
    }

    let total_chunks = chunks.len();
    let vectors: Vec<IndexedVector> = chunks
        .into_iter()
        .zip(embeddings)
        .map(|(chunk, embedding)| IndexedVector {
            id: vector_id(document_id, chunk.chunk_index),
            embedding,
            text: chunk.text,
            metadata: ChunkMetadata {
                document_id,
                chunk_index: chunk.chunk_index,
                total_chunks: chunk.total_chunks,
                extra: extra.clone(),
            },
        })
        .collect();

    index.upsert(vectors).await?;
    tracing::info!(document_id, chunks = total_chunks, "indexed document");
    Ok(total_chunks)
}

/// Remove every vector belonging to a document. Returns the removed count.
pub async fn delete_document(index: &dyn VectorIndex, document_id: i64) -> usize {
    let removed = index.delete(&SearchFilter::for_document(document_id)).await;
    tracing::info!(document_id, removed, "deleted document from index");
    removed
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::index::MemoryIndex;

    /// Deterministic embedder: vector dimension 3, components derived from
    /// text length so distinct chunks get distinct embeddings.
    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        #[allow(clippy::cast_precision_loss)]
        async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, IndexError> {
            Ok(texts
                .iter()
                .map(|t| vec![t.len() as f32, 1.0, 0.0])
                .collect())
        }
    }

    fn test_config() -> ChunkingConfig {
        ChunkingConfig {
            chunk_size: 50,
            overlap: 10,
        }
    }

    #[tokio::test]
    async fn index_document_stores_one_vector_per_chunk() {
        let index = MemoryIndex::new(3);
        let text = "finance ".repeat(30);
        let indexed = index_document(
            &StubEmbedder,
            &index,
            1,
            &text,
            &test_config(),
            HashMap::new(),
        )
        .await
        .unwrap();

        assert!(indexed > 1, "expected several chunks, got {indexed}");
        assert_eq!(index.count().await, indexed);
    }

    #[tokio::test]
    async fn index_document_empty_text_indexes_nothing() {
        let index = MemoryIndex::new(3);
        let indexed = index_document(
            &StubEmbedder,
            &index,
            1,
            "",
            &test_config(),
            HashMap::new(),
        )
        .await
        .unwrap();
        assert_eq!(indexed, 0);
        assert_eq!(index.count().await, 0);
    }

    #[tokio::test]
    async fn reindexing_a_document_does_not_change_count() {
        let index = MemoryIndex::new(3);
        let text = "report ".repeat(30);
        let first = index_document(
            &StubEmbedder,
            &index,
            1,
            &text,
            &test_config(),
            HashMap::new(),
        )
        .await
        .unwrap();
        let second = index_document(
            &StubEmbedder,
            &index,
            1,
            &text,
            &test_config(),
            HashMap::new(),
        )
        .await
        .unwrap();

        assert_eq!(first, second);
        assert_eq!(index.count().await, first, "re-index must overwrite by id");
    }

    #[tokio::test]
    async fn delete_document_removes_only_that_document() {
        let index = MemoryIndex::new(3);
        let text = "statement ".repeat(30);
        let doc1 = index_document(
            &StubEmbedder,
            &index,
            1,
            &text,
            &test_config(),
            HashMap::new(),
        )
        .await
        .unwrap();
        let doc2 = index_document(
            &StubEmbedder,
            &index,
            2,
            &text,
            &test_config(),
            HashMap::new(),
        )
        .await
        .unwrap();

        let removed = delete_document(&index, 1).await;
        assert_eq!(removed, doc1);
        assert_eq!(index.count().await, doc2);
    }

    #[tokio::test]
    async fn metadata_carries_caller_extras_and_chunk_accounting() {
        let index = MemoryIndex::new(3);
        let mut extra = HashMap::new();
        extra.insert("company".to_string(), "Acme Corp".to_string());
        extra.insert("document_type".to_string(), "10-K".to_string());

        let text = "earnings ".repeat(30);
        let total = index_document(&StubEmbedder, &index, 5, &text, &test_config(), extra)
            .await
            .unwrap();

        let hits = index
            .search(&[9.0, 1.0, 0.0], 1, &SearchFilter::for_document(5))
            .await
            .unwrap();
        assert_eq!(hits[0].metadata.total_chunks, total);
        assert_eq!(
            hits[0].metadata.extra.get("company").map(String::as_str),
            Some("Acme Corp")
        );
    }

    #[test]
    fn extraction_outcome_gates_text_on_success() {
        let ok = ExtractionOutcome {
            success: true,
            text: "some text".to_string(),
            confidence: 0.9,
            pages: 2,
            error: None,
        };
        assert_eq!(ok.text_for_indexing(), Some("some text"));

        let failed = ExtractionOutcome {
            success: false,
            text: String::new(),
            confidence: 0.0,
            pages: 0,
            error: Some("unreadable scan".to_string()),
        };
        assert!(failed.text_for_indexing().is_none());
    }
}
