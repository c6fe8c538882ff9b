//! Index data types shared across chunking, ingestion, and search.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Canonical vector id for a chunk. Stable across insert and delete so
/// re-indexing a document overwrites its previous vectors.
#[must_use]
pub fn vector_id(document_id: i64, chunk_index: usize) -> String {
    format!("doc_{document_id}_chunk_{chunk_index}")
}

/// One chunk of a document, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub document_id: i64,
    pub chunk_index: usize,
    pub text: String,
    pub char_start: usize,
    pub char_end: usize,
    pub total_chunks: usize,
}

/// Metadata stored with every vector.
///
/// `extra` carries caller-supplied fields such as company name or document
/// type; filters may match on them by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub document_id: i64,
    pub chunk_index: usize,
    pub total_chunks: usize,
    #[serde(default)]
    pub extra: HashMap<String, String>,
}

/// An embedded chunk as stored in the index.
#[derive(Debug, Clone)]
pub struct IndexedVector {
    pub id: String,
    pub embedding: Vec<f32>,
    pub text: String,
    pub metadata: ChunkMetadata,
}

/// Metadata predicate for search and delete.
///
/// All present fields must match. A key in `extra` that no stored vector
/// carries simply matches nothing.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub document_id: Option<i64>,
    pub extra: HashMap<String, String>,
}

impl SearchFilter {
    /// Filter that selects every vector of one document.
    #[must_use]
    pub fn for_document(document_id: i64) -> Self {
        Self {
            document_id: Some(document_id),
            ..Self::default()
        }
    }

    pub(crate) fn matches(&self, metadata: &ChunkMetadata) -> bool {
        if let Some(document_id) = self.document_id {
            if metadata.document_id != document_id {
                return false;
            }
        }
        self.extra
            .iter()
            .all(|(k, v)| metadata.extra.get(k) == Some(v))
    }
}

/// One ranked search match.
///
/// `distance` is cosine distance; lower is closer. `similarity()` converts
/// to the [0,1] relevance scale used by callers.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
    pub distance: f32,
}

impl SearchHit {
    /// `1 - distance`, clamped to [0,1].
    #[must_use]
    pub fn similarity(&self) -> f32 {
        (1.0 - self.distance).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_id_is_stable_and_deterministic() {
        assert_eq!(vector_id(42, 3), "doc_42_chunk_3");
        assert_eq!(vector_id(42, 3), vector_id(42, 3));
    }

    #[test]
    fn filter_matches_on_document_id() {
        let meta = ChunkMetadata {
            document_id: 7,
            ..ChunkMetadata::default()
        };
        assert!(SearchFilter::for_document(7).matches(&meta));
        assert!(!SearchFilter::for_document(8).matches(&meta));
    }

    #[test]
    fn filter_with_unknown_extra_key_matches_nothing() {
        let meta = ChunkMetadata::default();
        let mut filter = SearchFilter::default();
        filter
            .extra
            .insert("company".to_string(), "Acme".to_string());
        assert!(!filter.matches(&meta));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let meta = ChunkMetadata {
            document_id: 99,
            ..ChunkMetadata::default()
        };
        assert!(SearchFilter::default().matches(&meta));
    }

    #[test]
    fn similarity_clamps_to_unit_interval() {
        let hit = SearchHit {
            id: vector_id(1, 0),
            text: String::new(),
            metadata: ChunkMetadata::default(),
            distance: 1.7,
        };
        assert_eq!(hit.similarity(), 0.0);
    }
}
