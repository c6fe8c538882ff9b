//! Vector index trait and the in-memory cosine index.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::IndexError;
use crate::types::{IndexedVector, SearchFilter, SearchHit};

/// Capability set every vector index backend provides.
///
/// Writes for one document always arrive as a single `upsert` or `delete`
/// batch, which keeps searches from observing a half-indexed document.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or overwrite vectors by id.
    ///
    /// # Errors
    ///
    /// Fails with [`IndexError::DimensionMismatch`] if any embedding does
    /// not match the index dimension.
    async fn upsert(&self, vectors: Vec<IndexedVector>) -> Result<(), IndexError>;

    /// Return up to `top_k` matches ordered by ascending cosine distance.
    ///
    /// An empty result is a normal outcome, not an error.
    ///
    /// # Errors
    ///
    /// Fails with [`IndexError::DimensionMismatch`] for a query embedding of
    /// the wrong dimension.
    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        filter: &SearchFilter,
    ) -> Result<Vec<SearchHit>, IndexError>;

    /// Delete all vectors whose metadata matches the filter. Returns the
    /// number removed.
    async fn delete(&self, filter: &SearchFilter) -> usize;

    /// Number of vectors currently stored.
    async fn count(&self) -> usize;
}

/// In-memory vector index over a `RwLock`-guarded map.
///
/// The embedding dimension is fixed at construction; every insert and query
/// is checked against it. Batch operations hold the write lock for their
/// whole run, so `count` never observes a partially applied batch.
pub struct MemoryIndex {
    dimension: usize,
    vectors: RwLock<HashMap<String, IndexedVector>>,
}

impl MemoryIndex {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<(), IndexError> {
        if embedding.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                got: embedding.len(),
            });
        }
        Ok(())
    }
}

/// Cosine distance between two vectors of equal length.
///
/// `1 - cosine_similarity`; zero-magnitude vectors are treated as maximally
/// distant rather than dividing by zero.
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn upsert(&self, vectors: Vec<IndexedVector>) -> Result<(), IndexError> {
        for vector in &vectors {
            self.check_dimension(&vector.embedding)?;
        }
        let mut store = self.vectors.write().await;
        for vector in vectors {
            store.insert(vector.id.clone(), vector);
        }
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        filter: &SearchFilter,
    ) -> Result<Vec<SearchHit>, IndexError> {
        self.check_dimension(query_embedding)?;

        let store = self.vectors.read().await;
        let mut hits: Vec<SearchHit> = store
            .values()
            .filter(|v| filter.matches(&v.metadata))
            .map(|v| SearchHit {
                id: v.id.clone(),
                text: v.text.clone(),
                metadata: v.metadata.clone(),
                distance: cosine_distance(&v.embedding, query_embedding),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn delete(&self, filter: &SearchFilter) -> usize {
        let mut store = self.vectors.write().await;
        let before = store.len();
        store.retain(|_, v| !filter.matches(&v.metadata));
        before - store.len()
    }

    async fn count(&self) -> usize {
        self.vectors.read().await.len()
    }
}
