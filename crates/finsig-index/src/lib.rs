//! Chunking and vector indexing for FINSIG.
//!
//! Splits extracted document text into overlapping, sentence-aware chunks,
//! embeds them via a TEI-style HTTP collaborator, and stores the vectors in
//! a filtered cosine-similarity index keyed by deterministic chunk ids so
//! re-indexing a document overwrites instead of duplicating.

pub mod chunker;
pub mod embeddings;
pub mod error;
pub mod index;
pub mod ingest;
pub mod types;

pub use chunker::{chunk_text, ChunkSpan, ChunkingConfig};
pub use embeddings::{Embedder, HttpEmbedder};
pub use error::IndexError;
pub use index::{MemoryIndex, VectorIndex};
pub use ingest::{delete_document, document_chunks, index_document, ExtractionOutcome};
pub use types::{vector_id, ChunkMetadata, DocumentChunk, IndexedVector, SearchFilter, SearchHit};
