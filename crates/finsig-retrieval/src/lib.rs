//! Question answering over the FINSIG vector index.
//!
//! Embeds a query, searches the index, assembles a labeled context, and asks
//! the generation collaborator for an answer. Every failure inside the
//! pipeline degrades to an explanatory [`RetrievalResult`]; callers never
//! see a raw error.

pub mod error;
pub mod generation;
pub mod prompts;
pub mod retriever;

pub use error::RetrievalError;
pub use generation::{GenerationClient, GenerationOutput};
pub use retriever::{Retriever, RetrievalResult, SourceRef, NO_MATCH_ANSWER};
