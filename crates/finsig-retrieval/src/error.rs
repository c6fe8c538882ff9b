use thiserror::Error;

/// Internal pipeline errors. These never cross the retriever's public
/// boundary; `Retriever::query` converts them into a degraded result.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error(transparent)]
    Index(#[from] finsig_index::IndexError),

    #[error("generation error: {0}")]
    Generation(String),

    #[error("{0} timed out")]
    Timeout(&'static str),
}
