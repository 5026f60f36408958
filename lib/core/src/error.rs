use crate::Category;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by an [`EmbeddingProvider`](crate::EmbeddingProvider).
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Embedding provider unavailable: {0}")]
    Unavailable(String),

    #[error("Embedding request failed: {0}")]
    Request(String),

    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("Embedding count mismatch: requested {expected}, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build centroid for category '{category}': {source}")]
    Initialization {
        category: Category,
        #[source]
        source: Box<Error>,
    },

    #[error("Categorization failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Cannot average an empty set of vectors")]
    EmptyInput,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
