//! Embedding provider seam
//!
//! The categorizer never talks to a model directly. Anything that can turn
//! text into a fixed-length [`Vector`] implements [`EmbeddingProvider`] and is
//! injected at construction time, so tests can run against deterministic fakes.

use crate::error::EmbeddingError;
use crate::Vector;

/// Maps text to fixed-length dense vectors.
///
/// Implementations must be deterministic for a given model version and safe
/// to share between threads. Calls are synchronous and may block.
pub trait EmbeddingProvider: Send + Sync {
    /// Short provider name used in logs and the service description.
    fn name(&self) -> &str;

    /// Model identifier.
    fn model(&self) -> &str;

    /// Length of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// Embed a single text.
    fn embed_one(&self, text: &str) -> Result<Vector, EmbeddingError>;

    /// Embed several texts, preserving input order.
    fn embed_many(&self, texts: &[&str]) -> Result<Vec<Vector>, EmbeddingError> {
        texts.iter().map(|text| self.embed_one(text)).collect()
    }
}

/// Checks a provider batch against the request size and declared dimension.
pub fn validate_batch(
    vectors: &[Vector],
    expected_count: usize,
    dimension: usize,
) -> Result<(), EmbeddingError> {
    if vectors.len() != expected_count {
        return Err(EmbeddingError::CountMismatch {
            expected: expected_count,
            actual: vectors.len(),
        });
    }
    for v in vectors {
        if v.dim() != dimension {
            return Err(EmbeddingError::InvalidDimension {
                expected: dimension,
                actual: v.dim(),
            });
        }
        if v.as_slice().iter().any(|x| !x.is_finite()) {
            return Err(EmbeddingError::InvalidResponse(
                "embedding contains non-finite values".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant;

    impl EmbeddingProvider for Constant {
        fn name(&self) -> &str {
            "constant"
        }

        fn model(&self) -> &str {
            "constant-v1"
        }

        fn dimension(&self) -> usize {
            3
        }

        fn embed_one(&self, text: &str) -> Result<Vector, EmbeddingError> {
            Ok(Vector::new(vec![text.len() as f32, 1.0, 0.0]))
        }
    }

    #[test]
    fn test_default_embed_many_preserves_order() {
        let vectors = Constant.embed_many(&["a", "abc", "ab"]).unwrap();
        let lengths: Vec<f32> = vectors.iter().map(|v| v.as_slice()[0]).collect();
        assert_eq!(lengths, vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_validate_batch() {
        let ok = vec![Vector::zeros(3), Vector::zeros(3)];
        assert!(validate_batch(&ok, 2, 3).is_ok());

        assert!(matches!(
            validate_batch(&ok, 3, 3),
            Err(EmbeddingError::CountMismatch { expected: 3, actual: 2 })
        ));

        let bad = vec![Vector::zeros(3), Vector::zeros(4)];
        assert!(matches!(
            validate_batch(&bad, 2, 3),
            Err(EmbeddingError::InvalidDimension { expected: 3, actual: 4 })
        ));

        let nan = vec![Vector::new(vec![0.0, f32::NAN, 1.0])];
        assert!(matches!(
            validate_batch(&nan, 1, 3),
            Err(EmbeddingError::InvalidResponse(_))
        ));
    }
}
