//! # qcat Core
//!
//! Core library for the qcat question categorizer.
//!
//! This crate provides the fundamental types and the categorization algorithm:
//!
//! - [`Vector`] - Dense embedding vector with SIMD-backed cosine similarity
//! - [`EmbeddingProvider`] - The injected text-to-vector capability
//! - [`Category`] - The nine fixed support categories and their example phrases
//! - [`Categorizer`] - Per-category centroids and nearest-centroid scoring
//!
//! ## Example
//!
//! ```rust
//! use qcat_core::{Categorizer, EmbeddingError, EmbeddingProvider, Vector};
//! use std::sync::Arc;
//!
//! struct Lengths;
//!
//! impl EmbeddingProvider for Lengths {
//!     fn name(&self) -> &str { "lengths" }
//!     fn model(&self) -> &str { "lengths-v1" }
//!     fn dimension(&self) -> usize { 2 }
//!     fn embed_one(&self, text: &str) -> Result<Vector, EmbeddingError> {
//!         Ok(Vector::new(vec![text.len() as f32, 1.0]))
//!     }
//! }
//!
//! let categorizer = Categorizer::new(Arc::new(Lengths)).unwrap();
//! let result = categorizer.categorize("Bu ürün orijinal mi?").unwrap();
//! assert_eq!(result.similarities.unwrap().len(), 9);
//! ```

pub mod categorizer;
pub mod category;
pub mod error;
pub mod provider;
pub mod vector;

/// SIMD-optimized vector kernels
///
/// - AVX2/FMA on x86_64
/// - NEON on ARM64/Apple Silicon
pub mod simd;

pub use categorizer::{CategorizationResult, Categorizer, Method};
pub use category::{Category, GENERAL_CONFIDENCE, GENERAL_ID, GENERAL_NAME};
pub use error::{EmbeddingError, Error, Result};
pub use provider::EmbeddingProvider;
pub use vector::{cosine_similarity, Vector};
