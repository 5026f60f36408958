//! # qcat
//!
//! Embedding-based categorizer for short Turkish e-commerce support questions.
//!
//! qcat sorts a free-text question into one of nine fixed categories
//! (reviews, special requests, technical support, damaged or wrong items,
//! authenticity, returns, stock, shipping carriers, order delivery) by
//! comparing its embedding against one centroid per category.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install qcat
//! qcat --port 5002
//! # or against a real sentence-transformers model behind an OpenAI-compatible API
//! qcat --embedder http --embedding-url http://localhost:8080/v1
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use qcat::prelude::*;
//! use std::sync::Arc;
//!
//! let categorizer = Categorizer::new(Arc::new(HashingEmbedder::default())).unwrap();
//!
//! let result = categorizer.categorize("Hangi kargo firması?").unwrap();
//! println!("{} ({:.3})", result.category, result.confidence);
//!
//! let empty = categorizer.categorize("   ").unwrap();
//! assert_eq!(empty.category, "genel");
//! ```
//!
//! ## Crate Structure
//!
//! - `qcat-core` - Vectors, the provider seam, categories and the categorizer
//! - `qcat-embed` - Hashing and HTTP embedding providers
//! - `qcat-api` - REST API

// Re-export core types
pub use qcat_core::{
    cosine_similarity, CategorizationResult, Categorizer, Category, EmbeddingError,
    EmbeddingProvider, Error, Method, Result, Vector, GENERAL_CONFIDENCE, GENERAL_ID,
    GENERAL_NAME,
};

// Re-export providers
pub use qcat_embed::{HashingEmbedder, HttpEmbedder, ProviderConfig};

// Re-export API
pub use qcat_api::{ApiState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CategorizationResult, Categorizer, Category, EmbeddingProvider, Error, HashingEmbedder,
        HttpEmbedder, Method, ProviderConfig, Result, Vector,
    };
}

/// SIMD-optimized vector kernels
pub mod simd {
    pub use qcat_core::simd::{dot_product, norm};
}
