//! # qcat Embed
//!
//! Concrete [`EmbeddingProvider`](qcat_core::EmbeddingProvider) implementations.
//!
//! - [`HashingEmbedder`] - deterministic trigram/word feature hashing, no model needed
//! - [`HttpEmbedder`] - OpenAI-compatible `/embeddings` endpoint over blocking HTTP
//!
//! [`ProviderConfig`] picks one at startup.

pub mod config;
pub mod hashing;
pub mod http;

pub use config::ProviderConfig;
pub use hashing::HashingEmbedder;
pub use http::HttpEmbedder;
