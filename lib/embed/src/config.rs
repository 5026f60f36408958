use crate::hashing::{HashingEmbedder, DEFAULT_HASH_DIM};
use crate::http::{HttpEmbedder, DEFAULT_DIMENSION, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use qcat_core::{EmbeddingError, EmbeddingProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Which embedding provider to run with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    Hashing {
        #[serde(default = "default_hash_dim")]
        dim: usize,
    },
    Http {
        base_url: String,
        #[serde(default = "default_model")]
        model: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_dimension")]
        dimension: usize,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_hash_dim() -> usize {
    DEFAULT_HASH_DIM
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_dimension() -> usize {
    DEFAULT_DIMENSION
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Hashing {
            dim: DEFAULT_HASH_DIM,
        }
    }
}

impl ProviderConfig {
    /// Instantiate the configured provider
    pub fn build(&self) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
        match self {
            ProviderConfig::Hashing { dim } => {
                if *dim == 0 {
                    return Err(EmbeddingError::Unavailable(
                        "hashing dimension must be positive".to_string(),
                    ));
                }
                info!("Using hashing embedder (dim {})", dim);
                Ok(Arc::new(HashingEmbedder::new(*dim)))
            }
            ProviderConfig::Http {
                base_url,
                model,
                api_key,
                dimension,
                timeout_secs,
            } => {
                if base_url.trim().is_empty() {
                    return Err(EmbeddingError::Unavailable(
                        "embedding base URL is not set".to_string(),
                    ));
                }
                let mut embedder =
                    HttpEmbedder::with_timeout(base_url, Duration::from_secs(*timeout_secs))?
                        .with_model(model.clone())
                        .with_dimension(*dimension);
                if let Some(key) = api_key {
                    embedder = embedder.with_api_key(key.clone());
                }
                info!("Using HTTP embedder {} ({})", embedder.endpoint(), model);
                Ok(Arc::new(embedder))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_hashing() {
        let provider = ProviderConfig::default().build().unwrap();
        assert_eq!(provider.name(), "hashing");
        assert_eq!(provider.dimension(), DEFAULT_HASH_DIM);
    }

    #[test]
    fn test_deserialize_http_with_defaults() {
        let config: ProviderConfig = serde_json::from_value(json!({
            "kind": "http",
            "base_url": "http://localhost:8080/v1"
        }))
        .unwrap();

        assert_eq!(
            config,
            ProviderConfig::Http {
                base_url: "http://localhost:8080/v1".to_string(),
                model: DEFAULT_MODEL.to_string(),
                api_key: None,
                dimension: DEFAULT_DIMENSION,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            }
        );

        let provider = config.build().unwrap();
        assert_eq!(provider.name(), "http");
        assert_eq!(provider.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(ProviderConfig::Hashing { dim: 0 }.build().is_err());
        let http = ProviderConfig::Http {
            base_url: " ".to_string(),
            model: default_model(),
            api_key: None,
            dimension: 384,
            timeout_secs: 5,
        };
        assert!(http.build().is_err());
    }
}
