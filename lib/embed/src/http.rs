//! OpenAI-compatible HTTP embedding provider
//!
//! Talks to any server exposing `POST {base_url}/embeddings` with the OpenAI
//! request/response shape (OpenAI itself, text-embeddings-inference, a local
//! sentence-transformers gateway, ...). Calls block the current thread.

use qcat_core::provider::validate_batch;
use qcat_core::{EmbeddingError, EmbeddingProvider, Vector};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_DIMENSION: usize = 384;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    input: &'a [&'a str],
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

/// Blocking client for an `/embeddings` endpoint
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimension: usize,
}

impl HttpEmbedder {
    pub fn new(base_url: &str) -> Result<Self, EmbeddingError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            dimension: DEFAULT_DIMENSION,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl EmbeddingProvider for HttpEmbedder {
    fn name(&self) -> &str {
        "http"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_one(&self, text: &str) -> Result<Vector, EmbeddingError> {
        self.embed_many(&[text])?
            .pop()
            .ok_or(EmbeddingError::CountMismatch {
                expected: 1,
                actual: 0,
            })
    }

    fn embed_many(&self, texts: &[&str]) -> Result<Vec<Vector>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Requesting {} embeddings from {}", texts.len(), self.endpoint);

        let mut request = self.client.post(&self.endpoint).json(&EmbeddingsRequest {
            input: texts,
            model: &self.model,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(EmbeddingError::Request(format!("{}: {}", status, body.trim())));
        }

        let body = response
            .text()
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;
        let vectors = parse_embeddings(&body)?;
        validate_batch(&vectors, texts.len(), self.dimension)?;
        Ok(vectors)
    }
}

/// Decode an `/embeddings` response body, ordering vectors by `index` when present.
///
/// Indices are all-or-nothing and must cover `0..n` exactly once.
fn parse_embeddings(body: &str) -> Result<Vec<Vector>, EmbeddingError> {
    let mut response: EmbeddingsResponse =
        serde_json::from_str(body).map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

    let indexed = response.data.iter().filter(|d| d.index.is_some()).count();
    if indexed != 0 {
        if indexed != response.data.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "{} of {} embeddings carry an index",
                indexed,
                response.data.len()
            )));
        }

        response.data.sort_by_key(|d| d.index);
        if let Some((position, entry)) = response
            .data
            .iter()
            .enumerate()
            .find(|(position, d)| d.index != Some(*position))
        {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected embedding index {}, got {:?}",
                position, entry.index
            )));
        }
    }

    Ok(response
        .data
        .into_iter()
        .map(|d| Vector::new(d.embedding))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Serves exactly one canned HTTP response and hands back the raw request.
    fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });

        (url, handle)
    }

    #[test]
    fn test_parse_orders_by_index() {
        let body = r#"{"data":[{"index":1,"embedding":[0.0,1.0]},{"index":0,"embedding":[1.0,0.0]}]}"#;
        let vectors = parse_embeddings(body).unwrap();
        assert_eq!(vectors[0].as_slice(), &[1.0, 0.0]);
        assert_eq!(vectors[1].as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn test_parse_without_indices_keeps_order() {
        let body = r#"{"data":[{"embedding":[0.0,1.0]},{"embedding":[1.0,0.0]}]}"#;
        let vectors = parse_embeddings(body).unwrap();
        assert_eq!(vectors[0].as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn test_parse_rejects_bad_indices() {
        for body in [
            r#"{"data":[{"index":0,"embedding":[1.0]},{"index":0,"embedding":[2.0]}]}"#,
            r#"{"data":[{"index":0,"embedding":[1.0]},{"index":2,"embedding":[2.0]}]}"#,
            r#"{"data":[{"index":1,"embedding":[1.0]}]}"#,
            r#"{"data":[{"index":0,"embedding":[1.0]},{"embedding":[2.0]}]}"#,
        ] {
            assert!(
                matches!(parse_embeddings(body), Err(EmbeddingError::InvalidResponse(_))),
                "{} should be rejected",
                body
            );
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_embeddings("{\"nope\": true}"),
            Err(EmbeddingError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_embed_many_round_trip() {
        let body = r#"{"data":[{"index":0,"embedding":[1.0,0.0,0.0]},{"index":1,"embedding":[0.0,1.0,0.0]}]}"#;
        let (url, server) = serve_once("200 OK", body.to_string());

        let embedder = HttpEmbedder::new(&format!("{}/v1/", url))
            .unwrap()
            .with_model("test-model")
            .with_api_key("secret")
            .with_dimension(3);
        let vectors = embedder.embed_many(&["stok", "kargo"]).unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1].as_slice(), &[0.0, 1.0, 0.0]);

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /v1/embeddings"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer secret"));
        assert!(request.contains("\"model\":\"test-model\""));
        assert!(request.contains("\"input\":[\"stok\",\"kargo\"]"));
    }

    #[test]
    fn test_server_error_is_request_error() {
        let (url, server) = serve_once("500 Internal Server Error", "{}".to_string());
        let embedder = HttpEmbedder::new(&url).unwrap().with_dimension(3);

        let err = embedder.embed_one("stok").unwrap_err();
        assert!(matches!(err, EmbeddingError::Request(ref msg) if msg.contains("500")));
        server.join().unwrap();
    }

    #[test]
    fn test_dimension_mismatch_detected() {
        let body = r#"{"data":[{"index":0,"embedding":[1.0,0.0]}]}"#;
        let (url, server) = serve_once("200 OK", body.to_string());
        let embedder = HttpEmbedder::new(&url).unwrap().with_dimension(3);

        assert!(matches!(
            embedder.embed_one("stok"),
            Err(EmbeddingError::InvalidDimension { expected: 3, actual: 2 })
        ));
        server.join().unwrap();
    }

    #[test]
    fn test_unreachable_server() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let embedder = HttpEmbedder::with_timeout(&url, Duration::from_secs(2)).unwrap();
        assert!(matches!(embedder.embed_one("stok"), Err(EmbeddingError::Request(_))));
    }

    #[test]
    fn test_empty_batch_skips_network() {
        let embedder = HttpEmbedder::new("http://127.0.0.1:1").unwrap();
        assert!(embedder.embed_many(&[]).unwrap().is_empty());
    }
}
