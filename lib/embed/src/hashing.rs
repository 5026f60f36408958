//! Feature-hashing embedder
//!
//! Maps text into a fixed number of buckets using character trigrams and whole
//! words, then normalizes to unit length. No model download, no network, and
//! the same text always yields the same vector. Useful offline and in tests;
//! it captures surface overlap rather than meaning.

use qcat_core::{EmbeddingError, EmbeddingProvider, Vector};

/// Default number of buckets, matches MiniLM's output width
pub const DEFAULT_HASH_DIM: usize = 384;

/// Weight of a whole word relative to a single trigram
const WORD_WEIGHT: f32 = 2.0;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic trigram/word hashing embedder
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
    model: String,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            model: format!("fnv1a-trigram-{}", dim),
        }
    }

    fn bucket(&self, token: &str) -> usize {
        (fnv1a(token.as_bytes()) % self.dim as u64) as usize
    }

    /// Hash a text into a unit vector
    pub fn hash_text(&self, text: &str) -> Vector {
        let mut buckets = vec![0.0f32; self.dim];
        if self.dim == 0 {
            return Vector::new(buckets);
        }

        let normalized = normalize(text);

        for trigram in trigrams(&normalized) {
            buckets[self.bucket(&trigram)] += 1.0;
        }

        for word in normalized.split_whitespace() {
            buckets[self.bucket(word)] += WORD_WEIGHT;
        }

        let mut vector = Vector::new(buckets);
        vector.normalize();
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_DIM)
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed_one(&self, text: &str) -> Result<Vector, EmbeddingError> {
        Ok(self.hash_text(text))
    }
}

/// Lowercase and replace punctuation with spaces so "mı?" and "mı" hash alike.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect()
}

/// Character trigrams of every word, padded with one space on each side
fn trigrams(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for word in text.split_whitespace() {
        let padded: Vec<char> = std::iter::once(' ')
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();
        out.extend(padded.windows(3).map(|w| w.iter().collect::<String>()));
    }
    out
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}
