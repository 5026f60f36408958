use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Neg;

/// A dense embedding vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        crate::simd::norm(&self.data)
    }

    #[inline]
    pub fn dot(&self, other: &Vector) -> f32 {
        crate::simd::dot_product(&self.data, &other.data)
    }

    /// Cosine similarity with another vector, see [`cosine_similarity`].
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> f32 {
        cosine_similarity(&self.data, &other.data)
    }

    /// Normalize the vector to unit length. Zero vectors are left untouched.
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }

    /// Element-wise arithmetic mean of a non-empty set of equally sized vectors.
    pub fn mean(vectors: &[Vector]) -> Result<Vector> {
        let first = vectors.first().ok_or(Error::EmptyInput)?;
        let dim = first.dim();
        let mut acc = vec![0.0f32; dim];

        for v in vectors {
            if v.dim() != dim {
                return Err(Error::InvalidDimension {
                    expected: dim,
                    actual: v.dim(),
                });
            }
            crate::simd::add_assign(&mut acc, v.as_slice());
        }

        let inv_count = 1.0 / vectors.len() as f32;
        for x in &mut acc {
            *x *= inv_count;
        }

        Ok(Vector::new(acc))
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

impl Neg for &Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(self.data.iter().map(|x| -x).collect())
    }
}

/// Norms inside this range keep every squared term and the dot product
/// comfortably inside normal f32 range.
const FAST_NORM_RANGE: std::ops::RangeInclusive<f32> = 1e-10..=1e10;

/// `dot(a, b) / (|a| * |b|)`.
///
/// Returns exactly 0.0 when either side has zero norm, the lengths differ or
/// the inputs are not finite. The result is clamped to `[-1, 1]` so float
/// rounding never leaks outside the cosine range.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let norm_a = crate::simd::norm(a);
    let norm_b = crate::simd::norm(b);

    if FAST_NORM_RANGE.contains(&norm_a) && FAST_NORM_RANGE.contains(&norm_b) {
        let score = crate::simd::dot_product(a, b) / (norm_a * norm_b);
        if score.is_finite() {
            return score.clamp(-1.0, 1.0);
        }
    }

    cosine_similarity_wide(a, b)
}

/// f64 accumulation for magnitudes that would overflow or underflow in f32.
fn cosine_similarity_wide(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if score.is_finite() {
        score.clamp(-1.0, 1.0) as f32
    } else {
        0.0
    }
}
