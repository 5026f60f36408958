use crate::category::{GENERAL_CONFIDENCE, GENERAL_ID, GENERAL_NAME};
use crate::provider::validate_batch;
use crate::{Category, EmbeddingProvider, Error, Result, Vector};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// How a result was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Nearest centroid by cosine similarity
    Embedding,
    /// Blank input, no embedding was computed
    Empty,
}

/// Outcome of a single categorization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizationResult {
    /// Winning category id, or [`GENERAL_ID`] for the fallback
    pub category: &'static str,
    pub category_name: &'static str,
    /// Raw cosine similarity of the winner, not a probability
    pub confidence: f32,
    pub method: Method,
    /// Score against every configured category. Absent for blank input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarities: Option<BTreeMap<Category, f32>>,
}

impl CategorizationResult {
    fn general(method: Method, similarities: Option<BTreeMap<Category, f32>>) -> Self {
        Self {
            category: GENERAL_ID,
            category_name: GENERAL_NAME,
            confidence: GENERAL_CONFIDENCE,
            method,
            similarities,
        }
    }

    /// The winning category, `None` for the general fallback
    pub fn matched(&self) -> Option<Category> {
        Category::from_id(self.category)
    }
}

/// Nearest-centroid question categorizer.
///
/// Centroids are computed once at construction and never change, so a
/// `Categorizer` can be shared behind an `Arc` and queried from many
/// threads without locking.
pub struct Categorizer {
    provider: Arc<dyn EmbeddingProvider>,
    centroids: Vec<(Category, Vector)>,
    dimension: usize,
}

impl Categorizer {
    /// Build centroids for every category in the table
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        Self::with_categories(provider, &Category::ALL)
    }

    /// Build centroids for an explicit set of categories.
    ///
    /// Duplicates are ignored. An empty set yields a categorizer that always
    /// answers with the general fallback.
    pub fn with_categories(
        provider: Arc<dyn EmbeddingProvider>,
        categories: &[Category],
    ) -> Result<Self> {
        let dimension = provider.dimension();
        if dimension == 0 {
            return Err(Error::InvalidConfig(format!(
                "provider '{}' reports a zero embedding dimension",
                provider.name()
            )));
        }

        info!(
            "Computing centroids for {} categories with {} ({})",
            categories.len(),
            provider.name(),
            provider.model()
        );

        let mut centroids: Vec<(Category, Vector)> = Vec::with_capacity(categories.len());
        for &category in categories {
            if centroids.iter().any(|(c, _)| *c == category) {
                continue;
            }
            let centroid = Self::centroid_for(provider.as_ref(), category, dimension).map_err(
                |source| Error::Initialization {
                    category,
                    source: Box::new(source),
                },
            )?;
            debug!(
                "Centroid for '{}' built from {} examples",
                category,
                category.examples().len()
            );
            centroids.push((category, centroid));
        }

        info!("{} category centroids ready (dim {})", centroids.len(), dimension);

        Ok(Self {
            provider,
            centroids,
            dimension,
        })
    }

    fn centroid_for(
        provider: &dyn EmbeddingProvider,
        category: Category,
        dimension: usize,
    ) -> Result<Vector> {
        let examples = category.examples();
        let embeddings = provider.embed_many(examples)?;
        validate_batch(&embeddings, examples.len(), dimension)?;
        Vector::mean(&embeddings)
    }

    /// Classify a question against the cached centroids.
    ///
    /// Blank input short-circuits to the general fallback without touching the
    /// provider. Provider failures are returned to the caller and leave the
    /// centroids untouched.
    pub fn categorize(&self, question: &str) -> Result<CategorizationResult> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(CategorizationResult::general(Method::Empty, None));
        }

        let query = self.provider.embed_one(question)?;
        validate_batch(std::slice::from_ref(&query), 1, self.dimension)?;

        let mut similarities = BTreeMap::new();
        let mut best: Option<(Category, f32)> = None;

        for (category, centroid) in &self.centroids {
            let score = query.cosine_similarity(centroid);
            similarities.insert(*category, score);
            // Strict comparison keeps the first category on ties.
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((*category, score));
            }
        }

        let Some((category, confidence)) = best else {
            return Ok(CategorizationResult::general(
                Method::Embedding,
                Some(similarities),
            ));
        };

        debug!(
            "Question categorized as '{}' with similarity {:.3}",
            category, confidence
        );

        Ok(CategorizationResult {
            category: category.id(),
            category_name: category.display_name(),
            confidence,
            method: Method::Embedding,
            similarities: Some(similarities),
        })
    }

    /// Configured categories, in table order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.centroids.iter().map(|(c, _)| *c)
    }

    pub fn centroid(&self, category: Category) -> Option<&Vector> {
        self.centroids
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, v)| v)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }
}

impl std::fmt::Debug for Categorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Categorizer")
            .field("provider", &self.provider.name())
            .field("categories", &self.centroids.len())
            .field("dimension", &self.dimension)
            .finish()
    }
}
