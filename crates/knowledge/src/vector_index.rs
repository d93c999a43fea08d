//! Vector index abstraction for document chunks.
//!
//! Entries are addressed by position: entry `i` is the vector of chunk `i`.

use scholar_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Number of neighbours returned when the caller has no preference.
pub const DEFAULT_TOP_K: usize = 4;

/// Similarity metric. Larger scores are always more similar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Cosine similarity in [-1, 1]
    #[default]
    Cosine,
    /// Negative Euclidean distance
    L2,
}

impl Metric {
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.to_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "l2" | "euclidean" => Ok(Self::L2),
            other => Err(AppError::Config(format!(
                "Unknown similarity metric: {}. Supported: cosine, l2",
                other
            ))),
        }
    }
}

/// One search result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    /// Position of the matching entry (the chunk index)
    pub index: usize,
    pub score: f32,
}

/// Trait for vector index backends.
pub trait VectorIndex: Send + Sync {
    /// Replace the contents with `vectors`, in chunk order.
    fn build(&mut self, vectors: Vec<Vec<f32>>) -> AppResult<()>;

    /// Return up to `k` entries ordered by decreasing score, ties broken by
    /// lower index.
    fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<SearchHit>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimension, or `None` while empty.
    fn dimensions(&self) -> Option<usize>;
}

/// Exact in-memory index that scores every entry.
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    metric: Metric,
    dimensions: Option<usize>,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            dimensions: None,
            vectors: Vec::new(),
        }
    }

    fn score(&self, stored: &[f32], query: &[f32]) -> f32 {
        match self.metric {
            Metric::Cosine => dot(stored, query),
            Metric::L2 => {
                let distance: f32 = stored
                    .iter()
                    .zip(query)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f32>()
                    .sqrt();
                -distance
            }
        }
    }
}

impl VectorIndex for FlatIndex {
    fn build(&mut self, vectors: Vec<Vec<f32>>) -> AppResult<()> {
        let dimensions = vectors.first().map(Vec::len);

        if let Some(dim) = dimensions {
            if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dim) {
                return Err(AppError::Embedding(format!(
                    "Vector {} has {} dimensions, expected {}",
                    i,
                    v.len(),
                    dim
                )));
            }
        }

        self.vectors = match self.metric {
            Metric::Cosine => vectors.into_iter().map(normalize).collect(),
            Metric::L2 => vectors,
        };
        self.dimensions = dimensions;

        tracing::debug!(
            "Built flat index with {} vectors ({:?}, {:?} dims)",
            self.vectors.len(),
            self.metric,
            self.dimensions
        );

        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<SearchHit>> {
        let Some(dim) = self.dimensions else {
            return Ok(Vec::new());
        };

        if query.len() != dim {
            return Err(AppError::Embedding(format!(
                "Query has {} dimensions, index expects {}",
                query.len(),
                dim
            )));
        }

        let query = match self.metric {
            Metric::Cosine => normalize(query.to_vec()),
            Metric::L2 => query.to_vec(),
        };

        let mut hits: Vec<SearchHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, stored)| SearchHit {
                index,
                score: self.score(stored, &query),
            })
            .collect();

        hits.sort_by(|a, b| match b.score.total_cmp(&a.score) {
            Ordering::Equal => a.index.cmp(&b.index),
            other => other,
        });
        hits.truncate(k);

        Ok(hits)
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Scale to unit length; zero vectors stay zero.
fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = dot(&v, &v).sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(metric: Metric, vectors: Vec<Vec<f32>>) -> FlatIndex {
        let mut index = FlatIndex::new(metric);
        index.build(vectors).unwrap();
        index
    }

    fn order(hits: &[SearchHit]) -> Vec<usize> {
        hits.iter().map(|h| h.index).collect()
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!(Metric::parse("Cosine").unwrap(), Metric::Cosine);
        assert_eq!(Metric::parse("l2").unwrap(), Metric::L2);
        assert!(Metric::parse("manhattan").is_err());
    }

    #[test]
    fn test_cosine_ignores_magnitude() {
        let index = index_of(
            Metric::Cosine,
            vec![vec![10.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
        );
        let hits = index.search(&[2.0, 0.1], 3).unwrap();

        assert_eq!(order(&hits), vec![0, 2, 1]);
        assert!(hits[0].score > 0.99);
    }

    #[test]
    fn test_l2_scores_are_negative_distances() {
        let index = index_of(Metric::L2, vec![vec![0.0, 0.0], vec![3.0, 4.0]]);
        let hits = index.search(&[0.0, 0.0], 2).unwrap();

        assert_eq!(order(&hits), vec![0, 1]);
        assert_eq!(hits[0].score, 0.0);
        assert_eq!(hits[1].score, -5.0);
    }

    #[test]
    fn test_ties_prefer_lower_index() {
        let same = vec![0.6, 0.8];
        let index = index_of(
            Metric::Cosine,
            vec![vec![0.0, 1.0], same.clone(), same.clone(), same],
        );
        let hits = index.search(&[0.6, 0.8], 3).unwrap();
        assert_eq!(order(&hits), vec![1, 2, 3]);
    }

    #[test]
    fn test_k_bounds() {
        let index = index_of(Metric::Cosine, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert!(index.search(&[1.0, 0.0], 0).unwrap().is_empty());
        assert_eq!(index.search(&[1.0, 0.0], 10).unwrap().len(), 2);
    }

    #[test]
    fn test_dimension_checks() {
        let mut index = FlatIndex::new(Metric::Cosine);
        let result = index.build(vec![vec![1.0, 0.0], vec![1.0]]);
        assert!(matches!(result, Err(AppError::Embedding(_))));

        let index = index_of(Metric::Cosine, vec![vec![1.0, 0.0]]);
        assert_eq!(index.dimensions(), Some(2));
        assert!(matches!(
            index.search(&[1.0, 0.0, 0.0], 1),
            Err(AppError::Embedding(_))
        ));
    }

    #[test]
    fn test_empty_index() {
        let index = index_of(Metric::Cosine, Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.dimensions(), None);
        assert!(index.search(&[1.0], 4).unwrap().is_empty());
    }
}
