//! Similarity computation for embeddings.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{EmbeddingError, Result};

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors (or a zero vector on either side)
/// - -1.0 means opposite vectors
///
/// NaN or infinite components are an `InvalidResponse` error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    if !a.iter().chain(b).all(|x| x.is_finite()) {
        return Err(EmbeddingError::InvalidResponse(
            "embedding contains non-finite values".to_string(),
        ));
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let magnitude_a = magnitude(a);
    let magnitude_b = magnitude(b);

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (magnitude_a * magnitude_b)).clamp(-1.0, 1.0))
}

fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// A similarity search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityResult<T> {
    /// The matched item.
    pub item: T,

    /// Cosine similarity in [-1, 1].
    pub score: f32,

    /// Insertion position of the item in its index.
    pub position: usize,
}

/// Rank `candidates` against `query` and keep the best `k`.
///
/// Returns `(position, score)` pairs ordered by descending score. Equal
/// scores keep candidate order.
pub fn find_top_k<'a, I>(query: &[f32], candidates: I, k: usize) -> Result<Vec<(usize, f32)>>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut scored = Vec::new();
    for (position, embedding) in candidates.into_iter().enumerate() {
        let score = cosine_similarity(query, embedding)?;
        scored.push((position, OrderedFloat(score)));
    }

    // Stable sort, so ties stay in insertion order.
    scored.sort_by_key(|&(_, score)| Reverse(score));
    scored.truncate(k);

    Ok(scored
        .into_iter()
        .map(|(position, score)| (position, score.0))
        .collect())
}
