//! Cosine similarity search over a fitted weight matrix.
//!
//! A match is only trusted when its score is strictly greater than
//! [`MATCH_THRESHOLD`].

use serde::{Deserialize, Serialize};

use crate::ml::vectorizer::SparseVector;

/// Minimum similarity (exclusive) for a match to count as confident.
pub const MATCH_THRESHOLD: f64 = 0.30;

/// Whether `score` clears [`MATCH_THRESHOLD`].
pub fn is_confident(score: f64) -> bool {
    score > MATCH_THRESHOLD
}

/// Calculate cosine similarity between two vectors, in `[-1, 1]`.
///
/// Returns 0 when either vector is all zeros.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let magnitude_a = a.norm();
    let magnitude_b = b.norm();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        0.0
    } else {
        (a.dot(b) / (magnitude_a * magnitude_b)).clamp(-1.0, 1.0)
    }
}

/// The best-scoring row for a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Row index, which is also the dataset position.
    pub index: usize,
    /// Cosine similarity of that row to the query.
    pub score: f64,
}

impl MatchResult {
    /// Whether this match clears the confidence threshold.
    pub fn is_confident(&self) -> bool {
        is_confident(self.score)
    }
}

/// Find the row most similar to `query`.
///
/// Ties resolve to the lowest index. Returns `None` only when `rows` is empty.
pub fn best_match(query: &SparseVector, rows: &[SparseVector]) -> Option<MatchResult> {
    let mut best: Option<MatchResult> = None;

    for (index, row) in rows.iter().enumerate() {
        let score = cosine_similarity(query, row);
        match best {
            Some(current) if score <= current.score => {}
            _ => best = Some(MatchResult { index, score }),
        }
    }

    best
}

/// Highest similarity between `query` and any of `rows`.
pub fn max_similarity(query: &SparseVector, rows: &[SparseVector]) -> Option<f64> {
    best_match(query, rows).map(|m| m.score)
}
