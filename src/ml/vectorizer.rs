//! TF-IDF vectorizer for text feature extraction.
//!
//! [`TfIdfVectorizer::fit`] builds a [`VectorSpace`]: a sorted vocabulary,
//! smoothed inverse document frequencies, and one L2-normalised sparse row
//! per input document, aligned by index with the input order. There is no
//! incremental update; new vocabulary requires a full refit.

use std::collections::BTreeSet;
use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::Analyzer;
use crate::analysis::SupportAnalyzer;
use crate::error::{ParleyError, Result};

/// A sparse vector of `(dimension, weight)` pairs sorted by dimension.
///
/// Zero weights are never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Create an empty (all-zero) vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vector from arbitrary `(dimension, weight)` pairs.
    ///
    /// Pairs are sorted, duplicate dimensions are summed and zeros dropped.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut entries: Vec<(usize, f64)> = entries.into_iter().collect();
        entries.sort_by_key(|&(dim, _)| dim);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (dim, weight) in entries {
            match merged.last_mut() {
                Some((last_dim, last_weight)) if *last_dim == dim => *last_weight += weight,
                _ => merged.push((dim, weight)),
            }
        }
        merged.retain(|&(_, weight)| weight != 0.0);

        SparseVector { entries: merged }
    }

    /// The stored `(dimension, weight)` pairs.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Weight at `dim` (zero when absent).
    pub fn get(&self, dim: usize) -> f64 {
        self.entries
            .binary_search_by_key(&dim, |&(d, _)| d)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Number of non-zero dimensions.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Whether every weight is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product by merging the two sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_dim, a_weight) = self.entries[i];
            let (b_dim, b_weight) = other.entries[j];
            if a_dim == b_dim {
                sum += a_weight * b_weight;
                i += 1;
                j += 1;
            } else if a_dim < b_dim {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Scale to unit length. Zero vectors are left untouched.
    fn normalize(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, weight) in &mut self.entries {
                *weight /= norm;
            }
        }
        self
    }
}

/// An immutable fitted vocabulary plus one weight row per fitted document.
#[derive(Debug, Clone, Default)]
pub struct VectorSpace {
    /// Term -> dimension.
    vocabulary: AHashMap<String, usize>,
    /// Dimension -> term, sorted.
    terms: Vec<String>,
    /// Inverse document frequency per dimension.
    idf: Vec<f64>,
    /// One row per fitted document.
    rows: Vec<SparseVector>,
}

impl VectorSpace {
    /// Number of distinct terms.
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Number of fitted documents (matrix rows).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the space was fitted on zero documents.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The weight matrix, one row per fitted document.
    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// Dimension of `term`, if it is in the vocabulary.
    pub fn dimension_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Term at `dim`.
    pub fn term(&self, dim: usize) -> Option<&str> {
        self.terms.get(dim).map(String::as_str)
    }

    /// Inverse document frequency of `term`.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.dimension_of(term).map(|dim| self.idf[dim])
    }

    /// Weight already-analyzed terms into this space.
    ///
    /// Terms outside the vocabulary contribute nothing.
    fn weigh(&self, terms: &[String]) -> SparseVector {
        let entries = terms
            .iter()
            .filter_map(|term| self.vocabulary.get(term.as_str()))
            .map(|&dim| (dim, self.idf[dim]));
        SparseVector::from_entries(entries).normalize()
    }
}

/// TF-IDF vectorizer for text feature extraction.
pub struct TfIdfVectorizer {
    /// Analyzer for tokenization.
    analyzer: Arc<dyn Analyzer>,
    /// Present once `fit` has run.
    space: Option<VectorSpace>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field(
                "vocabulary_size",
                &self.space.as_ref().map(VectorSpace::vocabulary_size),
            )
            .field("n_documents", &self.space.as_ref().map(VectorSpace::len))
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new(Arc::new(SupportAnalyzer::new()))
    }
}

impl TfIdfVectorizer {
    /// Create a new, unfitted TF-IDF vectorizer with the specified analyzer.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            analyzer,
            space: None,
        }
    }

    /// Fit the vectorizer on training documents, replacing any previous fit.
    ///
    /// Fitting an empty corpus is allowed and yields an empty space.
    pub fn fit(&mut self, documents: &[String]) -> Result<&VectorSpace> {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| self.analyzer.terms(doc))
            .collect();

        let mut document_frequency: AHashMap<&str, usize> = AHashMap::new();
        for tokens in &tokenized {
            let unique_tokens: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
            for token in unique_tokens {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        // Sorted term order keeps dimensions stable across runs.
        let mut terms: Vec<String> = document_frequency.keys().map(|t| t.to_string()).collect();
        terms.sort_unstable();

        let vocabulary: AHashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();

        // IDF = ln((N + 1) / (df + 1)) + 1
        let n_documents = documents.len() as f64;
        let idf: Vec<f64> = terms
            .iter()
            .map(|term| {
                let df = document_frequency.get(term.as_str()).copied().unwrap_or(0) as f64;
                ((n_documents + 1.0) / (df + 1.0)).ln() + 1.0
            })
            .collect();

        let mut space = VectorSpace {
            vocabulary,
            terms,
            idf,
            rows: Vec::new(),
        };
        space.rows = tokenized.iter().map(|tokens| space.weigh(tokens)).collect();

        log::debug!(
            "Fitted TF-IDF space: {} documents, {} terms",
            space.len(),
            space.vocabulary_size()
        );

        Ok(self.space.insert(space))
    }

    /// Transform a document into the fitted space.
    pub fn transform(&self, document: &str) -> Result<SparseVector> {
        let space = self.space()?;
        Ok(space.weigh(&self.analyzer.terms(document)))
    }

    /// The fitted space.
    pub fn space(&self) -> Result<&VectorSpace> {
        self.space
            .as_ref()
            .ok_or_else(|| ParleyError::not_fitted("call fit before transform"))
    }

    /// Whether `fit` has been called.
    pub fn is_fitted(&self) -> bool {
        self.space.is_some()
    }

    /// Get the size of the vocabulary (zero before fitting).
    pub fn vocabulary_size(&self) -> usize {
        self.space
            .as_ref()
            .map(VectorSpace::vocabulary_size)
            .unwrap_or(0)
    }

    /// The analyzer shared by fit and transform.
    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }
}
