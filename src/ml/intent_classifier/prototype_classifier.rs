//! Nearest-prototype intent classifier using TF-IDF.
//!
//! Every training sample becomes a prototype of its label. A query is scored
//! against each label by its best prototype similarity; the best label wins
//! if that score clears [`MATCH_THRESHOLD`], otherwise the prediction falls
//! back to [`TrainingLabel::General`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::Analyzer;
use crate::error::{ParleyError, Result};
use crate::ml::similarity::{MATCH_THRESHOLD, max_similarity};
use crate::ml::vectorizer::{SparseVector, TfIdfVectorizer};

use super::classifier::IntentClassifier;
use super::types::{IntentSample, TrainingLabel};

/// A prediction together with the score that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredPrediction {
    /// Predicted label.
    pub label: TrainingLabel,
    /// Best group similarity, or -1 when there are no groups.
    pub score: f64,
}

/// Nearest-prototype classifier over a TF-IDF space.
#[derive(Debug)]
pub struct PrototypeIntentClassifier {
    /// TF-IDF vectorizer fitted on the training samples only.
    vectorizer: TfIdfVectorizer,
    /// Training data: label -> feature vectors, iterated in label order.
    prototypes: BTreeMap<TrainingLabel, Vec<SparseVector>>,
}

impl PrototypeIntentClassifier {
    /// Train a classifier from samples with the specified analyzer.
    pub fn new(samples: &[IntentSample], analyzer: Arc<dyn Analyzer>) -> Result<Self> {
        if samples.is_empty() {
            return Err(ParleyError::invalid_argument(
                "Training samples cannot be empty",
            ));
        }

        let documents: Vec<String> = samples.iter().map(|s| s.text.clone()).collect();

        let mut vectorizer = TfIdfVectorizer::new(analyzer);
        let space = vectorizer.fit(&documents)?;

        // Rows are aligned with `samples`.
        let mut prototypes: BTreeMap<TrainingLabel, Vec<SparseVector>> = BTreeMap::new();
        for (sample, row) in samples.iter().zip(space.rows()) {
            prototypes.entry(sample.label).or_default().push(row.clone());
        }

        Ok(Self {
            vectorizer,
            prototypes,
        })
    }

    /// Predict a label and report the winning score.
    pub fn predict_scored(&self, query: &str) -> Result<ScoredPrediction> {
        let query_features = self.vectorizer.transform(query)?;

        let mut best_score = -1.0;
        let mut best_label = None;

        for (label, vectors) in &self.prototypes {
            if let Some(score) = max_similarity(&query_features, vectors) {
                if score > best_score {
                    best_score = score;
                    best_label = Some(*label);
                }
            }
        }

        let label = match best_label {
            Some(label) if best_score > MATCH_THRESHOLD => label,
            _ => TrainingLabel::General,
        };

        Ok(ScoredPrediction {
            label,
            score: best_score,
        })
    }

    /// Labels that have at least one prototype, in scoring order.
    pub fn labels(&self) -> impl Iterator<Item = TrainingLabel> + '_ {
        self.prototypes.keys().copied()
    }

    /// Number of prototypes stored for `label`.
    pub fn prototype_count(&self, label: TrainingLabel) -> usize {
        self.prototypes.get(&label).map_or(0, Vec::len)
    }

    /// The fitted vectorizer.
    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }
}

impl IntentClassifier<TrainingLabel> for PrototypeIntentClassifier {
    fn predict(&self, query: &str) -> Result<TrainingLabel> {
        Ok(self.predict_scored(query)?.label)
    }

    fn name(&self) -> &str {
        "prototype"
    }
}
