//! Answers a single query against one consistent corpus snapshot.
//!
//! Resolution never fails outward: every error along the way becomes
//! [`Resolution::InternalFailure`], which renders the same apology text as a
//! query without a confident match.

use std::fmt;
use std::sync::Arc;

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::corpus::Dataset;
use crate::error::{ParleyError, Result};
use crate::ml::intent_classifier::{self, IntentClassifier, IntentTag};
use crate::ml::similarity::best_match;
use crate::ml::vectorizer::TfIdfVectorizer;

/// Text returned when no record can be trusted to answer a query.
pub const NO_MATCH_RESPONSE: &str = "I'm sorry, I don't understand your query. Could you please be more specific about product, order, or account information?";

/// Marker an alternate record's input must carry to be substituted.
pub const USER_ID_MARKER: &str = "User ID:";

/// Instruction substrings that make a matched record eligible for substitution.
pub const USER_LOOKUP_INSTRUCTIONS: &[&str] = &["check user", "retrieve user"];

/// How a query was resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// The best-matching record answers the query.
    Matched { index: usize, score: f64 },
    /// A user-scoped alternate of the matched record answers the query.
    Substituted {
        index: usize,
        matched_index: usize,
        score: f64,
    },
    /// The best score did not clear the threshold.
    NoConfidentMatch { score: f64 },
    /// Something went wrong while resolving.
    InternalFailure { reason: String },
}

impl Resolution {
    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::Matched { .. } => "matched",
            Resolution::Substituted { .. } => "substituted",
            Resolution::NoConfidentMatch { .. } => "no_confident_match",
            Resolution::InternalFailure { .. } => "internal_failure",
        }
    }

    /// Index of the record whose output answers the query.
    pub fn index(&self) -> Option<usize> {
        match self {
            Resolution::Matched { index, .. } | Resolution::Substituted { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }

    /// Similarity of the best match, when one was scored.
    pub fn score(&self) -> Option<f64> {
        match self {
            Resolution::Matched { score, .. }
            | Resolution::Substituted { score, .. }
            | Resolution::NoConfidentMatch { score } => Some(*score),
            Resolution::InternalFailure { .. } => None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.index().is_some()
    }

    /// User-facing text for this resolution against the dataset it came from.
    pub fn text<'a>(&self, dataset: &'a Dataset) -> &'a str {
        self.index()
            .and_then(|index| dataset.get(index))
            .map(|record| record.output.as_str())
            .unwrap_or(NO_MATCH_RESPONSE)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Matched { index, score } => {
                write!(f, "matched record {index} (score {score:.4})")
            }
            Resolution::Substituted {
                index,
                matched_index,
                score,
            } => write!(
                f,
                "substituted record {index} for {matched_index} (score {score:.4})"
            ),
            Resolution::NoConfidentMatch { score } => {
                write!(f, "no confident match (best score {score:.4})")
            }
            Resolution::InternalFailure { reason } => write!(f, "internal failure: {reason}"),
        }
    }
}

/// Whether a matched instruction asks to look up a user.
pub fn is_user_lookup(instruction: &str) -> bool {
    let lowered = instruction.to_lowercase();
    USER_LOOKUP_INSTRUCTIONS
        .iter()
        .any(|needle| lowered.contains(needle))
}

/// First record other than `matched` with the same instruction and a user id marker.
pub fn find_user_alternate(dataset: &Dataset, matched: usize) -> Option<usize> {
    let instruction = &dataset.get(matched)?.instruction;
    dataset
        .iter()
        .enumerate()
        .find(|(index, record)| {
            *index != matched
                && record.instruction == *instruction
                && record.input.contains(USER_ID_MARKER)
        })
        .map(|(index, _)| index)
}

/// Turns a query into a [`Resolution`].
pub struct QueryResponder {
    classifier: Arc<dyn IntentClassifier<IntentTag>>,
}

impl fmt::Debug for QueryResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryResponder")
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

impl Default for QueryResponder {
    fn default() -> Self {
        Self::new(intent_classifier::new_keyword_based())
    }
}

impl QueryResponder {
    pub fn new(classifier: Arc<dyn IntentClassifier<IntentTag>>) -> Self {
        QueryResponder { classifier }
    }

    pub fn classifier(&self) -> &Arc<dyn IntentClassifier<IntentTag>> {
        &self.classifier
    }

    /// Resolve `query` against `dataset` and the vectorizer fitted on it.
    ///
    /// An empty `user_id` counts as absent.
    pub fn resolve(
        &self,
        dataset: &Dataset,
        vectorizer: &TfIdfVectorizer,
        query: &str,
        user_id: Option<&str>,
    ) -> Resolution {
        match self.try_resolve(dataset, vectorizer, query, user_id) {
            Ok(resolution) => {
                debug!("Resolved {query:?}: {resolution}");
                resolution
            }
            Err(e) => {
                error!("Error processing query: {e}");
                Resolution::InternalFailure {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Resolve and render the user-facing text.
    pub fn answer(
        &self,
        dataset: &Dataset,
        vectorizer: &TfIdfVectorizer,
        query: &str,
        user_id: Option<&str>,
    ) -> String {
        self.resolve(dataset, vectorizer, query, user_id)
            .text(dataset)
            .to_string()
    }

    fn try_resolve(
        &self,
        dataset: &Dataset,
        vectorizer: &TfIdfVectorizer,
        query: &str,
        user_id: Option<&str>,
    ) -> Result<Resolution> {
        let intent = self.classifier.predict(query)?;
        debug!("Query intent: {intent}");

        let space = vectorizer.space()?;
        if space.len() != dataset.len() {
            return Err(ParleyError::other(format!(
                "vector space has {} rows but dataset has {} records",
                space.len(),
                dataset.len()
            )));
        }

        let query_vector = vectorizer.transform(query)?;
        let Some(best) = best_match(&query_vector, space.rows()) else {
            return Ok(Resolution::NoConfidentMatch { score: 0.0 });
        };
        if !best.is_confident() {
            return Ok(Resolution::NoConfidentMatch { score: best.score });
        }

        let matched = dataset.get(best.index).ok_or_else(|| {
            ParleyError::other(format!("matched row {} has no record", best.index))
        })?;

        let has_user = user_id.is_some_and(|id| !id.is_empty());
        if has_user && is_user_lookup(&matched.instruction) {
            // TODO: rank alternates by similarity to "<instruction> User ID: <id>"
            // instead of taking the first one in dataset order.
            if let Some(index) = find_user_alternate(dataset, best.index) {
                return Ok(Resolution::Substituted {
                    index,
                    matched_index: best.index,
                    score: best.score,
                });
            }
        }

        Ok(Resolution::Matched {
            index: best.index,
            score: best.score,
        })
    }
}
