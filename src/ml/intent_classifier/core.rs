//! Helper functions for creating intent classifiers.

use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::error::Result;
use crate::ml::intent_classifier::classifier::IntentClassifier;
use crate::ml::intent_classifier::keyword_classifier::KeywordIntentClassifier;
use crate::ml::intent_classifier::prototype_classifier::PrototypeIntentClassifier;
use crate::ml::intent_classifier::types::{IntentSample, IntentTag, TrainingLabel};

/// Create the keyword classifier with the default rule table.
pub fn new_keyword_based() -> Arc<dyn IntentClassifier<IntentTag>> {
    Arc::new(KeywordIntentClassifier::default())
}

/// Create a prototype classifier from labelled samples.
pub fn new_prototype_based(
    samples: &[IntentSample],
    analyzer: Arc<dyn Analyzer>,
) -> Result<Box<dyn IntentClassifier<TrainingLabel>>> {
    Ok(Box::new(PrototypeIntentClassifier::new(samples, analyzer)?))
}
