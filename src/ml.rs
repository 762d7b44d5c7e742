//! Retrieval and classification for the support engine.
//!
//! The vectorizer builds the TF-IDF space over corpus records, similarity
//! search picks the closest record, and the intent classifiers plus the
//! evaluation harness sit on top of the same space.

pub mod evaluation;
pub mod intent_classifier;
pub mod similarity;
pub mod vectorizer;
