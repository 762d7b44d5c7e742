//! Intent classification for support queries.
//!
//! Two classifiers share the [`IntentClassifier`] trait:
//! - `KeywordIntentClassifier`: ordered substring rules over live queries,
//!   producing an [`IntentTag`]
//! - `PrototypeIntentClassifier`: nearest labelled prototype in TF-IDF space,
//!   producing a [`TrainingLabel`]; used to measure retrieval accuracy
//!
//! # Example
//!
//! ```
//! use parley::ml::intent_classifier::{self, IntentTag};
//!
//! let classifier = intent_classifier::new_keyword_based();
//! assert_eq!(classifier.predict("where is my order").unwrap(), IntentTag::OrderInfo);
//! ```

mod classifier;
mod core;
mod keyword_classifier;
mod prototype_classifier;
mod types;

// Public exports
pub use classifier::IntentClassifier;
pub use core::{new_keyword_based, new_prototype_based};
pub use keyword_classifier::{DEFAULT_KEYWORD_RULES, KeywordIntentClassifier, KeywordRule};
pub use prototype_classifier::{PrototypeIntentClassifier, ScoredPrediction};
pub use types::{IntentSample, IntentTag, TrainingLabel};
