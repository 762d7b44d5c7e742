//! # Parley
//!
//! Retrieval-based customer-support answering for Rust.
//!
//! ## Features
//!
//! - TF-IDF vector space over a labeled JSONL corpus
//! - Cosine similarity matching with a fixed confidence threshold
//! - Keyword intent tagging and user-scoped record substitution
//! - Product, order and user lookup tables
//! - Reproducible train/test evaluation of retrieval accuracy
//! - Atomic retraining behind a snapshot handle
//!
//! ```
//! use std::sync::Arc;
//!
//! use parley::corpus::{Dataset, Record, StaticSource};
//! use parley::engine::SupportEngine;
//!
//! let dataset = Dataset::from(vec![Record::new(
//!     "Get product details",
//!     "Product Name: Widget",
//!     "The Widget is great.",
//! )]);
//! let engine = SupportEngine::new(Arc::new(StaticSource::new(dataset)));
//!
//! assert_eq!(engine.answer("tell me about the widget", None), "The Widget is great.");
//! ```

pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod ml;
pub mod responder;

pub mod prelude {
    pub use crate::config::{EngineConfig, initialize};
    pub use crate::corpus::{CorpusSource, Dataset, FileSource, Record, StaticSource};
    pub use crate::engine::{EngineStats, SupportEngine};
    pub use crate::error::{ParleyError, Result};
    pub use crate::responder::{NO_MATCH_RESPONSE, Resolution};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
