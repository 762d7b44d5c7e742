//! Text analysis for support queries and corpus records.
//!
//! Raw text flows through a tokenizer and a chain of filters before it is
//! vectorized:
//!
//! ```text
//! Whitespace → Lowercase → Alphabetic → Stop Words → terms
//! ```
//!
//! [`analyzer::preprocess`] is the infallible entry point used by the
//! vectorizer: it always yields a (possibly empty) term list.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer, SupportAnalyzer, preprocess};
pub use token::{Token, TokenStream};
