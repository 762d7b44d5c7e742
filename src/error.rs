//! Error types for the Parley library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`ParleyError`] enum. Two outcomes of query answering are deliberately
//! *not* errors: a below-threshold match and an internal failure while
//! resolving a query are both reported as
//! [`Resolution`](crate::responder::Resolution) variants, because the
//! answering boundary never raises.
//!
//! # Examples
//!
//! ```
//! use parley::error::{ParleyError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ParleyError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Parley operations.
#[derive(Error, Debug)]
pub enum ParleyError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A vectorizer was asked to transform text before it was fitted.
    #[error("Vectorizer not fitted: {0}")]
    NotFitted(String),

    /// The corpus could not be obtained (missing file, failed fetch, bad link).
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// A corpus line failed to parse or validate as a record.
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// An error carrying context added at the command line boundary.
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with ParleyError.
pub type Result<T> = std::result::Result<T, ParleyError>;

impl ParleyError {
    /// Create a new not-fitted error.
    pub fn not_fitted<S: Into<String>>(msg: S) -> Self {
        ParleyError::NotFitted(msg.into())
    }

    /// Create a new source-unavailable error.
    pub fn source_unavailable<S: Into<String>>(msg: S) -> Self {
        ParleyError::SourceUnavailable(msg.into())
    }

    /// Create a new malformed-record error for a 1-based line number.
    pub fn malformed_record<S: Into<String>>(line: usize, reason: S) -> Self {
        ParleyError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        ParleyError::InvalidArgument(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        ParleyError::Analysis(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ParleyError::Other(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        ParleyError::InvalidArgument(format!("Invalid configuration: {}", msg.into()))
    }

    /// Whether this error means "no data could be obtained" rather than a
    /// defect in data that was obtained.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, ParleyError::SourceUnavailable(_) | ParleyError::Io(_))
    }
}
