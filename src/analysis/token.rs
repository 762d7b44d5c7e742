//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows through the analysis pipeline. Filters
//! rewrite a token's text or drop it from the stream; positions always refer
//! to the tokenizer's output, so a dropped token leaves a gap.
//!
//! # Examples
//!
//! ```
//! use parley::analysis::token::Token;
//!
//! let token = Token::with_offsets("widget", 3, 17, 23);
//! assert_eq!(token.text, "widget");
//! assert_eq!(token.position, 3);
//! assert_eq!(token.span(), 17..23);
//! ```

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A single term produced by a tokenizer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Current text; filters may rewrite it.
    pub text: String,

    /// Index of the token in the tokenizer output (0-based).
    pub position: usize,

    /// Byte offset of the first char in the source text.
    pub start_offset: usize,

    /// Byte offset one past the last char in the source text.
    pub end_offset: usize,
}

impl Token {
    /// Create a token without source offsets.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Self::with_offsets(text, position, 0, 0)
    }

    /// Create a token that remembers where it came from in the source text.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
        }
    }

    /// Byte range of the token in the source text.
    pub fn span(&self) -> Range<usize> {
        self.start_offset..self.end_offset
    }

    /// Replace the text, keeping position and offsets.
    pub fn map_text<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&str) -> String,
    {
        self.text = f(&self.text);
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Sequence of tokens handed from one pipeline stage to the next.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;
