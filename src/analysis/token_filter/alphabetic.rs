//! Alphabetic filter implementation.
//!
//! Keeps only tokens made entirely of alphabetic characters. Tokens with
//! digits or attached punctuation (`"ID:"`, `"1234"`, `"phone?"`) are
//! removed rather than trimmed.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that removes tokens containing any non-alphabetic character.
#[derive(Clone, Debug, Default)]
pub struct AlphabeticFilter;

impl AlphabeticFilter {
    /// Create a new alphabetic filter.
    pub fn new() -> Self {
        AlphabeticFilter
    }

    /// Whether `text` is non-empty and every char is alphabetic.
    pub fn is_alphabetic(text: &str) -> bool {
        !text.is_empty() && text.chars().all(char::is_alphabetic)
    }
}

impl Filter for AlphabeticFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(
            tokens.filter(|token| Self::is_alphabetic(&token.text)),
        ))
    }

    fn name(&self) -> &'static str {
        "alphabetic"
    }
}
