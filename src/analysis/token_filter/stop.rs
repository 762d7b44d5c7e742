//! Stop word removal.
//!
//! Function words carry no signal when a support query is matched against
//! corpus records, so they are dropped before vectorization. Matching is
//! exact; put this filter after lowercasing.
//!
//! # Examples
//!
//! ```
//! use parley::analysis::token_filter::Filter;
//! use parley::analysis::token_filter::stop::StopFilter;
//! use parley::analysis::token::Token;
//!
//! let tokens = vec![
//!     Token::new("the", 0),
//!     Token::new("order", 1),
//!     Token::new("status", 2),
//! ];
//!
//! let kept: Vec<_> = StopFilter::new()
//!     .filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .map(|token| token.text)
//!     .collect();
//!
//! assert_eq!(kept, vec!["order", "status"]);
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// English function words removed from queries and records.
pub const SUPPORT_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "because", "as", "what", "which", "this", "that",
    "these", "those", "then", "just", "so", "than", "such", "can", "will", "should", "now", "with",
    "for", "from", "to", "of", "at", "by", "in",
];

static SUPPORT_STOP_SET: LazyLock<Arc<HashSet<String>>> = LazyLock::new(|| {
    Arc::new(SUPPORT_STOP_WORDS.iter().map(|w| w.to_string()).collect())
});

/// Drops tokens whose text is in the stop set.
#[derive(Clone, Debug)]
pub struct StopFilter {
    words: Arc<HashSet<String>>,
}

impl StopFilter {
    /// Stop filter over [`SUPPORT_STOP_WORDS`].
    pub fn new() -> Self {
        StopFilter {
            words: Arc::clone(&SUPPORT_STOP_SET),
        }
    }

    /// Stop filter over a caller-supplied word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            words: Arc::new(words.into_iter().map(Into::into).collect()),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let words = Arc::clone(&self.words);
        Ok(Box::new(
            tokens.filter(move |token| !words.contains(token.text.as_str())),
        ))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
