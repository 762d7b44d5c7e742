//! Analyzers that combine a tokenizer with a chain of filters.

use std::sync::{Arc, LazyLock};

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{AlphabeticFilter, Filter, LowercaseFilter, StopFilter};
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Analyze `text` into plain term strings.
    ///
    /// Never fails: if the pipeline errors the failure is logged and an
    /// empty term list is returned, so vectorization always has input.
    fn terms(&self, text: &str) -> Vec<String> {
        match self.analyze(text) {
            Ok(tokens) => tokens.map(|token| token.text).collect(),
            Err(e) => {
                log::error!("Error in text preprocessing: {e}");
                Vec::new()
            }
        }
    }
}

/// A configurable analyzer that combines a tokenizer with a chain of filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Get the filters used by this analyzer.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = self.tokenizer.tokenize(text)?;

        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }

        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The analyzer used for both corpus records and incoming queries.
///
/// Whitespace split, lowercase, keep purely alphabetic tokens, then drop
/// stop words.
#[derive(Clone, Debug)]
pub struct SupportAnalyzer {
    inner: PipelineAnalyzer,
}

impl SupportAnalyzer {
    /// Create the default support analyzer.
    pub fn new() -> Self {
        let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(AlphabeticFilter::new()))
            .add_filter(Arc::new(StopFilter::new()));

        SupportAnalyzer { inner: analyzer }
    }

    /// Get the inner pipeline analyzer.
    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

impl Default for SupportAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for SupportAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "support"
    }
}

static SUPPORT_ANALYZER: LazyLock<SupportAnalyzer> = LazyLock::new(SupportAnalyzer::new);

/// Normalize raw text into the term sequence used for vectorization.
///
/// # Examples
///
/// ```
/// use parley::analysis::preprocess;
///
/// assert_eq!(
///     preprocess("Tell me about the Widget, please"),
///     vec!["tell", "me", "about", "please"]
/// );
/// ```
pub fn preprocess(text: &str) -> Vec<String> {
    SUPPORT_ANALYZER.terms(text)
}
