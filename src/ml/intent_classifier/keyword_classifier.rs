//! Keyword-based intent classifier.
//!
//! Rules are checked in table order and the first rule with any keyword
//! present in the lowercased query wins. Keywords match as substrings, so
//! "orders" and "reorder" both trigger `order`.

use crate::error::Result;

use super::classifier::IntentClassifier;
use super::types::IntentTag;

/// Default rule table, in priority order.
pub const DEFAULT_KEYWORD_RULES: &[(IntentTag, &[&str])] = &[
    (IntentTag::OrderInfo, &["order", "buy", "purchase", "delivery"]),
    (IntentTag::ProductInfo, &["product", "item", "price", "cost"]),
    (IntentTag::AccountInfo, &["account", "profile", "login", "sign"]),
    (IntentTag::AddressInfo, &["address", "shipping", "location"]),
    (IntentTag::BalanceInfo, &["coin", "balance", "credit"]),
];

/// One entry of the ordered rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    /// Tag assigned when the rule fires.
    pub tag: IntentTag,
    /// Lowercase keywords, any of which fires the rule.
    pub keywords: Vec<String>,
}

impl KeywordRule {
    /// Create a rule; keywords are lowercased.
    pub fn new<I, S>(tag: IntentTag, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        KeywordRule {
            tag,
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Whether any keyword occurs in the already-lowercased query.
    fn fires(&self, lowered_query: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowered_query.contains(keyword.as_str()))
    }
}

/// Keyword-based intent classifier.
#[derive(Debug, Clone)]
pub struct KeywordIntentClassifier {
    rules: Vec<KeywordRule>,
}

impl KeywordIntentClassifier {
    /// Create a classifier from an ordered rule table.
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// The rule table in priority order.
    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Classify a query. Queries no rule fires on are [`IntentTag::General`].
    pub fn classify(&self, query: &str) -> IntentTag {
        let lowered = query.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.fires(&lowered))
            .map(|rule| rule.tag)
            .unwrap_or(IntentTag::General)
    }
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_KEYWORD_RULES
                .iter()
                .map(|(tag, keywords)| KeywordRule::new(*tag, keywords.iter()))
                .collect(),
        )
    }
}

impl IntentClassifier<IntentTag> for KeywordIntentClassifier {
    fn predict(&self, query: &str) -> Result<IntentTag> {
        Ok(self.classify(query))
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
