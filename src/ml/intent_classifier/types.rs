//! Label types for intent classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParleyError;

/// Coarse category of a live support query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentTag {
    /// Orders, purchases, deliveries.
    OrderInfo,
    /// Products, prices, items.
    ProductInfo,
    /// Accounts, profiles, sign-in.
    AccountInfo,
    /// Addresses and shipping locations.
    AddressInfo,
    /// Coin balances and credit.
    BalanceInfo,
    /// Anything else.
    General,
}

impl IntentTag {
    /// Snake-case name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentTag::OrderInfo => "order_info",
            IntentTag::ProductInfo => "product_info",
            IntentTag::AccountInfo => "account_info",
            IntentTag::AddressInfo => "address_info",
            IntentTag::BalanceInfo => "balance_info",
            IntentTag::General => "general",
        }
    }
}

impl fmt::Display for IntentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label assigned to corpus records for evaluating retrieval accuracy.
///
/// Derived from the record's instruction, and deliberately coarser than
/// [`IntentTag`]. Declaration order is the order in which prototype groups
/// are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingLabel {
    ProductInfo,
    OrderInfo,
    BalanceInfo,
    AddressInfo,
    OrderStatus,
    General,
}

impl TrainingLabel {
    /// Every label in scoring order.
    pub const ALL: [TrainingLabel; 6] = [
        TrainingLabel::ProductInfo,
        TrainingLabel::OrderInfo,
        TrainingLabel::BalanceInfo,
        TrainingLabel::AddressInfo,
        TrainingLabel::OrderStatus,
        TrainingLabel::General,
    ];

    /// Snake-case name of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingLabel::ProductInfo => "product_info",
            TrainingLabel::OrderInfo => "order_info",
            TrainingLabel::BalanceInfo => "balance_info",
            TrainingLabel::AddressInfo => "address_info",
            TrainingLabel::OrderStatus => "order_status",
            TrainingLabel::General => "general",
        }
    }
}

impl fmt::Display for TrainingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingLabel {
    type Err = ParleyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrainingLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| ParleyError::invalid_argument(format!("unknown training label: {s}")))
    }
}

/// Training sample for the prototype classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentSample {
    /// Text that will be vectorized.
    pub text: String,
    /// Label of the sample.
    pub label: TrainingLabel,
}

impl IntentSample {
    /// Create a new sample.
    pub fn new<S: Into<String>>(text: S, label: TrainingLabel) -> Self {
        IntentSample {
            text: text.into(),
            label,
        }
    }
}
