//! Intent classifier trait definition.

use crate::error::Result;

/// Intent classifier trait.
///
/// `L` is the label set the classifier predicts into.
pub trait IntentClassifier<L>: Send + Sync {
    /// Predict the intent for a given query.
    fn predict(&self, query: &str) -> Result<L>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}
