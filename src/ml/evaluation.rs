//! Train/test evaluation of retrieval accuracy.
//!
//! Records are labelled from their instruction, split reproducibly, and the
//! test side is classified against prototype groups fitted on the training
//! side only. The harness is diagnostic and never touches serving state.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::analysis::{Analyzer, SupportAnalyzer};
use crate::corpus::{Dataset, Record};
use crate::error::{ParleyError, Result};
use crate::ml::intent_classifier::{
    IntentClassifier, IntentSample, PrototypeIntentClassifier, TrainingLabel,
};

/// Seed used for the train/test shuffle unless overridden.
pub const DEFAULT_SEED: u64 = 42;

/// Share of records held out for testing unless overridden.
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Instruction substrings that assign a training label, in priority order.
pub const TRAINING_LABEL_RULES: &[(&str, TrainingLabel)] = &[
    ("product details", TrainingLabel::ProductInfo),
    ("order details", TrainingLabel::OrderInfo),
    ("user coin balance", TrainingLabel::BalanceInfo),
    ("user address", TrainingLabel::AddressInfo),
    ("canceled order", TrainingLabel::OrderStatus),
];

/// Derive the training label of a record from its instruction.
pub fn derive_label(instruction: &str) -> TrainingLabel {
    let lowered = instruction.to_lowercase();
    TRAINING_LABEL_RULES
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, label)| *label)
        .unwrap_or(TrainingLabel::General)
}

/// A reproducible partition of a slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Split<T> {
    pub train: Vec<T>,
    pub test: Vec<T>,
}

/// Shuffle `items` with a seeded RNG and hold out `ceil(len * test_ratio)`.
///
/// The same seed always yields the same partition. Fails when either side
/// would be empty.
pub fn train_test_split<T: Clone>(items: &[T], test_ratio: f64, seed: u64) -> Result<Split<T>> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(ParleyError::invalid_argument(format!(
            "test ratio must be between 0 and 1, got {test_ratio}"
        )));
    }
    if items.len() < 2 {
        return Err(ParleyError::invalid_argument(format!(
            "at least 2 records are needed to split, got {}",
            items.len()
        )));
    }

    let test_size = (items.len() as f64 * test_ratio).ceil() as usize;
    if test_size == 0 || test_size >= items.len() {
        return Err(ParleyError::invalid_argument(format!(
            "test ratio {test_ratio} leaves an empty split for {} records",
            items.len()
        )));
    }

    let mut indices: Vec<usize> = (0..items.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_indices, train_indices) = indices.split_at(test_size);
    Ok(Split {
        train: train_indices.iter().map(|&i| items[i].clone()).collect(),
        test: test_indices.iter().map(|&i| items[i].clone()).collect(),
    })
}

/// Precision, recall and F1 for one label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: TrainingLabel,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of test records whose true label is `label`.
    pub support: usize,
}

/// Averaged metrics across labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class classification summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// One entry per label seen in either truth or predictions, in label order.
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ClassificationReport {
    /// Build a report from aligned truth and prediction slices.
    pub fn from_predictions(actual: &[TrainingLabel], predicted: &[TrainingLabel]) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(ParleyError::invalid_argument(format!(
                "{} true labels but {} predictions",
                actual.len(),
                predicted.len()
            )));
        }

        let labels: BTreeSet<TrainingLabel> =
            actual.iter().chain(predicted.iter()).copied().collect();
        let pairs = || actual.iter().zip(predicted.iter());

        let classes: Vec<ClassMetrics> = labels
            .into_iter()
            .map(|label| {
                let true_positive = pairs().filter(|(a, p)| **a == label && **p == label).count();
                let predicted_count = predicted.iter().filter(|p| **p == label).count();
                let support = actual.iter().filter(|a| **a == label).count();

                let precision = ratio(true_positive, predicted_count);
                let recall = ratio(true_positive, support);
                ClassMetrics {
                    label,
                    precision,
                    recall,
                    f1: f1_score(precision, recall),
                    support,
                }
            })
            .collect();

        let correct = pairs().filter(|(a, p)| a == p).count();
        let total = actual.len();

        let class_count = classes.len().max(1) as f64;
        let macro_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / class_count,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / class_count,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / class_count,
            support: total,
        };

        let weight = |value: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                0.0
            } else {
                classes
                    .iter()
                    .map(|c| value(c) * c.support as f64)
                    .sum::<f64>()
                    / total as f64
            }
        };
        let weighted_avg = AverageMetrics {
            precision: weight(|c| c.precision),
            recall: weight(|c| c.recall),
            f1: weight(|c| c.f1),
            support: total,
        };

        Ok(ClassificationReport {
            classes,
            accuracy: ratio(correct, total),
            macro_avg,
            weighted_avg,
        })
    }

    /// Metrics for one label, if it appeared.
    pub fn class(&self, label: TrainingLabel) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.label == label)
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for class in &self.classes {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                class.label.as_str(),
                class.precision,
                class.recall,
                class.f1,
                class.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                name, avg.precision, avg.recall, avg.f1, avg.support
            )?;
        }
        Ok(())
    }
}

/// Outcome of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub report: ClassificationReport,
    pub train_size: usize,
    pub test_size: usize,
}

/// Runs the split, fit and score cycle over a dataset.
pub struct Evaluator {
    analyzer: Arc<dyn Analyzer>,
    test_ratio: f64,
    seed: u64,
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("analyzer", &self.analyzer.name())
            .field("test_ratio", &self.test_ratio)
            .field("seed", &self.seed)
            .finish()
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(Arc::new(SupportAnalyzer::new()))
    }
}

impl Evaluator {
    /// Create an evaluator with the default seed and test ratio.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Evaluator {
            analyzer,
            test_ratio: DEFAULT_TEST_RATIO,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_test_ratio(mut self, test_ratio: f64) -> Self {
        self.test_ratio = test_ratio;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn test_ratio(&self) -> f64 {
        self.test_ratio
    }

    /// Evaluate retrieval accuracy on `dataset`.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<EvaluationReport> {
        let split = train_test_split(dataset.records(), self.test_ratio, self.seed)?;
        info!(
            "Prepared {} training examples and {} test examples",
            split.train.len(),
            split.test.len()
        );

        let samples: Vec<IntentSample> = split.train.iter().map(labelled_sample).collect();
        let classifier = PrototypeIntentClassifier::new(&samples, self.analyzer.clone())?;

        let mut actual = Vec::with_capacity(split.test.len());
        let mut predicted = Vec::with_capacity(split.test.len());
        for record in &split.test {
            let sample = labelled_sample(record);
            let prediction = classifier.predict(&sample.text)?;
            debug!("{:?} -> {} (expected {})", sample.text, prediction, sample.label);
            actual.push(sample.label);
            predicted.push(prediction);
        }

        let report = ClassificationReport::from_predictions(&actual, &predicted)?;
        info!("Accuracy: {}", report.accuracy);
        info!("Classification Report:\n{report}");

        Ok(EvaluationReport {
            accuracy: report.accuracy,
            report,
            train_size: split.train.len(),
            test_size: split.test.len(),
        })
    }
}

fn labelled_sample(record: &Record) -> IntentSample {
    IntentSample::new(record.document_text(), derive_label(&record.instruction))
}
