//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, ParleyArgs};
use crate::engine::EngineStats;
use crate::error::Result;
use crate::ml::evaluation::ClassificationReport;

/// Result structure for an answered query.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResult {
    pub response: String,
    pub kind: String,
    pub score: Option<f64>,
    pub record_index: Option<usize>,
    pub generation: u64,
    pub duration_ms: u64,
}

/// Result structure for an evaluation run.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub accuracy: f64,
    pub train_size: usize,
    pub test_size: usize,
    pub seed: u64,
    pub duration_ms: u64,
    pub report: ClassificationReport,
}

/// Result structure for product, order and user lookups.
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResult {
    pub key: String,
    pub info: String,
}

/// Engine statistics together with their source.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResult {
    pub source: String,
    #[serde(flatten)]
    pub stats: EngineStats,
}

/// Plain-text rendering of a command result.
///
/// `verbosity` follows [`ParleyArgs::verbosity`]; details beyond the main
/// payload are only rendered from level 2 upwards.
pub trait HumanOutput {
    fn render(&self, verbosity: u8) -> String;
}

impl HumanOutput for AnswerResult {
    fn render(&self, verbosity: u8) -> String {
        let mut out = self.response.clone();
        if verbosity > 1 {
            out.push_str(&format!("\n\nResolution: {}", self.kind));
            if let Some(score) = self.score {
                out.push_str(&format!("\nScore: {score:.4}"));
            }
            if let Some(index) = self.record_index {
                out.push_str(&format!("\nRecord: {index} (generation {})", self.generation));
            }
            out.push_str(&format!("\nAnswer time: {}ms", self.duration_ms));
        }
        out
    }
}

impl HumanOutput for EvaluationResult {
    fn render(&self, verbosity: u8) -> String {
        let mut out = format!(
            "Evaluation:\n═══════════\nAccuracy: {:.4}\nSplit: {} train / {} test\nSeed: {}\n\n{}",
            self.accuracy, self.train_size, self.test_size, self.seed, self.report
        );
        if verbosity > 1 {
            out.push_str(&format!("\nEvaluation time: {}ms", self.duration_ms));
        }
        out
    }
}

impl HumanOutput for LookupResult {
    fn render(&self, _verbosity: u8) -> String {
        self.info.clone()
    }
}

impl HumanOutput for StatsResult {
    fn render(&self, _verbosity: u8) -> String {
        let stats = &self.stats;
        [
            format!("Source: {}", self.source),
            format!("Records: {}", stats.records),
            format!("Vocabulary: {}", stats.vocabulary_size),
            format!(
                "Catalog: {} products, {} orders, {} users",
                stats.products, stats.orders, stats.users
            ),
            format!("Generation: {}", stats.generation),
            format!("Trained at: {}", stats.trained_at.to_rfc3339()),
        ]
        .join("\n")
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &ParleyArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}\n");
            }
            println!("{}", result.render(args.verbosity()).trim_end());
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &ParleyArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}
