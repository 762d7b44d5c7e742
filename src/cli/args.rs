//! Command line argument parsing for the Parley CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Parley - retrieval-based customer support answers
#[derive(Parser, Debug, Clone)]
#[command(name = "parley")]
#[command(about = "Answer customer-support queries from a labeled corpus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Parley Contributors")]
#[command(long_about = None)]
pub struct ParleyArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Engine configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Local JSONL corpus (overrides the configuration)
    #[arg(short, long, value_name = "DATA_PATH", env = "PARLEY_DATA")]
    pub data: Option<PathBuf>,

    /// Share link of a remote corpus (overrides the configuration)
    #[arg(long, value_name = "URL", env = "PARLEY_DRIVE_URL")]
    pub drive_url: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ParleyArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Answer a support query
    Ask(AskArgs),

    /// Evaluate retrieval accuracy on a train/test split
    Evaluate(EvaluateArgs),

    /// Look up a product by name
    Product(ProductArgs),

    /// Look up an order
    Order(OrderArgs),

    /// Look up a user profile
    User(UserArgs),

    /// Show engine statistics
    Stats,
}

/// Arguments for answering a query
#[derive(Parser, Debug, Clone)]
pub struct AskArgs {
    /// The customer's message
    #[arg(value_name = "MESSAGE")]
    pub message: String,

    /// Identifier of the asking user
    #[arg(short, long, value_name = "USER_ID")]
    pub user_id: Option<String>,
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Seed of the train/test shuffle (overrides the configuration)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Share of records held out for testing (overrides the configuration)
    #[arg(long)]
    pub test_ratio: Option<f64>,
}

/// Arguments for product lookup
#[derive(Parser, Debug, Clone)]
pub struct ProductArgs {
    /// Product name; partial names match case-insensitively
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Arguments for order lookup
#[derive(Parser, Debug, Clone)]
pub struct OrderArgs {
    /// Order identifier
    #[arg(long, value_name = "ORDER_ID")]
    pub id: Option<String>,

    /// Product name (filtering by product is not supported)
    #[arg(long, value_name = "NAME")]
    pub product: Option<String>,
}

/// Arguments for user lookup
#[derive(Parser, Debug, Clone)]
pub struct UserArgs {
    /// User identifier
    #[arg(value_name = "USER_ID")]
    pub user_id: String,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_args() {
        let args = ParleyArgs::try_parse_from([
            "parley",
            "ask",
            "where is my order",
            "--user-id",
            "U42",
        ])
        .unwrap();

        if let Command::Ask(ask_args) = args.command {
            assert_eq!(ask_args.message, "where is my order");
            assert_eq!(ask_args.user_id.as_deref(), Some("U42"));
        } else {
            panic!("Expected Ask command");
        }
    }

    #[test]
    fn test_order_args() {
        let args =
            ParleyArgs::try_parse_from(["parley", "order", "--product", "Widget"]).unwrap();

        if let Command::Order(order_args) = args.command {
            assert!(order_args.id.is_none());
            assert_eq!(order_args.product.as_deref(), Some("Widget"));
        } else {
            panic!("Expected Order command");
        }
    }

    #[test]
    fn test_global_source_flags() {
        let args = ParleyArgs::try_parse_from([
            "parley",
            "--data",
            "/tmp/corpus.jsonl",
            "--config",
            "parley.json",
            "stats",
        ])
        .unwrap();

        assert_eq!(args.data, Some(PathBuf::from("/tmp/corpus.jsonl")));
        assert_eq!(args.config, Some(PathBuf::from("parley.json")));
        assert!(matches!(args.command, Command::Stats));
    }

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = ParleyArgs::try_parse_from(["parley", "stats"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Verbose flag
        let args = ParleyArgs::try_parse_from(["parley", "-v", "stats"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags
        let args = ParleyArgs::try_parse_from(["parley", "-vv", "stats"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        // Quiet flag
        let args = ParleyArgs::try_parse_from(["parley", "--quiet", "stats"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args = ParleyArgs::try_parse_from(["parley", "--format", "json", "stats"]).unwrap();
        assert!(matches!(args.output_format, OutputFormat::Json));
    }
}
