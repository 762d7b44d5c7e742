//! Command implementations for the Parley CLI.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use log::debug;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{EngineConfig, initialize};
use crate::corpus::NullFetcher;
use crate::engine::SupportEngine;
use crate::error::Result;

/// Execute a CLI command.
pub fn execute_command(args: ParleyArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    initialize(&config).with_context(|| {
        format!("initializing resource directory {}", config.resource_dir.display())
    })?;

    let start_time = Instant::now();
    let engine = SupportEngine::from_config(&config, Arc::new(NullFetcher))?;
    debug!("Engine ready in {}ms: {engine:?}", start_time.elapsed().as_millis());

    match &args.command {
        Command::Ask(ask_args) => ask(&engine, ask_args.clone(), &args),
        Command::Evaluate(_) => evaluate(&engine, &args),
        Command::Product(product_args) => show_product(&engine, product_args.clone(), &args),
        Command::Order(order_args) => show_order(&engine, order_args.clone(), &args),
        Command::User(user_args) => show_user(&engine, user_args.clone(), &args),
        Command::Stats => show_stats(&engine, &args),
    }
}

/// Merge the configuration file (if any) with command line overrides.
pub fn resolve_config(args: &ParleyArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(data) = &args.data {
        config.data_path = data.clone();
        config.drive_url = None;
    }
    if let Some(url) = &args.drive_url {
        config.drive_url = Some(url.clone());
    }
    if let Command::Evaluate(evaluate_args) = &args.command {
        config.seed = evaluate_args.seed.unwrap_or(config.seed);
        config.test_ratio = evaluate_args.test_ratio.unwrap_or(config.test_ratio);
    }

    config.validate()?;
    Ok(config)
}

/// Answer a query.
fn ask(engine: &SupportEngine, args: AskArgs, cli_args: &ParleyArgs) -> Result<()> {
    let start_time = Instant::now();
    let answer = engine.respond(&args.message, args.user_id.as_deref());

    output_result(
        "Answer",
        &AnswerResult {
            kind: answer.resolution.kind().to_string(),
            score: answer.resolution.score(),
            record_index: answer.resolution.index(),
            generation: answer.generation,
            response: answer.text,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Run the evaluation harness.
fn evaluate(engine: &SupportEngine, cli_args: &ParleyArgs) -> Result<()> {
    let start_time = Instant::now();
    let report = engine.evaluate()?;

    output_result(
        "Evaluation completed",
        &EvaluationResult {
            accuracy: report.accuracy,
            train_size: report.train_size,
            test_size: report.test_size,
            seed: engine.evaluator().seed(),
            duration_ms: start_time.elapsed().as_millis() as u64,
            report: report.report,
        },
        cli_args,
    )
}

/// Look up a product.
fn show_product(engine: &SupportEngine, args: ProductArgs, cli_args: &ParleyArgs) -> Result<()> {
    output_result(
        "Product lookup",
        &LookupResult {
            key: args.name.clone(),
            info: engine.get_product_info(&args.name),
        },
        cli_args,
    )
}

/// Look up an order.
fn show_order(engine: &SupportEngine, args: OrderArgs, cli_args: &ParleyArgs) -> Result<()> {
    let info = engine.get_order_info(args.id.as_deref(), args.product.as_deref());
    output_result(
        "Order lookup",
        &LookupResult {
            key: args.id.or(args.product).unwrap_or_default(),
            info,
        },
        cli_args,
    )
}

/// Look up a user.
fn show_user(engine: &SupportEngine, args: UserArgs, cli_args: &ParleyArgs) -> Result<()> {
    output_result(
        "User lookup",
        &LookupResult {
            info: engine.get_user_info(&args.user_id),
            key: args.user_id,
        },
        cli_args,
    )
}

/// Show engine statistics.
fn show_stats(engine: &SupportEngine, cli_args: &ParleyArgs) -> Result<()> {
    output_result(
        "Engine statistics",
        &StatsResult {
            source: engine.source().describe(),
            stats: engine.stats(),
        },
        cli_args,
    )
}
