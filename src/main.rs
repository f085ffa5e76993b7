mod cli;
mod config;
mod dispatcher;
mod envelope;
mod log_parser;
mod notify;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, LogLevel};
use config::{cluster_id_or_unknown, Config, CLUSTER_ID_ENV, WEBHOOK_URL_ENV};
use dispatcher::BatchDispatcher;
use log_parser::ConnectionExtractor;
use std::env;
use tracing::Level;

fn init_logging(level: LogLevel) {
    let level = match level {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // the log sink stamps ingestion time already.
        .without_time()
        .init();
}

/// Flag value if given, else the environment variable.
fn flag_or_env(flag: &Option<String>, key: &str) -> Option<String> {
    flag.clone().or_else(|| env::var(key).ok())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match &cli.command {
        Commands::Process {
            input,
            envelope,
            engine,
            webhook_url,
            cluster_id,
            dry_run,
            output,
        } => {
            let batch = utils::read_input(input, *envelope)?;
            let engine = utils::resolve_engine(*engine, batch.log_group.as_deref(), &batch.lines)?;

            let summary = if *dry_run {
                let cluster_id = flag_or_env(cluster_id, CLUSTER_ID_ENV);
                BatchDispatcher::new(
                    engine,
                    utils::PrintNotifier,
                    cluster_id_or_unknown(cluster_id.as_deref()),
                )
                .process(&batch.lines)
            } else {
                let config = Config::from_lookup(|key| match key {
                    WEBHOOK_URL_ENV => flag_or_env(webhook_url, key),
                    CLUSTER_ID_ENV => flag_or_env(cluster_id, key),
                    _ => env::var(key).ok(),
                })
                .context("Invalid configuration")?;
                BatchDispatcher::from_config(engine, &config)
                    .context("Failed to create webhook client")?
                    .process(&batch.lines)
            };

            utils::output_summary(&summary, output.as_ref())?;
        }
        Commands::Extract {
            line,
            engine,
            output,
        } => {
            let engine = utils::resolve_engine(*engine, None, std::slice::from_ref(line))?;

            let event = ConnectionExtractor::new(engine).extract(line);
            utils::output_event(event.as_ref(), output.as_ref())?;
        }
    }

    Ok(())
}
