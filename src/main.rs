// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2records::{
    CommandLineInput, DatabaseQuerier, Databases, NotionFormatter, NotionHttpClient,
    SnapshotCollector, SnapshotConfig, SnapshotSource,
};
use std::fs;
use std::io::Write;
use std::sync::Arc;

/// Sets up logging configuration.
///
/// The console appender writes to stderr so that stdout carries only the JSON.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion2records.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Fetches the snapshot the configuration asks for.
async fn collect(config: &SnapshotConfig) -> anyhow::Result<Databases> {
    let client = NotionHttpClient::new(&config.api_key, config.request_timeout)?;
    let querier =
        DatabaseQuerier::new(Arc::new(client)).with_timeout_retries(config.timeout_retries);
    let collector = SnapshotCollector::new(querier, config.strategy)
        .with_partition(config.partition)
        .with_options(config.query.clone())
        .following_relations(config.follow_relations);

    let databases = collector
        .collect(&config.database)
        .await
        .with_context(|| format!("failed to collect database {}", config.database))?;
    Ok(databases)
}

/// Serializes either the raw snapshots or the formatted records of the
/// requested database.
fn render(config: &SnapshotConfig, databases: Databases) -> anyhow::Result<Vec<u8>> {
    if config.raw {
        return Ok(serde_json::to_vec_pretty(&databases)?);
    }
    let formatter = NotionFormatter::new(databases);
    let records = formatter.format_database(&config.database)?;
    log::info!("Formatted {} records", records.len());
    Ok(serde_json::to_vec_pretty(&records)?)
}

fn deliver(config: &SnapshotConfig, mut output: Vec<u8>) -> anyhow::Result<()> {
    output.push(b'\n');
    match &config.output_file {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("✓ Records saved to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&output)?;
            handle.flush()?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = SnapshotConfig::resolve(cli)?;
    let databases = collect(&config).await?;
    let output = render(&config, databases)?;
    deliver(&config, output)?;

    Ok(())
}
