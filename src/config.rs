// src/config.rs
use crate::api::{QueryFilter, QueryOptions};
use crate::constants::{
    DEFAULT_DECREASE_RATIO, DEFAULT_PARTITION_COUNT, DEFAULT_REQUEST_TIMEOUT_SECS,
    MAX_PARTITION_COUNT, MAX_TIMEOUT_RETRIES,
};
use crate::error::AppError;
use crate::pipeline::Strategy;
use crate::query::PartitionOptions;
use crate::types::{ApiKey, DatabaseId, ValidationError};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the Notion integration secret.
pub const API_SECRET_ENV: &str = "NOTION_API_SECRET";

/// Parsed and validated command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Notion database URL or ID (e.g., "https://www.notion.so/...")
    pub database: String,

    /// How to page through the database
    #[arg(short, long, value_enum, default_value_t = Strategy::Partition)]
    pub strategy: Strategy,

    /// Interior split points of the creation-time span (partition strategy)
    #[arg(long, default_value_t = DEFAULT_PARTITION_COUNT as u32)]
    pub partitions: u32,

    /// How quickly sub-ranges shrink toward the newest rows (partition strategy)
    #[arg(long, default_value_t = DEFAULT_DECREASE_RATIO)]
    pub decrease_ratio: f64,

    /// Notion filter object (JSON) applied to the query
    #[arg(long)]
    pub filter: Option<String>,

    /// Times a timed-out request is repeated before giving up
    #[arg(long, default_value_t = MAX_TIMEOUT_RETRIES)]
    pub timeout_retries: u32,

    /// Seconds before a single request times out
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,

    /// Output file for the JSON records (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Emit the raw database snapshots instead of formatted records
    #[arg(long, default_value_t = false)]
    pub raw: bool,

    /// Do not fetch the databases that relation properties point into
    #[arg(long = "no-relations", default_value_t = false)]
    pub no_relations: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved snapshot configuration, validated and ready to drive the pipeline.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    pub database: DatabaseId,
    pub api_key: ApiKey,
    pub strategy: Strategy,
    pub partition: PartitionOptions,
    pub query: QueryOptions,
    pub timeout_retries: u32,
    pub request_timeout: Duration,
    pub output_file: Option<PathBuf>,
    pub raw: bool,
    pub follow_relations: bool,
    pub verbose: bool,
}

impl SnapshotConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with_secret(cli, std::env::var(API_SECRET_ENV).ok())
    }

    /// Resolves a configuration with an explicitly supplied secret.
    pub fn resolve_with_secret(
        cli: CommandLineInput,
        secret: Option<String>,
    ) -> Result<Self, AppError> {
        let secret = secret.ok_or_else(|| {
            AppError::MissingConfiguration(format!("{} environment variable not set", API_SECRET_ENV))
        })?;
        let api_key = ApiKey::new(secret)?;
        let database = DatabaseId::parse(&cli.database)?;

        if cli.partitions > MAX_PARTITION_COUNT {
            return Err(ValidationError::OutOfBounds {
                value: cli.partitions,
                min: 0,
                max: MAX_PARTITION_COUNT,
            }
            .into());
        }
        if !cli.decrease_ratio.is_finite() || cli.decrease_ratio <= 0.0 {
            return Err(AppError::InvalidArgument(format!(
                "--decrease-ratio must be a positive number, got {}",
                cli.decrease_ratio
            )));
        }
        if cli.request_timeout == 0 {
            return Err(AppError::InvalidArgument(
                "--request-timeout must be at least one second".to_string(),
            ));
        }

        let mut query = QueryOptions::default();
        if let Some(filter) = cli.filter.as_deref() {
            let value: serde_json::Value = serde_json::from_str(filter).map_err(|e| {
                AppError::InvalidArgument(format!("--filter is not valid JSON: {}", e))
            })?;
            query = query.with_filter(QueryFilter::Raw(value));
        }

        Ok(SnapshotConfig {
            database,
            api_key,
            strategy: cli.strategy,
            partition: PartitionOptions {
                decrease_ratio: cli.decrease_ratio,
                count: cli.partitions as i32,
            },
            query,
            timeout_retries: cli.timeout_retries,
            request_timeout: Duration::from_secs(cli.request_timeout),
            output_file: cli.output.map(PathBuf::from),
            raw: cli.raw,
            follow_relations: !cli.no_relations,
            verbose: cli.verbose,
        })
    }
}
