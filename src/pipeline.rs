// src/pipeline.rs
//! Snapshot pipeline: fetch a database with the chosen strategy, together with
//! its schema and the databases its relation properties point into.

use crate::api::QueryOptions;
use crate::error::AppError;
use crate::formatting::{DatabaseSnapshot, Databases};
use crate::model::Page;
use crate::query::{DatabaseQuerier, PartitionOptions};
use crate::types::DatabaseId;
use futures::future::try_join_all;
use std::collections::HashSet;

/// How the rows of a database are retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Strategy {
    /// Follow the continuation cursor from the first page to the last.
    Linear,
    /// Split the creation-time span into sub-ranges fetched concurrently.
    #[default]
    Partition,
    /// Walk oldest-first and newest-first at once until the fronts meet.
    Bidirectional,
}

/// Retrieves complete database snapshots.
#[async_trait::async_trait]
pub trait SnapshotSource {
    async fn collect(&self, database: &DatabaseId) -> Result<Databases, AppError>;
}

/// Fetches a database and, unless disabled, its relation targets.
pub struct SnapshotCollector {
    querier: DatabaseQuerier,
    strategy: Strategy,
    partition: PartitionOptions,
    options: QueryOptions,
    follow_relations: bool,
}

impl SnapshotCollector {
    pub fn new(querier: DatabaseQuerier, strategy: Strategy) -> Self {
        Self {
            querier,
            strategy,
            partition: PartitionOptions::default(),
            options: QueryOptions::default(),
            follow_relations: true,
        }
    }

    pub fn with_partition(self, partition: PartitionOptions) -> Self {
        Self { partition, ..self }
    }

    /// Query options for the requested database. Relation targets are always
    /// fetched in full.
    pub fn with_options(self, options: QueryOptions) -> Self {
        Self { options, ..self }
    }

    pub fn following_relations(self, follow_relations: bool) -> Self {
        Self {
            follow_relations,
            ..self
        }
    }

    async fn fetch_rows(
        &self,
        database: &DatabaseId,
        options: &QueryOptions,
    ) -> Result<Vec<Page>, AppError> {
        match self.strategy {
            Strategy::Linear => self.querier.fetch_all_pages(database, options).await,
            Strategy::Partition => {
                self.querier
                    .fetch_all_pages_by_partition(database, &self.partition, options)
                    .await
            }
            Strategy::Bidirectional => self.querier.fetch_bidirectionally(database, options).await,
        }
    }

    async fn snapshot(
        &self,
        database: &DatabaseId,
        options: &QueryOptions,
    ) -> Result<DatabaseSnapshot, AppError> {
        let (pages, property_configs) = tokio::try_join!(
            self.fetch_rows(database, options),
            self.querier.fetch_property_configs(database)
        )?;
        log::info!(
            "Database {}: {} rows, {} properties",
            database,
            pages.len(),
            property_configs.len()
        );
        Ok(DatabaseSnapshot {
            pages,
            property_configs,
        })
    }
}

#[async_trait::async_trait]
impl SnapshotSource for SnapshotCollector {
    async fn collect(&self, database: &DatabaseId) -> Result<Databases, AppError> {
        log::info!("Collecting database {} ({:?} strategy)", database, self.strategy);
        let root = self.snapshot(database, &self.options).await?;

        let targets = if self.follow_relations {
            relation_targets(database, &root)
        } else {
            Vec::new()
        };

        let mut databases = Databases::new();
        databases.insert(database.clone(), root);

        if !targets.is_empty() {
            log::info!("Fetching {} related database(s)", targets.len());
            let full = QueryOptions::default();
            let related = try_join_all(targets.iter().map(|target| self.snapshot(target, &full))).await?;
            databases.extend(targets.into_iter().zip(related));
        }

        Ok(databases)
    }
}

/// Distinct databases the snapshot's relation properties point into, in
/// schema order, excluding the snapshot's own database.
fn relation_targets(database: &DatabaseId, snapshot: &DatabaseSnapshot) -> Vec<DatabaseId> {
    let mut seen = HashSet::new();
    snapshot
        .property_configs
        .iter()
        .filter_map(|config| config.relation_database.clone())
        .filter(|target| target != database && seen.insert(target.clone()))
        .collect()
}
