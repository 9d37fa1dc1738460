// src/query/partitioned.rs
//! Time-partitioned collection: one pagination per creation-time sub-range,
//! all in flight at once.

use super::partition::{decreasing_size_partition_between, intervals_from_boundaries};
use super::{DatabaseQuerier, PageAccumulator, PartitionOptions};
use crate::api::{QueryFilter, QueryOptions, TimestampSort};
use crate::constants::PROBE_PAGE_SIZE;
use crate::error::AppError;
use crate::model::Page;
use crate::types::DatabaseId;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;

impl DatabaseQuerier {
    /// Collects every row by splitting the database's creation-time span
    /// into sub-ranges and paginating each one concurrently.
    ///
    /// Two single-row probes find the oldest and newest row. Sub-ranges are
    /// inclusive on both ends and get narrower toward the newest row. Rows
    /// on a shared boundary are fetched twice and kept once. The caller's
    /// filter applies to the probes and to every sub-range.
    ///
    /// Returns an empty list when either probe finds nothing.
    pub async fn fetch_all_pages_by_partition(
        &self,
        database: &DatabaseId,
        partition: &PartitionOptions,
        options: &QueryOptions,
    ) -> Result<Vec<Page>, AppError> {
        let Some((oldest, newest)) = self.probe_creation_span(database, options).await? else {
            log::info!("Database {} has no matching rows", database);
            return Ok(Vec::new());
        };

        let boundaries = decreasing_size_partition_between(
            oldest.timestamp_millis() as f64,
            ceil_millis(newest) as f64,
            partition,
        )?;
        let mut intervals = intervals_from_boundaries(&boundaries)?;
        intervals.dedup();
        log::info!(
            "Partitioning database {} from {} to {} into {} intervals",
            database,
            oldest.to_rfc3339(),
            newest.to_rfc3339(),
            intervals.len()
        );

        let queries = intervals
            .into_iter()
            .map(|(low, high)| {
                let filter = QueryFilter::created_between(instant(low)?, instant(high)?);
                Ok::<_, AppError>(options.clone().starting_at(None).narrowed_by(filter))
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        let batches =
            try_join_all(queries.iter().map(|query| self.fetch_all_pages(database, query))).await?;

        let fetched: usize = batches.iter().map(Vec::len).sum();
        let mut accumulator = PageAccumulator::new();
        for batch in batches {
            accumulator.extend(batch);
        }
        log::info!(
            "Database {}: {} rows fetched across intervals, {} unique",
            database,
            fetched,
            accumulator.len()
        );
        Ok(accumulator.into_sorted())
    }

    /// Creation times of the oldest and newest row matching `options`.
    async fn probe_creation_span(
        &self,
        database: &DatabaseId,
        options: &QueryOptions,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>, AppError> {
        let probe = options
            .clone()
            .starting_at(None)
            .with_page_size(PROBE_PAGE_SIZE);
        let oldest_query = probe.clone().sorted_by(TimestampSort::created_ascending());
        let newest_query = probe.sorted_by(TimestampSort::created_descending());

        let (oldest, newest) = tokio::try_join!(
            self.fetch_page(database, &oldest_query),
            self.fetch_page(database, &newest_query)
        )?;

        Ok(match (oldest.results.first(), newest.results.first()) {
            (Some(oldest), Some(newest)) => Some((oldest.created_time, newest.created_time)),
            _ => None,
        })
    }
}

/// Epoch milliseconds, rounded up so a sub-millisecond timestamp stays
/// inside an inclusive upper bound.
fn ceil_millis(instant: DateTime<Utc>) -> i64 {
    let millis = instant.timestamp_millis();
    if instant.timestamp_subsec_nanos() % 1_000_000 == 0 {
        millis
    } else {
        millis + 1
    }
}

fn instant(millis: f64) -> Result<DateTime<Utc>, AppError> {
    DateTime::<Utc>::from_timestamp_millis(millis as i64).ok_or_else(|| {
        AppError::InvalidArgument(format!("partition boundary {} is not a valid time", millis))
    })
}
