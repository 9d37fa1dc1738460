// src/query/bidirectional.rs
//! Bidirectional collection: oldest-first and newest-first pagination in
//! lockstep until the two fronts meet.

use super::{DatabaseQuerier, PageAccumulator};
use crate::api::{QueryOptions, QueryResponse, TimestampSort};
use crate::error::AppError;
use crate::model::Page;
use crate::types::DatabaseId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrontierState {
    /// More rows remain in this direction.
    Open,
    /// The API reported no further rows in this direction.
    Exhausted,
    /// The next row in this direction was already collected.
    Met,
}

/// One direction of the walk: the query it repeats and where it stands.
#[derive(Debug)]
struct Frontier {
    options: QueryOptions,
    cursor: Option<String>,
    state: FrontierState,
}

impl Frontier {
    fn new(options: &QueryOptions, sort: TimestampSort) -> Self {
        Self {
            options: options.clone().starting_at(None).sorted_by(sort),
            cursor: None,
            state: FrontierState::Open,
        }
    }

    fn next_query(&self) -> QueryOptions {
        self.options.clone().starting_at(self.cursor.clone())
    }

    fn is_open(&self) -> bool {
        self.state == FrontierState::Open
    }

    /// Moves the frontier to the response's continuation, once the response
    /// rows are in the accumulator.
    fn settle(&mut self, has_more: bool, next_cursor: Option<String>, collected: &PageAccumulator) {
        self.state = match next_cursor {
            Some(next) if has_more => {
                if collected.contains_cursor(&next) {
                    FrontierState::Met
                } else {
                    self.cursor = Some(next);
                    FrontierState::Open
                }
            }
            _ => FrontierState::Exhausted,
        };
    }
}

/// Adds a response's rows to the accumulator, keeping its continuation.
fn absorb(
    collected: &mut PageAccumulator,
    response: Option<QueryResponse>,
) -> Option<(bool, Option<String>)> {
    response.map(|response| {
        collected.extend(response.results);
        (response.has_more, response.next_cursor)
    })
}

impl DatabaseQuerier {
    /// Collects every row by paginating from both ends of the creation-time
    /// order at once.
    ///
    /// Each round fetches one page per open direction concurrently and adds
    /// both to the accumulator before either direction checks its next
    /// cursor. A direction whose next row is already collected stops
    /// advancing. The walk ends when either direction runs out of rows or
    /// both have met. Any sort in `options` is replaced.
    pub async fn fetch_bidirectionally(
        &self,
        database: &DatabaseId,
        options: &QueryOptions,
    ) -> Result<Vec<Page>, AppError> {
        let mut ascending = Frontier::new(options, TimestampSort::created_ascending());
        let mut descending = Frontier::new(options, TimestampSort::created_descending());
        let mut collected = PageAccumulator::new();
        let mut rounds = 0u32;

        loop {
            let (oldest_first, newest_first) = match (ascending.is_open(), descending.is_open()) {
                (true, true) => {
                    let (asc_query, desc_query) = (ascending.next_query(), descending.next_query());
                    let (asc, desc) = tokio::try_join!(
                        self.fetch_page(database, &asc_query),
                        self.fetch_page(database, &desc_query)
                    )?;
                    (Some(asc), Some(desc))
                }
                (true, false) => (
                    Some(self.fetch_page(database, &ascending.next_query()).await?),
                    None,
                ),
                (false, true) => (
                    None,
                    Some(self.fetch_page(database, &descending.next_query()).await?),
                ),
                (false, false) => break,
            };
            rounds += 1;

            let asc_next = absorb(&mut collected, oldest_first);
            let desc_next = absorb(&mut collected, newest_first);
            if let Some((has_more, next_cursor)) = asc_next {
                ascending.settle(has_more, next_cursor, &collected);
            }
            if let Some((has_more, next_cursor)) = desc_next {
                descending.settle(has_more, next_cursor, &collected);
            }

            if ascending.state == FrontierState::Exhausted
                || descending.state == FrontierState::Exhausted
            {
                break;
            }
        }

        log::info!(
            "Collected {} rows of database {} from both ends in {} rounds ({:?}/{:?})",
            collected.len(),
            database,
            rounds,
            ascending.state,
            descending.state
        );
        Ok(collected.into_sorted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageId;
    use chrono::Utc;
    use std::collections::HashMap;

    fn collected_with(id: &str) -> PageAccumulator {
        PageAccumulator::from_pages(vec![Page {
            id: PageId::parse(id).unwrap(),
            created_time: Utc::now(),
            url: String::new(),
            properties: HashMap::new(),
        }])
    }

    #[test]
    fn frontier_advances_to_unseen_cursor() {
        let collected = collected_with("00000000000000000000000000000001");
        let mut frontier = Frontier::new(&QueryOptions::default(), TimestampSort::created_ascending());

        frontier.settle(
            true,
            Some("00000000-0000-0000-0000-000000000002".to_string()),
            &collected,
        );
        assert!(frontier.is_open());
        assert_eq!(
            frontier.next_query().start_cursor.as_deref(),
            Some("00000000-0000-0000-0000-000000000002")
        );
    }

    #[test]
    fn frontier_meets_on_collected_cursor() {
        let collected = collected_with("00000000000000000000000000000001");
        let mut frontier =
            Frontier::new(&QueryOptions::default(), TimestampSort::created_descending());

        frontier.settle(
            true,
            Some("00000000-0000-0000-0000-000000000001".to_string()),
            &collected,
        );
        assert_eq!(frontier.state, FrontierState::Met);
    }

    #[test]
    fn frontier_is_exhausted_without_more_rows() {
        let collected = PageAccumulator::new();
        let mut frontier = Frontier::new(&QueryOptions::default(), TimestampSort::created_ascending());

        frontier.settle(false, Some("00000000-0000-0000-0000-000000000009".to_string()), &collected);
        assert_eq!(frontier.state, FrontierState::Exhausted);

        let mut frontier = Frontier::new(&QueryOptions::default(), TimestampSort::created_ascending());
        frontier.settle(true, None, &collected);
        assert_eq!(frontier.state, FrontierState::Exhausted);
    }

    #[test]
    fn frontier_replaces_caller_sort() {
        let options = QueryOptions::default().sorted_by(TimestampSort::created_ascending());
        let frontier = Frontier::new(&options, TimestampSort::created_descending());
        assert_eq!(frontier.next_query().sorts, vec![TimestampSort::created_descending()]);
    }
}
