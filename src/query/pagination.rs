// src/query/pagination.rs
//! Linear pagination and the page accumulator shared by the collectors.

use super::DatabaseQuerier;
use crate::api::QueryOptions;
use crate::error::AppError;
use crate::model::Page;
use crate::types::{DatabaseId, PageId};
use std::collections::HashSet;

/// Pages collected so far, indexed by id.
///
/// A page whose id is already present is dropped on insertion, so the
/// first copy of each page wins.
#[derive(Debug, Clone, Default)]
pub struct PageAccumulator {
    pages: Vec<Page>,
    seen: HashSet<PageId>,
}

impl PageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an accumulator with pages fetched earlier.
    pub fn from_pages(pages: impl IntoIterator<Item = Page>) -> Self {
        let mut accumulator = Self::new();
        accumulator.extend(pages);
        accumulator
    }

    pub fn extend(&mut self, pages: impl IntoIterator<Item = Page>) {
        for page in pages {
            if self.seen.insert(page.id.clone()) {
                self.pages.push(page);
            }
        }
    }

    pub fn contains(&self, id: &PageId) -> bool {
        self.seen.contains(id)
    }

    /// Whether a continuation cursor points at a page already collected.
    ///
    /// Notion cursors are the id of the next page. A cursor that is not a
    /// page id is never considered seen.
    pub fn contains_cursor(&self, cursor: &str) -> bool {
        PageId::parse(cursor)
            .map(|id| self.contains(&id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// The collected pages, oldest first. Pages created at the same instant
    /// keep their arrival order.
    pub fn into_sorted(self) -> Vec<Page> {
        let mut pages = self.pages;
        pages.sort_by_key(|page| page.created_time);
        pages
    }
}

impl DatabaseQuerier {
    /// Follows the continuation cursor from the first page to the last and
    /// returns every row in the order the API produced them.
    ///
    /// Any start cursor in `options` is ignored.
    pub async fn fetch_all_pages(
        &self,
        database: &DatabaseId,
        options: &QueryOptions,
    ) -> Result<Vec<Page>, AppError> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;
        let mut requests = 0u32;

        loop {
            let query = options.clone().starting_at(cursor.take());
            let response = self.fetch_page(database, &query).await?;
            requests += 1;
            pages.extend(response.results);

            match response.next_cursor {
                Some(next) if response.has_more => cursor = Some(next),
                _ => break,
            }
        }

        log::debug!(
            "Fetched {} rows of database {} in {} requests",
            pages.len(),
            database,
            requests
        );
        Ok(pages)
    }

    /// Paginates into `accumulator`, starting at the cursor in `options`
    /// (the first page when there is none).
    ///
    /// Stops when the results run out, or as soon as the next cursor points
    /// at a page the accumulator already holds.
    pub async fn fetch_missing_pages(
        &self,
        database: &DatabaseId,
        accumulator: &mut PageAccumulator,
        options: &QueryOptions,
    ) -> Result<(), AppError> {
        let mut cursor = options.start_cursor.clone();

        loop {
            let query = options.clone().starting_at(cursor.take());
            let response = self.fetch_page(database, &query).await?;
            accumulator.extend(response.results);

            match response.next_cursor {
                Some(next) if response.has_more => {
                    if accumulator.contains_cursor(&next) {
                        log::debug!("Cursor {} was already collected, stopping", next);
                        break;
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        Ok(())
    }
}
