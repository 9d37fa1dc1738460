// src/api/types.rs
//! Request and response vocabulary of the database query endpoint.
//!
//! These types serialize straight into the JSON body of
//! `POST databases/{id}/query`; nothing is reshaped on the way out.

use crate::constants::NOTION_API_PAGE_SIZE;
use crate::model::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable description of one database query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<QueryFilter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<TimestampSort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page_size: NOTION_API_PAGE_SIZE,
            filter: None,
            sorts: Vec::new(),
            start_cursor: None,
        }
    }
}

impl QueryOptions {
    pub fn with_page_size(self, page_size: u32) -> Self {
        Self { page_size, ..self }
    }

    pub fn with_filter(self, filter: QueryFilter) -> Self {
        Self {
            filter: Some(filter),
            ..self
        }
    }

    /// Replaces any existing sort order with a single timestamp sort.
    pub fn sorted_by(self, sort: TimestampSort) -> Self {
        Self {
            sorts: vec![sort],
            ..self
        }
    }

    pub fn starting_at(self, cursor: Option<String>) -> Self {
        Self {
            start_cursor: cursor,
            ..self
        }
    }

    /// Narrows the query: the extra filter is ANDed with any existing one.
    pub fn narrowed_by(self, extra: QueryFilter) -> Self {
        let filter = match self.filter {
            Some(existing) => QueryFilter::all_of(vec![existing, extra]),
            None => extra,
        };
        Self {
            filter: Some(filter),
            ..self
        }
    }
}

/// A database query filter.
///
/// Only the created-time condition is built by this crate; anything else a
/// caller wants to filter on is passed through as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryFilter {
    And { and: Vec<QueryFilter> },
    CreatedTime(CreatedTimeFilter),
    Raw(serde_json::Value),
}

impl QueryFilter {
    /// Records created at or after `instant`.
    pub fn created_on_or_after(instant: DateTime<Utc>) -> Self {
        QueryFilter::CreatedTime(CreatedTimeFilter::new(DateCondition::OnOrAfter(instant)))
    }

    /// Records created at or before `instant`.
    pub fn created_on_or_before(instant: DateTime<Utc>) -> Self {
        QueryFilter::CreatedTime(CreatedTimeFilter::new(DateCondition::OnOrBefore(instant)))
    }

    /// Records created within `[low, high]`, inclusive on both ends.
    pub fn created_between(low: DateTime<Utc>, high: DateTime<Utc>) -> Self {
        QueryFilter::all_of(vec![
            Self::created_on_or_after(low),
            Self::created_on_or_before(high),
        ])
    }

    /// Conjunction of several filters, flattening nested conjunctions.
    pub fn all_of(filters: Vec<QueryFilter>) -> Self {
        let mut and = Vec::with_capacity(filters.len());
        for filter in filters {
            match filter {
                QueryFilter::And { and: nested } => and.extend(nested),
                other => and.push(other),
            }
        }
        QueryFilter::And { and }
    }
}

/// `{"timestamp": "created_time", "created_time": {<condition>}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTimeFilter {
    pub timestamp: TimestampProperty,
    pub created_time: DateCondition,
}

impl CreatedTimeFilter {
    pub fn new(condition: DateCondition) -> Self {
        Self {
            timestamp: TimestampProperty::CreatedTime,
            created_time: condition,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateCondition {
    OnOrAfter(DateTime<Utc>),
    OnOrBefore(DateTime<Utc>),
}

impl DateCondition {
    pub fn matches(&self, instant: DateTime<Utc>) -> bool {
        match self {
            DateCondition::OnOrAfter(bound) => instant >= *bound,
            DateCondition::OnOrBefore(bound) => instant <= *bound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampProperty {
    CreatedTime,
    LastEditedTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimestampSort {
    pub timestamp: TimestampProperty,
    pub direction: SortDirection,
}

impl TimestampSort {
    pub fn created_ascending() -> Self {
        Self {
            timestamp: TimestampProperty::CreatedTime,
            direction: SortDirection::Ascending,
        }
    }

    pub fn created_descending() -> Self {
        Self {
            timestamp: TimestampProperty::CreatedTime,
            direction: SortDirection::Descending,
        }
    }
}

/// Generic paginated response wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// One page of database query results.
pub type QueryResponse = PaginatedResponse<Page>;
