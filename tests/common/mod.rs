// tests/common/mod.rs
//! An in-memory Notion workspace that answers database queries the way the
//! API does: filtered, sorted by creation time, and paged by a cursor that is
//! the id of the next row.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use notion2records::{
    AppError, DatabaseId, DatabaseSchema, DatabaseTransport, NotionErrorCode, Page, PageId,
    QueryFilter, QueryOptions, QueryResponse, SortDirection,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

pub const TASKS: &str = "11111111111111111111111111111111";
pub const PROJECTS: &str = "22222222222222222222222222222222";

pub fn database_id(raw: &str) -> DatabaseId {
    DatabaseId::parse(raw).expect("valid database id")
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// A row with no properties, created `offset` after the epoch.
pub fn row(n: u32, offset: Duration) -> Page {
    Page {
        id: PageId::parse(&format!("{:032x}", n)).unwrap(),
        created_time: epoch() + offset,
        url: format!("https://www.notion.so/row-{}", n),
        properties: HashMap::new(),
    }
}

/// `count` rows whose creation times bunch up toward the newest end, with
/// every fifth row sharing its predecessor's timestamp.
pub fn rows(count: u32) -> Vec<Page> {
    let mut minutes = 0i64;
    (0..count)
        .map(|i| {
            if i % 5 != 4 {
                minutes += 1 + i64::from(count.saturating_sub(i)) / 16;
            }
            row(i + 1, Duration::minutes(minutes))
        })
        .collect()
}

/// A schema with only a title property.
pub fn title_schema(database: &str) -> DatabaseSchema {
    serde_json::from_value(json!({
        "id": database,
        "properties": {
            "Name": {"id": "title", "name": "Name", "type": "title"}
        }
    }))
    .unwrap()
}

struct SimulatedDatabase {
    rows: Vec<Page>,
    schema: DatabaseSchema,
}

/// How the simulated workspace misbehaves.
#[derive(Debug, Clone, Copy, Default)]
pub enum Fault {
    #[default]
    None,
    /// The next `n` queries time out.
    TimeOut(u32),
    /// Every query times out.
    AlwaysTimeOut,
    /// Every query is rejected as unauthorized.
    Unauthorized,
}

#[derive(Default)]
pub struct SimulatedNotion {
    databases: HashMap<DatabaseId, SimulatedDatabase>,
    timeouts_left: AtomicU32,
    always_time_out: AtomicBool,
    unauthorized: AtomicBool,
    queries: AtomicU32,
    schema_reads: AtomicU32,
    log: Mutex<Vec<QueryOptions>>,
}

impl SimulatedNotion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a database. Rows are held oldest first; rows created at the
    /// same instant keep the order given.
    pub fn with_database(mut self, id: &str, mut rows: Vec<Page>, schema: DatabaseSchema) -> Self {
        rows.sort_by_key(|page| page.created_time);
        self.databases
            .insert(database_id(id), SimulatedDatabase { rows, schema });
        self
    }

    pub fn with_rows(self, id: &str, rows: Vec<Page>) -> Self {
        let schema = title_schema(id);
        self.with_database(id, rows, schema)
    }

    pub fn with_fault(self, fault: Fault) -> Self {
        match fault {
            Fault::None => {}
            Fault::TimeOut(n) => self.timeouts_left.store(n, Ordering::SeqCst),
            Fault::AlwaysTimeOut => self.always_time_out.store(true, Ordering::SeqCst),
            Fault::Unauthorized => self.unauthorized.store(true, Ordering::SeqCst),
        }
        self
    }

    /// Queries received, including the ones that failed.
    pub fn queries(&self) -> u32 {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn schema_reads(&self) -> u32 {
        self.schema_reads.load(Ordering::SeqCst)
    }

    pub fn query_log(&self) -> Vec<QueryOptions> {
        self.log.lock().unwrap().clone()
    }

    fn database(&self, id: &DatabaseId) -> Result<&SimulatedDatabase, AppError> {
        self.databases.get(id).ok_or_else(|| AppError::NotionService {
            code: NotionErrorCode::ObjectNotFound,
            message: format!("Could not find database with ID: {}", id.to_dashed()),
            status: reqwest::StatusCode::NOT_FOUND,
        })
    }

    fn fail_if_faulty(&self, endpoint: String) -> Result<(), AppError> {
        if self.unauthorized.load(Ordering::SeqCst) {
            return Err(AppError::NotionService {
                code: NotionErrorCode::Unauthorized,
                message: "API token is invalid.".to_string(),
                status: reqwest::StatusCode::UNAUTHORIZED,
            });
        }
        let scripted = self
            .timeouts_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if scripted || self.always_time_out.load(Ordering::SeqCst) {
            return Err(AppError::RequestTimeout { endpoint });
        }
        Ok(())
    }
}

fn matches(filter: &QueryFilter, page: &Page) -> bool {
    match filter {
        QueryFilter::And { and } => and.iter().all(|inner| matches(inner, page)),
        QueryFilter::CreatedTime(condition) => condition.created_time.matches(page.created_time),
        QueryFilter::Raw(_) => true,
    }
}

#[async_trait::async_trait]
impl DatabaseTransport for SimulatedNotion {
    async fn query_database(
        &self,
        database: &DatabaseId,
        options: &QueryOptions,
    ) -> Result<QueryResponse, AppError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(options.clone());
        tokio::task::yield_now().await;
        self.fail_if_faulty(format!("databases/{}/query", database))?;

        let simulated = self.database(database)?;
        let mut selected: Vec<&Page> = simulated
            .rows
            .iter()
            .filter(|page| options.filter.as_ref().map_or(true, |f| matches(f, page)))
            .collect();
        let descending = options
            .sorts
            .first()
            .is_some_and(|sort| sort.direction == SortDirection::Descending);
        if descending {
            selected.reverse();
        }

        let start = match &options.start_cursor {
            None => 0,
            Some(cursor) => {
                let id = PageId::parse(cursor).map_err(AppError::from)?;
                selected
                    .iter()
                    .position(|page| page.id == id)
                    .ok_or_else(|| AppError::NotionService {
                        code: NotionErrorCode::ValidationFailed,
                        message: format!("start_cursor {} is not valid", cursor),
                        status: reqwest::StatusCode::BAD_REQUEST,
                    })?
            }
        };

        let end = (start + options.page_size as usize).min(selected.len());
        let next = selected.get(end);
        Ok(QueryResponse {
            results: selected[start..end].iter().map(|page| (*page).clone()).collect(),
            next_cursor: next.map(|page| page.id.to_dashed()),
            has_more: next.is_some(),
        })
    }

    async fn retrieve_database(&self, database: &DatabaseId) -> Result<DatabaseSchema, AppError> {
        self.schema_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.database(database)?.schema.clone())
    }
}

/// Ids of `pages`, sorted, for order-insensitive comparison.
pub fn id_set(pages: &[Page]) -> Vec<String> {
    let mut ids: Vec<String> = pages.iter().map(|page| page.id.to_string()).collect();
    ids.sort();
    ids
}
