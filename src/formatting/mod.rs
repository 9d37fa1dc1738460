// src/formatting/mod.rs
//! Projects database snapshots into flat, display-ready page records.

mod properties;

pub use properties::{
    format_property_value, FormattedPage, FormattedProperty, FormattedValue, Link,
    RelationResolver,
};

use crate::error::AppError;
use crate::model::{Page, PropertyConfig, PropertyTypeValue, RelationReference};
use crate::types::{DatabaseId, PageId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything fetched from one database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub pages: Vec<Page>,
    pub property_configs: Vec<PropertyConfig>,
}

/// Snapshots of the databases a formatter can draw on, including the
/// targets of relation properties.
pub type Databases = HashMap<DatabaseId, DatabaseSnapshot>;

/// Formats pages of the databases it was given.
pub struct NotionFormatter {
    databases: Databases,
    page_index: HashMap<DatabaseId, HashMap<PageId, usize>>,
}

impl NotionFormatter {
    pub fn new(databases: Databases) -> Self {
        let page_index = databases
            .iter()
            .map(|(id, snapshot)| {
                let positions = snapshot
                    .pages
                    .iter()
                    .enumerate()
                    .map(|(position, page)| (page.id.clone(), position))
                    .collect();
                (id.clone(), positions)
            })
            .collect();
        Self {
            databases,
            page_index,
        }
    }

    pub fn databases(&self) -> &Databases {
        &self.databases
    }

    /// Formats every page of a database, in snapshot order.
    pub fn format_database(&self, database: &DatabaseId) -> Result<Vec<FormattedPage>, AppError> {
        let snapshot = self.snapshot(database)?;
        snapshot
            .pages
            .iter()
            .map(|page| self.format_page(database, page))
            .collect()
    }

    /// Formats one page against the schema of `database`.
    ///
    /// Keys are the schema's property IDs in schema order, followed by `id`.
    /// Properties the page does not carry are `Empty`.
    pub fn format_page(&self, database: &DatabaseId, page: &Page) -> Result<FormattedPage, AppError> {
        let snapshot = self.snapshot(database)?;
        let context = DatabaseContext {
            formatter: self,
            database,
        };

        let mut formatted = FormattedPage::with_capacity(snapshot.property_configs.len() + 1);
        for config in &snapshot.property_configs {
            formatted.insert(config.id.clone(), FormattedProperty::Empty);
        }
        formatted.insert(
            "id".to_string(),
            FormattedProperty::Single(FormattedValue::Link(Link::new(
                page.id.to_dashed(),
                page.url.clone(),
            ))),
        );

        for config in &snapshot.property_configs {
            if let Some(value) = page.property_by_id(&config.id) {
                let property =
                    format_property_value(&value.type_specific_value, Some(value.id.as_str()), &context)?;
                formatted.insert(config.id.clone(), property);
            }
        }
        Ok(formatted)
    }

    fn snapshot(&self, database: &DatabaseId) -> Result<&DatabaseSnapshot, AppError> {
        self.databases
            .get(database)
            .ok_or_else(|| AppError::UnknownDatabase(database.to_string()))
    }

    fn page(&self, database: &DatabaseId, id: &PageId) -> Option<&Page> {
        let position = *self.page_index.get(database)?.get(id)?;
        self.databases.get(database)?.pages.get(position)
    }
}

/// Relation resolution from the point of view of one database.
struct DatabaseContext<'a> {
    formatter: &'a NotionFormatter,
    database: &'a DatabaseId,
}

impl RelationResolver for DatabaseContext<'_> {
    /// Shows related pages by their title. Pages missing from the target
    /// snapshot, or without a title, are left out.
    fn resolve_relation(
        &self,
        property_id: &str,
        related: &[RelationReference],
    ) -> Result<FormattedProperty, AppError> {
        let target = self
            .formatter
            .databases
            .get(self.database)
            .and_then(|snapshot| {
                snapshot
                    .property_configs
                    .iter()
                    .find(|config| config.id == property_id)
            })
            .and_then(|config| config.relation_database.as_ref())
            .ok_or_else(|| AppError::MissingRelationTarget {
                property_id: property_id.to_string(),
            })?;

        let target_context = DatabaseContext {
            formatter: self.formatter,
            database: target,
        };

        let mut values = Vec::new();
        for reference in related {
            let Some(page) = self.formatter.page(target, &reference.id) else {
                continue;
            };
            let title = page
                .properties
                .values()
                .find(|value| matches!(value.type_specific_value, PropertyTypeValue::Title { .. }));
            if let Some(title) = title {
                let formatted =
                    format_property_value(&title.type_specific_value, Some(title.id.as_str()), &target_context)?;
                values.extend(formatted.into_values());
            }
        }
        Ok(FormattedProperty::List(values))
    }
}
