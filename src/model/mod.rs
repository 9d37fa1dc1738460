// src/model/mod.rs
//! Wire records of the Notion database API: pages (database rows) and the
//! database schema they are typed against.

mod property_value;

pub use property_value::{
    DateValue, FileReference, FileUrl, FormulaResult, NotionDate, PartialUser, PropertyTypeValue,
    PropertyValue, RelationReference, RichTextItem, RollupResult, SelectOption, UniqueIdData,
    VerificationData,
};

use crate::types::{DatabaseId, PageId, PropertyName};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of a Notion database.
///
/// The query layer only reads `id` and `created_time`; properties are carried
/// through untouched for the formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub created_time: DateTime<Utc>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub properties: HashMap<PropertyName, PropertyValue>,
}

impl Page {
    /// Looks a property up by its stable ID rather than its display name.
    pub fn property_by_id(&self, property_id: &str) -> Option<&PropertyValue> {
        self.properties.values().find(|value| value.id == property_id)
    }
}

/// Response of `GET databases/{id}`, reduced to the property schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub id: DatabaseId,
    #[serde(default)]
    pub properties: IndexMap<PropertyName, SchemaProperty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaProperty {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<RelationSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSchema {
    pub database_id: DatabaseId,
}

/// A database property as the formatter needs it: stable id, display name,
/// type, and for relations the database the related pages live in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyConfig {
    pub id: String,
    pub name: String,
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_database: Option<DatabaseId>,
}

impl DatabaseSchema {
    /// Flattens the schema into property configs, preserving schema order.
    pub fn property_configs(&self) -> Vec<PropertyConfig> {
        self.properties
            .values()
            .map(|property| PropertyConfig {
                id: property.id.clone(),
                name: property.name.clone(),
                property_type: property.property_type.clone(),
                relation_database: property
                    .relation
                    .as_ref()
                    .map(|relation| relation.database_id.clone()),
            })
            .collect()
    }
}
