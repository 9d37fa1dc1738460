// src/formatting/properties/types.rs
//! Domain types for formatted properties.
//!
//! A formatted property is flat: a single display value, a list of them, or
//! nothing. Serialized to JSON it becomes a scalar, an array or `null`.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A text with a target, e.g. a URL property or a linked run of rich text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub url: String,
}

impl Link {
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

/// One display value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormattedValue {
    Boolean(bool),
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
    Link(Link),
}

/// Represents a formatted property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FormattedProperty {
    #[default]
    Empty,
    Single(FormattedValue),
    List(Vec<FormattedValue>),
}

impl FormattedProperty {
    pub fn is_empty(&self) -> bool {
        matches!(self, FormattedProperty::Empty)
    }

    pub fn text(text: impl Into<String>) -> Self {
        FormattedProperty::Single(FormattedValue::Text(text.into()))
    }

    /// A single value, or `Empty` when there is none.
    pub fn from_option(value: Option<FormattedValue>) -> Self {
        value.map_or(FormattedProperty::Empty, FormattedProperty::Single)
    }

    /// Collects the present values into a list; absent ones are dropped.
    pub fn list(values: impl IntoIterator<Item = Option<FormattedValue>>) -> Self {
        FormattedProperty::List(values.into_iter().flatten().collect())
    }

    /// The values this property holds, flattened.
    pub fn into_values(self) -> Vec<FormattedValue> {
        match self {
            FormattedProperty::Empty => Vec::new(),
            FormattedProperty::Single(value) => vec![value],
            FormattedProperty::List(values) => values,
        }
    }
}

/// A page projected to display values, keyed by property ID in schema order,
/// plus an `id` entry linking to the page itself.
pub type FormattedPage = IndexMap<String, FormattedProperty>;
