// src/formatting/properties/mod.rs
//! Type-safe property formatting for Notion database values.

mod formatters;
mod types;

// Re-export the public interface
pub use formatters::{format_property_value, RelationResolver};
pub use types::{FormattedPage, FormattedProperty, FormattedValue, Link};
