// src/formatting/properties/formatters.rs
//! Type-specific formatting implementations for Notion properties.
//!
//! This module contains the logic for converting Notion property values
//! into flat display values, organized by property type. Relations are the
//! one type that needs other databases; they are handed to a
//! [`RelationResolver`].

use super::types::{FormattedProperty, FormattedValue, Link};
use crate::error::AppError;
use crate::model::{
    DateValue, FileReference, FormulaResult, PartialUser, PropertyTypeValue, RelationReference,
    RichTextItem, RollupResult, SelectOption, UniqueIdData,
};

/// Turns the pages a relation property points at into display values.
pub trait RelationResolver {
    fn resolve_relation(
        &self,
        property_id: &str,
        related: &[RelationReference],
    ) -> Result<FormattedProperty, AppError>;
}

// --- Main Formatting Entry Point ---

/// Formats a property value.
///
/// `property_id` is `None` for values nested in a rollup array; relations
/// found there cannot be traced to a target database and are shown as the
/// related page IDs.
pub fn format_property_value(
    value: &PropertyTypeValue,
    property_id: Option<&str>,
    relations: &dyn RelationResolver,
) -> Result<FormattedProperty, AppError> {
    use PropertyTypeValue::*;

    log::trace!(
        "Formatting property ID: {:?}, Type: {}",
        property_id,
        value.type_name()
    );

    let formatted = match value {
        Number { number } => format_number(*number),
        Url { url } => FormattedProperty::from_option(
            url.as_deref().map(|u| FormattedValue::Link(Link::new(u, u))),
        ),
        Checkbox { checkbox } => FormattedProperty::Single(FormattedValue::Boolean(*checkbox)),
        CreatedBy { created_by } => format_user(created_by),
        CreatedTime { created_time } => FormattedProperty::Single(FormattedValue::Date(*created_time)),
        Date { date } => format_date(date.as_ref()),
        Email { email } => format_optional_text(email.as_deref()),
        Files { files } => format_files(files),
        Formula { formula } => format_formula(formula),
        LastEditedBy { last_edited_by } => format_user(last_edited_by),
        LastEditedTime { last_edited_time } => {
            FormattedProperty::Single(FormattedValue::Date(*last_edited_time))
        }
        MultiSelect { multi_select } => format_multi_select(multi_select),
        People { people } => FormattedProperty::list(people.iter().map(user_name)),
        PhoneNumber { phone_number } => format_optional_text(phone_number.as_deref()),
        Relation { relation } => match property_id {
            Some(id) => relations.resolve_relation(id, relation)?,
            None => FormattedProperty::list(
                relation
                    .iter()
                    .map(|r| Some(FormattedValue::Text(r.id.as_str().to_string()))),
            ),
        },
        RichText { rich_text } => format_rich_text(rich_text),
        Rollup { rollup } => format_rollup(rollup, relations)?,
        Select { select } | Status { status: select } => format_select(select.as_ref()),
        Title { title } => format_rich_text(title),
        UniqueId { unique_id } => {
            FormattedProperty::from_option(format_unique_id(unique_id).map(FormattedValue::Text))
        }
        Verification { verification } => FormattedProperty::from_option(
            verification
                .as_ref()
                .map(|v| FormattedValue::Text(v.state.clone())),
        ),
        Unsupported => FormattedProperty::Empty,
    };
    Ok(formatted)
}

// --- Scalars ---

fn format_number(number: Option<f64>) -> FormattedProperty {
    FormattedProperty::from_option(number.map(FormattedValue::Number))
}

fn format_optional_text(text: Option<&str>) -> FormattedProperty {
    FormattedProperty::from_option(text.map(|t| FormattedValue::Text(t.to_string())))
}

fn format_select(select: Option<&SelectOption>) -> FormattedProperty {
    format_optional_text(select.map(|option| option.name.as_str()))
}

fn format_multi_select(multi_select: &[SelectOption]) -> FormattedProperty {
    FormattedProperty::list(
        multi_select
            .iter()
            .map(|option| Some(FormattedValue::Text(option.name.clone()))),
    )
}

// --- Text ---

/// A linked run becomes a link, any other run its text; empty runs vanish.
fn format_text_item(item: &RichTextItem) -> Option<FormattedValue> {
    match &item.href {
        Some(href) => Some(FormattedValue::Link(Link::new(item.plain_text.clone(), href.clone()))),
        None if item.plain_text.is_empty() => None,
        None => Some(FormattedValue::Text(item.plain_text.clone())),
    }
}

fn format_rich_text(items: &[RichTextItem]) -> FormattedProperty {
    FormattedProperty::list(items.iter().map(format_text_item))
}

// --- People ---

/// Users are shown by name. Without user-read capability the API omits it.
fn user_name(user: &PartialUser) -> Option<FormattedValue> {
    user.name.clone().map(FormattedValue::Text)
}

fn format_user(user: &PartialUser) -> FormattedProperty {
    FormattedProperty::from_option(user_name(user))
}

// --- Dates ---

fn format_date(date: Option<&DateValue>) -> FormattedProperty {
    let Some(date) = date else {
        return FormattedProperty::List(Vec::new());
    };
    FormattedProperty::list([
        Some(FormattedValue::Date(date.start.to_utc())),
        date.end.map(|end| FormattedValue::Date(end.to_utc())),
    ])
}

// --- Files ---

fn format_files(files: &[FileReference]) -> FormattedProperty {
    FormattedProperty::list(files.iter().map(|file| {
        file.url()
            .map(|url| FormattedValue::Link(Link::new(file.name.clone(), url)))
    }))
}

// --- Formula ---

fn format_formula(formula: &FormulaResult) -> FormattedProperty {
    match formula {
        FormulaResult::Boolean { boolean } => {
            FormattedProperty::from_option(boolean.map(FormattedValue::Boolean))
        }
        FormulaResult::Date { date } => format_date(date.as_ref()),
        FormulaResult::Number { number } => format_number(*number),
        FormulaResult::String { string } => {
            format_optional_text(string.as_deref().filter(|s| !s.is_empty()))
        }
    }
}

// --- Rollup ---

fn format_rollup(
    rollup: &RollupResult,
    relations: &dyn RelationResolver,
) -> Result<FormattedProperty, AppError> {
    Ok(match rollup {
        RollupResult::Number { number } => format_number(*number),
        RollupResult::Date { date } => format_date(date.as_ref()),
        RollupResult::Array { array } => {
            let mut values = Vec::new();
            for item in array {
                values.extend(format_property_value(item, None, relations)?.into_values());
            }
            FormattedProperty::List(values)
        }
        RollupResult::Unsupported => FormattedProperty::Empty,
    })
}

// --- ID Formatters ---

/// `PREFIX-N`, or just `N` without a prefix. A missing or zero number
/// means the ID has not been assigned.
fn format_unique_id(unique_id: &UniqueIdData) -> Option<String> {
    let number = unique_id.number.filter(|n| *n != 0)?;
    Some(match unique_id.prefix.as_deref() {
        Some(prefix) if !prefix.is_empty() => format!("{}-{}", prefix, number),
        _ => number.to_string(),
    })
}
