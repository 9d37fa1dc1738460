use crate::types::PageId;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A page property: the typed value plus its property ID.
///
/// The property ID (not the display name) is the stable key: it survives
/// renames in the Notion UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub id: String,
    #[serde(flatten)]
    pub type_specific_value: PropertyTypeValue,
}

impl PropertyValue {
    /// Returns the Notion API type name for this property value.
    pub fn type_name(&self) -> &'static str {
        self.type_specific_value.type_name()
    }
}

/// The typed payload of a page property, tagged by the API's `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyTypeValue {
    Title {
        title: Vec<RichTextItem>,
    },
    RichText {
        rich_text: Vec<RichTextItem>,
    },
    Number {
        number: Option<f64>,
    },
    Select {
        select: Option<SelectOption>,
    },
    MultiSelect {
        multi_select: Vec<SelectOption>,
    },
    Status {
        status: Option<SelectOption>,
    },
    Date {
        date: Option<DateValue>,
    },
    Formula {
        formula: FormulaResult,
    },
    Relation {
        relation: Vec<RelationReference>,
    },
    Rollup {
        rollup: RollupResult,
    },
    People {
        people: Vec<PartialUser>,
    },
    Files {
        files: Vec<FileReference>,
    },
    Checkbox {
        checkbox: bool,
    },
    Url {
        url: Option<String>,
    },
    Email {
        email: Option<String>,
    },
    PhoneNumber {
        phone_number: Option<String>,
    },
    CreatedTime {
        created_time: DateTime<Utc>,
    },
    CreatedBy {
        created_by: PartialUser,
    },
    LastEditedTime {
        last_edited_time: DateTime<Utc>,
    },
    LastEditedBy {
        last_edited_by: PartialUser,
    },
    UniqueId {
        unique_id: UniqueIdData,
    },
    Verification {
        verification: Option<VerificationData>,
    },
    /// Buttons and any property type newer than this client.
    #[serde(other)]
    Unsupported,
}

impl PropertyTypeValue {
    /// Returns the Notion API type name for this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyTypeValue::Title { .. } => "title",
            PropertyTypeValue::RichText { .. } => "rich_text",
            PropertyTypeValue::Number { .. } => "number",
            PropertyTypeValue::Select { .. } => "select",
            PropertyTypeValue::MultiSelect { .. } => "multi_select",
            PropertyTypeValue::Status { .. } => "status",
            PropertyTypeValue::Date { .. } => "date",
            PropertyTypeValue::Formula { .. } => "formula",
            PropertyTypeValue::Relation { .. } => "relation",
            PropertyTypeValue::Rollup { .. } => "rollup",
            PropertyTypeValue::People { .. } => "people",
            PropertyTypeValue::Files { .. } => "files",
            PropertyTypeValue::Checkbox { .. } => "checkbox",
            PropertyTypeValue::Url { .. } => "url",
            PropertyTypeValue::Email { .. } => "email",
            PropertyTypeValue::PhoneNumber { .. } => "phone_number",
            PropertyTypeValue::CreatedTime { .. } => "created_time",
            PropertyTypeValue::CreatedBy { .. } => "created_by",
            PropertyTypeValue::LastEditedTime { .. } => "last_edited_time",
            PropertyTypeValue::LastEditedBy { .. } => "last_edited_by",
            PropertyTypeValue::UniqueId { .. } => "unique_id",
            PropertyTypeValue::Verification { .. } => "verification",
            PropertyTypeValue::Unsupported => "unsupported",
        }
    }
}

/// One run of rich text. Only the rendered text and its link are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
}

impl RichTextItem {
    /// Create a plain text item with no link.
    pub fn plain_text(text: &str) -> Self {
        Self {
            plain_text: text.to_string(),
            href: None,
        }
    }
}

/// Select, multi-select and status option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// A date or a date range. Notion sends either a bare date or a full timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: NotionDate,
    #[serde(default)]
    pub end: Option<NotionDate>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotionDate {
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
}

impl NotionDate {
    /// The instant this date denotes; bare dates are taken at midnight UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            NotionDate::DateTime(dt) => dt.with_timezone(&Utc),
            NotionDate::Date(d) => d.and_time(chrono::NaiveTime::default()).and_utc(),
        }
    }
}

/// Computed value of a formula property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormulaResult {
    String { string: Option<String> },
    Number { number: Option<f64> },
    Boolean { boolean: Option<bool> },
    Date { date: Option<DateValue> },
}

/// Aggregated value of a rollup property.
///
/// Array rollups carry full property values of the related pages, which may
/// themselves be of any property type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RollupResult {
    Number { number: Option<f64> },
    Date { date: Option<DateValue> },
    Array { array: Vec<PropertyTypeValue> },
    /// `incomplete` and `unsupported` rollups
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationReference {
    pub id: PageId,
}

/// Partial user representation; `name` is absent unless the integration
/// has user-read capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A file attached to a `files` property, either uploaded or external.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<FileUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileUrl>,
}

impl FileReference {
    /// The download URL, preferring the external link when both are present.
    pub fn url(&self) -> Option<&str> {
        self.external
            .as_ref()
            .or(self.file.as_ref())
            .map(|f| f.url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUrl {
    pub url: String,
}

/// Unique ID data structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueIdData {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub number: Option<i64>,
}

/// Verification data structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationData {
    pub state: String,
}
