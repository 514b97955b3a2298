//! Record-oriented interface to the document host.
//!
//! The host owns the project document: task and resource collections, the
//! assignment relation between them, and persistence. The accessor layer only
//! talks to it through [`ProjectHost`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::persistence::PersistenceError;

pub mod document;
pub mod file;

pub use document::{ProjectDocument, ResourceRow, TaskRow};
pub use file::{DocumentFormat, FileHost};

/// Host-assigned record identity, stable while the document is open.
pub type RecordId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    Resource,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Task => "task",
            EntityKind::Resource => "resource",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named fields exposed by host records. `Text*`, `Number*` and `Notes` are
/// generic custom slots with no meaning of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HostField {
    Name,
    Start,
    Finish,
    Text1,
    Text2,
    Text3,
    Number1,
    Number2,
    Number3,
    Number4,
    Notes,
}

impl HostField {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostField::Name => "Name",
            HostField::Start => "Start",
            HostField::Finish => "Finish",
            HostField::Text1 => "Text1",
            HostField::Text2 => "Text2",
            HostField::Text3 => "Text3",
            HostField::Number1 => "Number1",
            HostField::Number2 => "Number2",
            HostField::Number3 => "Number3",
            HostField::Number4 => "Number4",
            HostField::Notes => "Notes",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            HostField::Number1 | HostField::Number2 | HostField::Number3 | HostField::Number4
        )
    }

    pub fn is_date(&self) -> bool {
        matches!(self, HostField::Start | HostField::Finish)
    }

    fn expected_type(&self) -> &'static str {
        if self.is_numeric() {
            "number"
        } else if self.is_date() {
            "date"
        } else {
            "text"
        }
    }

    /// Whether `value` has the shape this field stores. `Empty` clears any field.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match value {
            FieldValue::Empty => true,
            FieldValue::Text(_) => !self.is_numeric() && !self.is_date(),
            FieldValue::Number(_) => self.is_numeric(),
            FieldValue::Date(_) => self.is_date(),
        }
    }
}

impl fmt::Display for HostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw value stored in a host field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map(FieldValue::Number).unwrap_or_default()
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map(FieldValue::Text).unwrap_or_default()
    }
}

/// One task-resource link recorded by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub task_id: RecordId,
    pub resource_id: RecordId,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("document session is closed")]
    Closed,

    #[error("{kind} record {id} does not exist")]
    RecordNotFound { kind: EntityKind, id: RecordId },

    #[error("field {field} only accepts {expected} values")]
    FieldType {
        field: HostField,
        expected: &'static str,
    },

    #[error("outline error: {0}")]
    Outline(String),

    #[error("{0}")]
    Persistence(#[from] PersistenceError),
}

pub type HostResult<T> = Result<T, HostError>;

/// A live, open project document.
///
/// Tasks are enumerated in outline order (top to bottom as displayed), resources
/// and assignments in creation order. Deleting a record removes every assignment
/// that references it.
pub trait ProjectHost {
    fn record_ids(&self, kind: EntityKind) -> HostResult<Vec<RecordId>>;

    fn contains(&self, kind: EntityKind, id: RecordId) -> HostResult<bool>;

    /// Creates a task row named `name` at outline position `position`, or at
    /// the end of the list when `None`. The row takes the outline level of the
    /// row above it.
    fn add_task(&mut self, name: &str, position: Option<usize>) -> HostResult<RecordId>;

    fn add_resource(&mut self, name: &str) -> HostResult<RecordId>;

    fn delete_record(&mut self, kind: EntityKind, id: RecordId) -> HostResult<()>;

    fn field(&self, kind: EntityKind, id: RecordId, field: HostField) -> HostResult<FieldValue>;

    fn set_field(
        &mut self,
        kind: EntityKind,
        id: RecordId,
        field: HostField,
        value: FieldValue,
    ) -> HostResult<()>;

    /// 1-based nesting depth of a task.
    fn outline_level(&self, task: RecordId) -> HostResult<u32>;

    fn indent_task(&mut self, task: RecordId) -> HostResult<()>;

    fn outdent_task(&mut self, task: RecordId) -> HostResult<()>;

    /// Assignments referencing the given task or resource, in creation order.
    fn assignments(&self, kind: EntityKind, id: RecordId) -> HostResult<Vec<Assignment>>;

    fn add_assignment(&mut self, task: RecordId, resource: RecordId) -> HostResult<()>;

    fn save(&mut self) -> HostResult<()>;

    fn close(&mut self) -> HostResult<()>;
}
