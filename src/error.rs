//! Errors surfaced by the accessor.

use chrono::NaiveDate;
use thiserror::Error;

use crate::fields::Attribute;
use crate::host::{EntityKind, HostError};
use crate::persistence::PersistenceError;

#[derive(Debug, Error)]
pub enum AccessorError {
    /// Identity or name lookup miss.
    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    #[error("invalid date range: end {end} is before start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid resource category '{0}'")]
    InvalidCategory(String),

    /// One half of a start/end pair was given without the other.
    #[error("'{given}' was given without '{missing}'")]
    MissingPair {
        given: &'static str,
        missing: &'static str,
    },

    #[error("unknown attribute '{attribute}' for {entity}")]
    UnknownAttribute { entity: EntityKind, attribute: String },

    #[error("invalid value for {attribute}: {reason}")]
    InvalidValue { attribute: Attribute, reason: String },

    /// Session not open, or the host call failed.
    #[error("host unavailable: {0}")]
    HostUnavailable(#[from] HostError),
}

impl AccessorError {
    pub(crate) fn not_found(kind: EntityKind, key: impl ToString) -> Self {
        AccessorError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AccessorError::NotFound { .. })
    }
}

impl From<PersistenceError> for AccessorError {
    fn from(value: PersistenceError) -> Self {
        AccessorError::HostUnavailable(HostError::Persistence(value))
    }
}

pub type AccessorResult<T> = Result<T, AccessorError>;
