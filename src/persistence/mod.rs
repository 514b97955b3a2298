use crate::host::{EntityKind, ProjectDocument, RecordId};
use serde_json::Error as SerdeJsonError;
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum PersistenceError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    Csv(csv::Error),
    InvalidData(String),
    Missing(PathBuf),
    AlreadyExists(PathBuf),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            PersistenceError::Missing(path) => {
                write!(f, "no project document at {}", path.display())
            }
            PersistenceError::AlreadyExists(path) => {
                write!(f, "a project document already exists at {}", path.display())
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub trait DocumentStore {
    fn save_document(&self, document: &ProjectDocument) -> PersistenceResult<()>;
    fn load_document(&self) -> PersistenceResult<Option<ProjectDocument>>;
}

fn check_ids<I>(kind: EntityKind, ids: I, next_id: RecordId) -> PersistenceResult<HashSet<RecordId>>
where
    I: IntoIterator<Item = RecordId>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if id <= 0 || id >= next_id {
            return Err(PersistenceError::InvalidData(format!(
                "{kind} id {id} is outside the allocated range 1..{next_id}"
            )));
        }
        if !seen.insert(id) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate {kind} id {id}"
            )));
        }
    }
    Ok(seen)
}

/// Structural checks run before a document is written and after it is read.
pub fn validate_document(document: &ProjectDocument) -> PersistenceResult<()> {
    let task_ids = check_ids(
        EntityKind::Task,
        document.tasks().iter().map(|row| row.id),
        document.next_task_id,
    )?;
    let resource_ids = check_ids(
        EntityKind::Resource,
        document.resources().iter().map(|row| row.id),
        document.next_resource_id,
    )?;

    let mut previous_level = 0;
    for row in document.tasks() {
        if row.outline_level == 0 || row.outline_level > previous_level + 1 {
            return Err(PersistenceError::InvalidData(format!(
                "task {} has outline level {} after a row at level {}",
                row.id, row.outline_level, previous_level
            )));
        }
        previous_level = row.outline_level;
    }

    for (id, field, value) in document
        .tasks()
        .iter()
        .flat_map(|row| row.fields.iter().map(move |(f, v)| (row.id, f, v)))
        .chain(
            document
                .resources()
                .iter()
                .flat_map(|row| row.fields.iter().map(move |(f, v)| (row.id, f, v))),
        )
    {
        if !field.accepts(value) {
            return Err(PersistenceError::InvalidData(format!(
                "record {id} stores a mismatched value in {field}"
            )));
        }
    }

    for assignment in document.all_assignments() {
        if !task_ids.contains(&assignment.task_id) {
            return Err(PersistenceError::InvalidData(format!(
                "assignment references missing task {}",
                assignment.task_id
            )));
        }
        if !resource_ids.contains(&assignment.resource_id) {
            return Err(PersistenceError::InvalidData(format!(
                "assignment references missing resource {}",
                assignment.resource_id
            )));
        }
    }
    Ok(())
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{JsonDocumentStore, export_resources_to_csv, export_tasks_to_csv};
