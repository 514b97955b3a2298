use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{
    Assignment, EntityKind, FieldValue, HostError, HostField, HostResult, ProjectDocument,
    ProjectHost, RecordId,
};
use crate::persistence::{DocumentStore, JsonDocumentStore, PersistenceError, PersistenceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    #[cfg(feature = "sqlite")]
    Sqlite,
}

impl DocumentFormat {
    /// Picks the storage format from the file extension; anything that is not
    /// a SQLite extension is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            #[cfg(feature = "sqlite")]
            Some("db" | "sqlite" | "sqlite3") => DocumentFormat::Sqlite,
            _ => DocumentFormat::Json,
        }
    }

    fn store(self, path: &Path) -> PersistenceResult<Box<dyn DocumentStore + Send + Sync>> {
        Ok(match self {
            DocumentFormat::Json => Box::new(JsonDocumentStore::new(path)),
            #[cfg(feature = "sqlite")]
            DocumentFormat::Sqlite => {
                Box::new(crate::persistence::sqlite::SqliteDocumentStore::new(path)?)
            }
        })
    }
}

/// A [`ProjectDocument`] bound to a file on disk. `save` writes the document
/// through its [`DocumentStore`]; `close` releases it.
pub struct FileHost {
    path: PathBuf,
    document: ProjectDocument,
    store: Box<dyn DocumentStore + Send + Sync>,
}

impl std::fmt::Debug for FileHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHost")
            .field("path", &self.path)
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

impl FileHost {
    /// Opens an existing document. A store that exists but was never saved
    /// into (a SQLite file holding only its schema) opens as an empty document.
    pub fn open<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(PersistenceError::Missing(path));
        }
        let store = DocumentFormat::from_path(&path).store(&path)?;
        let mut document = match store.load_document()? {
            Some(document) => document,
            None => {
                warn!(path = %path.display(), "store holds no saved document, starting empty");
                ProjectDocument::new()
            }
        };
        document.reopen();
        info!(
            path = %path.display(),
            tasks = document.tasks().len(),
            resources = document.resources().len(),
            "opened project document"
        );
        Ok(Self {
            path,
            document,
            store,
        })
    }

    /// Starts a new, empty document. A JSON document is written on the first
    /// save; a SQLite store creates its file and schema right away.
    pub fn create<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            return Err(PersistenceError::AlreadyExists(path));
        }
        let store = DocumentFormat::from_path(&path).store(&path)?;
        info!(path = %path.display(), "created project document");
        Ok(Self {
            path,
            document: ProjectDocument::new(),
            store,
        })
    }

    pub fn open_or_create<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &ProjectDocument {
        &self.document
    }
}

impl ProjectHost for FileHost {
    fn record_ids(&self, kind: EntityKind) -> HostResult<Vec<RecordId>> {
        self.document.record_ids(kind)
    }

    fn contains(&self, kind: EntityKind, id: RecordId) -> HostResult<bool> {
        self.document.contains(kind, id)
    }

    fn add_task(&mut self, name: &str, position: Option<usize>) -> HostResult<RecordId> {
        self.document.add_task(name, position)
    }

    fn add_resource(&mut self, name: &str) -> HostResult<RecordId> {
        self.document.add_resource(name)
    }

    fn delete_record(&mut self, kind: EntityKind, id: RecordId) -> HostResult<()> {
        self.document.delete_record(kind, id)
    }

    fn field(&self, kind: EntityKind, id: RecordId, field: HostField) -> HostResult<FieldValue> {
        self.document.field(kind, id, field)
    }

    fn set_field(
        &mut self,
        kind: EntityKind,
        id: RecordId,
        field: HostField,
        value: FieldValue,
    ) -> HostResult<()> {
        self.document.set_field(kind, id, field, value)
    }

    fn outline_level(&self, task: RecordId) -> HostResult<u32> {
        self.document.outline_level(task)
    }

    fn indent_task(&mut self, task: RecordId) -> HostResult<()> {
        self.document.indent_task(task)
    }

    fn outdent_task(&mut self, task: RecordId) -> HostResult<()> {
        self.document.outdent_task(task)
    }

    fn assignments(&self, kind: EntityKind, id: RecordId) -> HostResult<Vec<Assignment>> {
        self.document.assignments(kind, id)
    }

    fn add_assignment(&mut self, task: RecordId, resource: RecordId) -> HostResult<()> {
        self.document.add_assignment(task, resource)
    }

    fn save(&mut self) -> HostResult<()> {
        if self.document.is_closed() {
            return Err(HostError::Closed);
        }
        self.store.save_document(&self.document)?;
        info!(path = %self.path.display(), "saved project document");
        Ok(())
    }

    fn close(&mut self) -> HostResult<()> {
        self.document.close()?;
        info!(path = %self.path.display(), "closed project document");
        Ok(())
    }
}
