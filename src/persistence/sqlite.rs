use super::{DocumentStore, PersistenceError, PersistenceResult};
use crate::host::{Assignment, ProjectDocument, ResourceRow, TaskRow};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

#[derive(Serialize, Deserialize)]
struct DocumentHeader {
    next_task_id: i32,
    next_resource_id: i32,
}

/// Stores the document in SQLite: one row per task (keyed by outline
/// position), resource and assignment, each record as JSON.
pub struct SqliteDocumentStore {
    connection: Mutex<Connection>,
}

impl SqliteDocumentStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS document_header (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                header_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                position INTEGER PRIMARY KEY,
                id INTEGER NOT NULL UNIQUE,
                task_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS resources (
                position INTEGER PRIMARY KEY,
                id INTEGER NOT NULL UNIQUE,
                resource_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS assignments (
                position INTEGER PRIMARY KEY,
                task_id INTEGER NOT NULL,
                resource_id INTEGER NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::InvalidData("sqlite connection lock poisoned".into()))
    }

    fn save_rows(tx: &rusqlite::Transaction, document: &ProjectDocument) -> PersistenceResult<()> {
        tx.execute("DELETE FROM tasks", [])?;
        tx.execute("DELETE FROM resources", [])?;
        tx.execute("DELETE FROM assignments", [])?;

        let mut stmt =
            tx.prepare("INSERT INTO tasks (position, id, task_json) VALUES (?1, ?2, ?3)")?;
        for (position, row) in document.tasks().iter().enumerate() {
            let json = serde_json::to_string(row)?;
            stmt.execute(params![position as i64, row.id, json])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO resources (position, id, resource_json) VALUES (?1, ?2, ?3)",
        )?;
        for (position, row) in document.resources().iter().enumerate() {
            let json = serde_json::to_string(row)?;
            stmt.execute(params![position as i64, row.id, json])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO assignments (position, task_id, resource_id) VALUES (?1, ?2, ?3)",
        )?;
        for (position, assignment) in document.all_assignments().iter().enumerate() {
            stmt.execute(params![
                position as i64,
                assignment.task_id,
                assignment.resource_id
            ])?;
        }
        Ok(())
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn save_document(&self, document: &ProjectDocument) -> PersistenceResult<()> {
        super::validate_document(document)?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let header = DocumentHeader {
            next_task_id: document.next_task_id,
            next_resource_id: document.next_resource_id,
        };
        tx.execute("DELETE FROM document_header", [])?;
        tx.execute(
            "INSERT INTO document_header (id, header_json) VALUES (1, ?1)",
            params![serde_json::to_string(&header)?],
        )?;
        Self::save_rows(&tx, document)?;
        tx.commit()?;
        Ok(())
    }

    fn load_document(&self) -> PersistenceResult<Option<ProjectDocument>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT header_json FROM document_header WHERE id = 1")?;
        let header_json: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;
        let Some(header_json) = header_json else {
            return Ok(None);
        };
        let header: DocumentHeader = serde_json::from_str(&header_json)?;

        let mut document = ProjectDocument::new();
        document.next_task_id = header.next_task_id;
        document.next_resource_id = header.next_resource_id;

        let mut stmt = conn.prepare("SELECT task_json FROM tasks ORDER BY position ASC")?;
        for json in stmt.query_map([], |row| row.get::<_, String>(0))? {
            let row: TaskRow = serde_json::from_str(&json?)?;
            document.tasks.push(row);
        }

        let mut stmt = conn.prepare("SELECT resource_json FROM resources ORDER BY position ASC")?;
        for json in stmt.query_map([], |row| row.get::<_, String>(0))? {
            let row: ResourceRow = serde_json::from_str(&json?)?;
            document.resources.push(row);
        }

        let mut stmt = conn.prepare(
            "SELECT task_id, resource_id FROM assignments ORDER BY position ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Assignment {
                task_id: row.get(0)?,
                resource_id: row.get(1)?,
            })
        })?;
        for assignment in rows {
            document.assignments.push(assignment?);
        }

        super::validate_document(&document)?;
        Ok(Some(document))
    }
}
