pub mod accessor;
pub mod error;
pub mod fields;
pub mod host;
pub mod persistence;
pub mod query;
pub mod report;
pub mod resource;
pub mod session;
pub mod task;

#[cfg(any(feature = "cli", feature = "http_api"))]
pub mod logging;

#[cfg(feature = "http_api")]
pub mod http_api;

pub use accessor::ProjectAccessor;
pub use error::{AccessorError, AccessorResult};
pub use fields::Attribute;
pub use host::{
    Assignment, EntityKind, FieldValue, FileHost, HostError, HostField, ProjectDocument,
    ProjectHost, RecordId,
};
pub use persistence::{
    DocumentStore, JsonDocumentStore, PersistenceError, export_resources_to_csv,
    export_tasks_to_csv, validate_document,
};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteDocumentStore;
pub use query::{ResourceQuery, intervals_overlap};
pub use report::{resources_frame, tasks_frame};
pub use resource::{NewResource, ResourceCategory, ResourceView};
pub use session::{FileAccessor, with_project};
pub use task::{NewTask, TaskView};
