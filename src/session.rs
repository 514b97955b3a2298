//! Session lifecycle for documents on disk.

use std::path::Path;

use crate::accessor::ProjectAccessor;
use crate::error::AccessorResult;
use crate::host::FileHost;

pub type FileAccessor = ProjectAccessor<FileHost>;

impl ProjectAccessor<FileHost> {
    /// Opens the document at `path`, which must already exist.
    pub fn open<P: AsRef<Path>>(path: P) -> AccessorResult<Self> {
        Ok(Self::new(FileHost::open(path)?))
    }

    /// Starts a new document at `path`; fails if something is already there.
    pub fn create<P: AsRef<Path>>(path: P) -> AccessorResult<Self> {
        Ok(Self::new(FileHost::create(path)?))
    }

    pub fn open_or_create<P: AsRef<Path>>(path: P) -> AccessorResult<Self> {
        Ok(Self::new(FileHost::open_or_create(path)?))
    }
}

/// Opens the document at `path` (creating it when missing), runs `f`, then
/// saves and releases the document even if `f` failed.
pub fn with_project<P, T, F>(path: P, f: F) -> AccessorResult<T>
where
    P: AsRef<Path>,
    F: FnOnce(&mut FileAccessor) -> AccessorResult<T>,
{
    let host = FileHost::open_or_create(path)?;
    ProjectAccessor::with_host(host, f)
}
