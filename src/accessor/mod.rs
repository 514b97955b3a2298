//! The schema-mapped entity accessor.
//!
//! A [`ProjectAccessor`] drives exactly one open host session. Every call is a
//! synchronous round trip to the host; nothing is cached between calls.
//!
//! Name lookups (`find_task_by_name`, `find_resource_by_name` and the `*_id`
//! variants) match names exactly and case-sensitively, and when several
//! records share a name the first one in native order wins.

use tracing::{info, warn};

use crate::error::{AccessorError, AccessorResult};
use crate::fields::{self, Attribute};
use crate::host::document::RecordFields;
use crate::host::{EntityKind, FieldValue, HostError, HostField, ProjectHost, RecordId};

mod availability;
mod resources;
mod tasks;

#[derive(Debug)]
pub struct ProjectAccessor<H: ProjectHost> {
    host: H,
    open: bool,
}

impl<H: ProjectHost> ProjectAccessor<H> {
    /// Attaches to a host session that is already open.
    pub fn new(host: H) -> Self {
        Self { host, open: true }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Direct access to the host, for inspection.
    pub fn host(&self) -> &H {
        &self.host
    }

    fn host_ref(&self) -> AccessorResult<&H> {
        if self.open {
            Ok(&self.host)
        } else {
            Err(AccessorError::HostUnavailable(HostError::Closed))
        }
    }

    fn host_mut(&mut self) -> AccessorResult<&mut H> {
        if self.open {
            Ok(&mut self.host)
        } else {
            Err(AccessorError::HostUnavailable(HostError::Closed))
        }
    }

    /// Persists the document without ending the session.
    pub fn save(&mut self) -> AccessorResult<()> {
        self.host_mut()?.save()?;
        Ok(())
    }

    /// Saves and releases the session. Release is attempted even when the save
    /// fails; the save error is reported first. Closing twice is a no-op.
    pub fn close(&mut self) -> AccessorResult<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        let saved = self.host.save();
        let closed = self.host.close();
        info!(saved = saved.is_ok(), released = closed.is_ok(), "session closed");
        saved?;
        closed?;
        Ok(())
    }

    /// Runs `f` against an accessor for `host`, then saves and releases the
    /// session whether or not `f` succeeded. An error from `f` takes priority
    /// over an error from closing.
    pub fn with_host<T, F>(host: H, f: F) -> AccessorResult<T>
    where
        F: FnOnce(&mut ProjectAccessor<H>) -> AccessorResult<T>,
    {
        let mut accessor = Self::new(host);
        let result = f(&mut accessor);
        let closed = accessor.close();
        match (result, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                warn!(error = %close_err, "session cleanup failed after an earlier error");
                Err(err)
            }
        }
    }
}

impl<H: ProjectHost> Drop for ProjectAccessor<H> {
    fn drop(&mut self) {
        if self.open {
            if let Err(err) = self.close() {
                warn!(error = %err, "failed to save and release session on drop");
            }
        }
    }
}

fn read_slots<H: ProjectHost>(
    host: &H,
    kind: EntityKind,
    id: RecordId,
) -> AccessorResult<RecordFields> {
    let mut record = RecordFields::new();
    for (_, slot) in fields::slots(kind) {
        record.insert(*slot, host.field(kind, id, *slot)?);
    }
    Ok(record)
}

fn read_name<H: ProjectHost>(host: &H, kind: EntityKind, id: RecordId) -> AccessorResult<String> {
    Ok(host
        .field(kind, id, HostField::Name)?
        .as_text()
        .unwrap_or_default()
        .to_string())
}

fn write_attribute<H: ProjectHost>(
    host: &mut H,
    kind: EntityKind,
    id: RecordId,
    attribute: Attribute,
    value: FieldValue,
) -> AccessorResult<()> {
    let (slot, raw) = fields::encode(kind, attribute, value)?;
    host.set_field(kind, id, slot, raw)?;
    Ok(())
}

fn require<H: ProjectHost>(host: &H, kind: EntityKind, id: RecordId) -> AccessorResult<()> {
    if host.contains(kind, id)? {
        Ok(())
    } else {
        Err(AccessorError::not_found(kind, id))
    }
}

/// First record of `kind` whose name equals `name`, in native order.
fn first_named<H: ProjectHost>(
    host: &H,
    kind: EntityKind,
    name: &str,
) -> AccessorResult<RecordId> {
    for id in host.record_ids(kind)? {
        if read_name(host, kind, id)? == name {
            return Ok(id);
        }
    }
    Err(AccessorError::not_found(kind, name))
}
