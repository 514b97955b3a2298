use chrono::NaiveDate;

use super::{ProjectAccessor, require};
use crate::error::{AccessorError, AccessorResult};
use crate::host::{EntityKind, HostField, ProjectHost, RecordId};
use crate::query::{ResourceQuery, intervals_overlap};
use crate::resource::ResourceView;

impl<H: ProjectHost> ProjectAccessor<H> {
    /// True when none of the resource's assigned tasks overlaps `[start, end]`.
    /// Tasks without both dates never conflict.
    pub fn check_availability(
        &self,
        resource: RecordId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AccessorResult<bool> {
        if end < start {
            return Err(AccessorError::InvalidDateRange { start, end });
        }
        let host = self.host_ref()?;
        require(host, EntityKind::Resource, resource)?;
        for assignment in host.assignments(EntityKind::Resource, resource)? {
            let task_start = host
                .field(EntityKind::Task, assignment.task_id, HostField::Start)?
                .as_date();
            let task_finish = host
                .field(EntityKind::Task, assignment.task_id, HostField::Finish)?
                .as_date();
            let (Some(task_start), Some(task_finish)) = (task_start, task_finish) else {
                continue;
            };
            if intervals_overlap(start, end, task_start, task_finish) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Resources matching every predicate in `query`, in native order.
    pub fn query(&self, query: &ResourceQuery) -> AccessorResult<Vec<ResourceView>> {
        let window = query.window()?;
        let mut matches = Vec::new();
        for resource in self.list_resources()? {
            if !query.matches(&resource) {
                continue;
            }
            if let Some((start, end)) = window {
                if !self.check_availability(resource.id, start, end)? {
                    continue;
                }
            }
            matches.push(resource);
        }
        Ok(matches)
    }
}
