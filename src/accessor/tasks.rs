use tracing::debug;

use super::{ProjectAccessor, first_named, read_name, read_slots, require, write_attribute};
use crate::error::{AccessorError, AccessorResult};
use crate::fields::{self, Attribute};
use crate::host::{EntityKind, FieldValue, HostField, ProjectHost, RecordId};
use crate::task::{NewTask, OutlineNumbering, TaskView};

impl<H: ProjectHost> ProjectAccessor<H> {
    /// All tasks in outline order, top to bottom.
    pub fn list_tasks(&self) -> AccessorResult<Vec<TaskView>> {
        let host = self.host_ref()?;
        let ids = host.record_ids(EntityKind::Task)?;
        let mut numbering = OutlineNumbering::default();
        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            let level = host.outline_level(id)?;
            let number = numbering.next(level);
            tasks.push(task_view(host, id, level, number)?);
        }
        Ok(tasks)
    }

    pub fn get_task(&self, id: RecordId) -> AccessorResult<TaskView> {
        require(self.host_ref()?, EntityKind::Task, id)?;
        self.list_tasks()?
            .into_iter()
            .find(|task| task.id == id)
            .ok_or_else(|| AccessorError::not_found(EntityKind::Task, id))
    }

    pub fn find_task_by_name(&self, name: &str) -> AccessorResult<TaskView> {
        self.list_tasks()?
            .into_iter()
            .find(|task| task.name == name)
            .ok_or_else(|| AccessorError::not_found(EntityKind::Task, name))
    }

    pub fn find_task_id(&self, name: &str) -> AccessorResult<RecordId> {
        first_named(self.host_ref()?, EntityKind::Task, name)
    }

    /// Appends a task. Without a parent it lands at the end of the list at the
    /// top level; with one it is placed right after the parent's subtree and
    /// nested one level below the parent.
    ///
    /// The document is only changed in memory; call [`Self::save`] or
    /// [`Self::close`] to persist it.
    pub fn append_task(&mut self, task: NewTask) -> AccessorResult<RecordId> {
        if task.finish < task.start {
            return Err(AccessorError::InvalidDateRange {
                start: task.start,
                end: task.finish,
            });
        }
        let warehouse = fields::encode(
            EntityKind::Task,
            Attribute::Warehouse,
            FieldValue::text(&task.warehouse),
        )?;
        let manager = fields::encode(
            EntityKind::Task,
            Attribute::Manager,
            FieldValue::text(&task.manager),
        )?;

        let host = self.host_mut()?;
        let (position, target_level) = match task.parent {
            Some(parent) => {
                let ids = host.record_ids(EntityKind::Task)?;
                let idx = ids
                    .iter()
                    .position(|id| *id == parent)
                    .ok_or_else(|| AccessorError::not_found(EntityKind::Task, parent))?;
                let parent_level = host.outline_level(parent)?;
                let mut end = idx + 1;
                while end < ids.len() && host.outline_level(ids[end])? > parent_level {
                    end += 1;
                }
                (Some(end), parent_level + 1)
            }
            None => (None, 1),
        };

        let id = host.add_task(&task.name, position)?;
        host.set_field(EntityKind::Task, id, HostField::Start, FieldValue::Date(task.start))?;
        host.set_field(EntityKind::Task, id, HostField::Finish, FieldValue::Date(task.finish))?;
        for (slot, raw) in [warehouse, manager] {
            host.set_field(EntityKind::Task, id, slot, raw)?;
        }

        loop {
            let level = host.outline_level(id)?;
            if level < target_level {
                host.indent_task(id)?;
            } else if level > target_level {
                host.outdent_task(id)?;
            } else {
                break;
            }
        }

        debug!(
            task = id,
            name = %task.name,
            parent = ?task.parent,
            level = target_level,
            "appended task"
        );
        Ok(id)
    }

    /// Removes a task; the host drops its assignments.
    pub fn delete_task(&mut self, id: RecordId) -> AccessorResult<()> {
        let host = self.host_mut()?;
        require(host, EntityKind::Task, id)?;
        host.delete_record(EntityKind::Task, id)?;
        debug!(task = id, "deleted task");
        Ok(())
    }

    /// Writes one mapped attribute on an existing task.
    pub fn set_task_attribute(
        &mut self,
        id: RecordId,
        attribute: Attribute,
        value: FieldValue,
    ) -> AccessorResult<()> {
        let host = self.host_mut()?;
        require(host, EntityKind::Task, id)?;
        write_attribute(host, EntityKind::Task, id, attribute, value)
    }
}

fn task_view<H: ProjectHost>(
    host: &H,
    id: RecordId,
    outline_level: u32,
    outline_number: String,
) -> AccessorResult<TaskView> {
    let decoded = fields::decode(EntityKind::Task, &read_slots(host, EntityKind::Task, id)?);
    let mut resources = Vec::new();
    for assignment in host.assignments(EntityKind::Task, id)? {
        resources.push(read_name(host, EntityKind::Resource, assignment.resource_id)?);
    }
    Ok(TaskView {
        id,
        name: read_name(host, EntityKind::Task, id)?,
        outline_level,
        outline_number,
        start: host.field(EntityKind::Task, id, HostField::Start)?.as_date(),
        finish: host.field(EntityKind::Task, id, HostField::Finish)?.as_date(),
        warehouse: fields::decoded_text(&decoded, Attribute::Warehouse),
        manager: fields::decoded_text(&decoded, Attribute::Manager),
        resources,
    })
}
