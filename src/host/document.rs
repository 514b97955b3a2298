use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{
    Assignment, EntityKind, FieldValue, HostError, HostField, HostResult, ProjectHost, RecordId,
};

pub type RecordFields = BTreeMap<HostField, FieldValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: RecordId,
    pub outline_level: u32,
    #[serde(default)]
    pub fields: RecordFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRow {
    pub id: RecordId,
    #[serde(default)]
    pub fields: RecordFields,
}

/// In-memory project document.
///
/// Task rows are kept in outline order and carry their own outline level; a
/// row's subtree is the run of following rows with a deeper level. Ids come
/// from per-collection counters and are never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub(crate) next_task_id: RecordId,
    pub(crate) next_resource_id: RecordId,
    #[serde(default)]
    pub(crate) tasks: Vec<TaskRow>,
    #[serde(default)]
    pub(crate) resources: Vec<ResourceRow>,
    #[serde(default)]
    pub(crate) assignments: Vec<Assignment>,
    #[serde(skip)]
    closed: bool,
}

impl Default for ProjectDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectDocument {
    pub fn new() -> Self {
        Self {
            next_task_id: 1,
            next_resource_id: 1,
            tasks: Vec::new(),
            resources: Vec::new(),
            assignments: Vec::new(),
            closed: false,
        }
    }

    pub fn tasks(&self) -> &[TaskRow] {
        &self.tasks
    }

    pub fn resources(&self) -> &[ResourceRow] {
        &self.resources
    }

    pub fn all_assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Makes a previously closed document usable again (after a reload).
    pub(crate) fn reopen(&mut self) {
        self.closed = false;
    }

    fn ensure_open(&self) -> HostResult<()> {
        if self.closed {
            Err(HostError::Closed)
        } else {
            Ok(())
        }
    }

    fn task_index(&self, id: RecordId) -> HostResult<usize> {
        self.tasks
            .iter()
            .position(|row| row.id == id)
            .ok_or(HostError::RecordNotFound {
                kind: EntityKind::Task,
                id,
            })
    }

    fn resource_index(&self, id: RecordId) -> HostResult<usize> {
        self.resources
            .iter()
            .position(|row| row.id == id)
            .ok_or(HostError::RecordNotFound {
                kind: EntityKind::Resource,
                id,
            })
    }

    /// Exclusive end index of the subtree rooted at `idx`.
    fn subtree_end(&self, idx: usize) -> usize {
        let level = self.tasks[idx].outline_level;
        let mut end = idx + 1;
        while end < self.tasks.len() && self.tasks[end].outline_level > level {
            end += 1;
        }
        end
    }

    fn fields(&self, kind: EntityKind, id: RecordId) -> HostResult<&RecordFields> {
        match kind {
            EntityKind::Task => Ok(&self.tasks[self.task_index(id)?].fields),
            EntityKind::Resource => Ok(&self.resources[self.resource_index(id)?].fields),
        }
    }

    fn fields_mut(&mut self, kind: EntityKind, id: RecordId) -> HostResult<&mut RecordFields> {
        match kind {
            EntityKind::Task => {
                let idx = self.task_index(id)?;
                Ok(&mut self.tasks[idx].fields)
            }
            EntityKind::Resource => {
                let idx = self.resource_index(id)?;
                Ok(&mut self.resources[idx].fields)
            }
        }
    }

    fn name_fields(name: &str) -> RecordFields {
        let mut fields = RecordFields::new();
        fields.insert(HostField::Name, FieldValue::text(name));
        fields
    }
}

impl ProjectHost for ProjectDocument {
    fn record_ids(&self, kind: EntityKind) -> HostResult<Vec<RecordId>> {
        self.ensure_open()?;
        Ok(match kind {
            EntityKind::Task => self.tasks.iter().map(|row| row.id).collect(),
            EntityKind::Resource => self.resources.iter().map(|row| row.id).collect(),
        })
    }

    fn contains(&self, kind: EntityKind, id: RecordId) -> HostResult<bool> {
        self.ensure_open()?;
        Ok(match kind {
            EntityKind::Task => self.tasks.iter().any(|row| row.id == id),
            EntityKind::Resource => self.resources.iter().any(|row| row.id == id),
        })
    }

    fn add_task(&mut self, name: &str, position: Option<usize>) -> HostResult<RecordId> {
        self.ensure_open()?;
        let position = position.unwrap_or(self.tasks.len());
        if position > self.tasks.len() {
            return Err(HostError::Outline(format!(
                "position {position} is past the end of the task list ({} rows)",
                self.tasks.len()
            )));
        }
        let outline_level = if position == 0 {
            1
        } else {
            self.tasks[position - 1].outline_level
        };
        let id = self.next_task_id;
        self.next_task_id += 1;
        self.tasks.insert(
            position,
            TaskRow {
                id,
                outline_level,
                fields: Self::name_fields(name),
            },
        );
        Ok(id)
    }

    fn add_resource(&mut self, name: &str) -> HostResult<RecordId> {
        self.ensure_open()?;
        let id = self.next_resource_id;
        self.next_resource_id += 1;
        self.resources.push(ResourceRow {
            id,
            fields: Self::name_fields(name),
        });
        Ok(id)
    }

    fn delete_record(&mut self, kind: EntityKind, id: RecordId) -> HostResult<()> {
        self.ensure_open()?;
        match kind {
            EntityKind::Task => {
                // Deleting a summary task takes its subtasks with it.
                let idx = self.task_index(id)?;
                let end = self.subtree_end(idx);
                let removed: Vec<RecordId> = self.tasks.drain(idx..end).map(|row| row.id).collect();
                self.assignments.retain(|a| !removed.contains(&a.task_id));
            }
            EntityKind::Resource => {
                let idx = self.resource_index(id)?;
                self.resources.remove(idx);
                self.assignments.retain(|a| a.resource_id != id);
            }
        }
        Ok(())
    }

    fn field(&self, kind: EntityKind, id: RecordId, field: HostField) -> HostResult<FieldValue> {
        self.ensure_open()?;
        Ok(self
            .fields(kind, id)?
            .get(&field)
            .cloned()
            .unwrap_or_default())
    }

    fn set_field(
        &mut self,
        kind: EntityKind,
        id: RecordId,
        field: HostField,
        value: FieldValue,
    ) -> HostResult<()> {
        self.ensure_open()?;
        if !field.accepts(&value) {
            return Err(HostError::FieldType {
                field,
                expected: field.expected_type(),
            });
        }
        let fields = self.fields_mut(kind, id)?;
        if value.is_empty() {
            fields.remove(&field);
        } else {
            fields.insert(field, value);
        }
        Ok(())
    }

    fn outline_level(&self, task: RecordId) -> HostResult<u32> {
        self.ensure_open()?;
        Ok(self.tasks[self.task_index(task)?].outline_level)
    }

    fn indent_task(&mut self, task: RecordId) -> HostResult<()> {
        self.ensure_open()?;
        let idx = self.task_index(task)?;
        if idx == 0 {
            return Err(HostError::Outline(format!(
                "task {task} is the first row and cannot be indented"
            )));
        }
        let level = self.tasks[idx].outline_level;
        if level > self.tasks[idx - 1].outline_level {
            return Err(HostError::Outline(format!(
                "task {task} is already nested below the row above it"
            )));
        }
        let end = self.subtree_end(idx);
        for row in &mut self.tasks[idx..end] {
            row.outline_level += 1;
        }
        Ok(())
    }

    fn outdent_task(&mut self, task: RecordId) -> HostResult<()> {
        self.ensure_open()?;
        let idx = self.task_index(task)?;
        if self.tasks[idx].outline_level <= 1 {
            return Err(HostError::Outline(format!(
                "task {task} is already at the top level"
            )));
        }
        let end = self.subtree_end(idx);
        for row in &mut self.tasks[idx..end] {
            row.outline_level -= 1;
        }
        Ok(())
    }

    fn assignments(&self, kind: EntityKind, id: RecordId) -> HostResult<Vec<Assignment>> {
        self.ensure_open()?;
        if !self.contains(kind, id)? {
            return Err(HostError::RecordNotFound { kind, id });
        }
        Ok(self
            .assignments
            .iter()
            .filter(|a| match kind {
                EntityKind::Task => a.task_id == id,
                EntityKind::Resource => a.resource_id == id,
            })
            .copied()
            .collect())
    }

    fn add_assignment(&mut self, task: RecordId, resource: RecordId) -> HostResult<()> {
        self.ensure_open()?;
        self.task_index(task)?;
        self.resource_index(resource)?;
        self.assignments.push(Assignment {
            task_id: task,
            resource_id: resource,
        });
        Ok(())
    }

    fn save(&mut self) -> HostResult<()> {
        self.ensure_open()
    }

    fn close(&mut self) -> HostResult<()> {
        self.ensure_open()?;
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(doc: &ProjectDocument) -> Vec<(RecordId, u32)> {
        doc.tasks().iter().map(|r| (r.id, r.outline_level)).collect()
    }

    #[test]
    fn ids_are_never_reused_after_delete() {
        let mut doc = ProjectDocument::new();
        let a = doc.add_task("A", None).unwrap();
        doc.delete_record(EntityKind::Task, a).unwrap();
        let b = doc.add_task("B", None).unwrap();
        assert_ne!(a, b);

        let r1 = doc.add_resource("R1").unwrap();
        doc.delete_record(EntityKind::Resource, r1).unwrap();
        let r2 = doc.add_resource("R2").unwrap();
        assert_ne!(r1, r2);
    }

    #[test]
    fn new_row_inherits_level_of_row_above() {
        let mut doc = ProjectDocument::new();
        let a = doc.add_task("A", None).unwrap();
        let b = doc.add_task("B", None).unwrap();
        doc.indent_task(b).unwrap();
        let c = doc.add_task("C", None).unwrap();
        assert_eq!(levels(&doc), vec![(a, 1), (b, 2), (c, 2)]);
    }

    #[test]
    fn indent_refuses_to_skip_levels() {
        let mut doc = ProjectDocument::new();
        let a = doc.add_task("A", None).unwrap();
        let b = doc.add_task("B", None).unwrap();
        assert!(matches!(doc.indent_task(a), Err(HostError::Outline(_))));
        doc.indent_task(b).unwrap();
        assert!(matches!(doc.indent_task(b), Err(HostError::Outline(_))));
        doc.outdent_task(b).unwrap();
        assert!(matches!(doc.outdent_task(b), Err(HostError::Outline(_))));
    }

    #[test]
    fn indent_and_outdent_move_the_subtree() {
        let mut doc = ProjectDocument::new();
        let a = doc.add_task("A", None).unwrap();
        let b = doc.add_task("B", None).unwrap();
        let c = doc.add_task("C", None).unwrap();
        doc.indent_task(c).unwrap();
        doc.indent_task(b).unwrap();
        assert_eq!(levels(&doc), vec![(a, 1), (b, 2), (c, 3)]);
        doc.outdent_task(b).unwrap();
        assert_eq!(levels(&doc), vec![(a, 1), (b, 1), (c, 2)]);
    }

    #[test]
    fn deleting_summary_task_removes_subtasks_and_their_assignments() {
        let mut doc = ProjectDocument::new();
        let a = doc.add_task("A", None).unwrap();
        let b = doc.add_task("B", None).unwrap();
        doc.indent_task(b).unwrap();
        let c = doc.add_task("C", None).unwrap();
        doc.outdent_task(c).unwrap();
        let r = doc.add_resource("R").unwrap();
        doc.add_assignment(b, r).unwrap();
        doc.add_assignment(c, r).unwrap();

        doc.delete_record(EntityKind::Task, a).unwrap();

        assert_eq!(doc.record_ids(EntityKind::Task).unwrap(), vec![c]);
        assert_eq!(
            doc.assignments(EntityKind::Resource, r).unwrap(),
            vec![Assignment {
                task_id: c,
                resource_id: r
            }]
        );
    }

    #[test]
    fn set_field_rejects_mismatched_values() {
        let mut doc = ProjectDocument::new();
        let r = doc.add_resource("R").unwrap();
        let err = doc
            .set_field(EntityKind::Resource, r, HostField::Number1, FieldValue::text("x"))
            .unwrap_err();
        assert!(matches!(err, HostError::FieldType { field: HostField::Number1, .. }));

        doc.set_field(EntityKind::Resource, r, HostField::Number1, FieldValue::Number(2.0))
            .unwrap();
        doc.set_field(EntityKind::Resource, r, HostField::Number1, FieldValue::Empty)
            .unwrap();
        assert_eq!(
            doc.field(EntityKind::Resource, r, HostField::Number1).unwrap(),
            FieldValue::Empty
        );
    }

    #[test]
    fn closed_document_rejects_every_call() {
        let mut doc = ProjectDocument::new();
        doc.add_task("A", None).unwrap();
        doc.close().unwrap();
        assert!(matches!(doc.record_ids(EntityKind::Task), Err(HostError::Closed)));
        assert!(matches!(doc.add_resource("R"), Err(HostError::Closed)));
        assert!(matches!(doc.save(), Err(HostError::Closed)));
    }
}
