use std::collections::HashSet;

use tracing::debug;

use super::{ProjectAccessor, first_named, read_name, read_slots, require, write_attribute};
use crate::error::AccessorResult;
use crate::fields::{self, Attribute};
use crate::host::{EntityKind, FieldValue, ProjectHost, RecordId};
use crate::resource::{NewResource, ResourceCategory, ResourceView};

impl<H: ProjectHost> ProjectAccessor<H> {
    /// All resources in the host's native order.
    pub fn list_resources(&self) -> AccessorResult<Vec<ResourceView>> {
        let host = self.host_ref()?;
        host.record_ids(EntityKind::Resource)?
            .into_iter()
            .map(|id| resource_view(host, id))
            .collect()
    }

    pub fn get_resource(&self, id: RecordId) -> AccessorResult<ResourceView> {
        let host = self.host_ref()?;
        require(host, EntityKind::Resource, id)?;
        resource_view(host, id)
    }

    pub fn find_resource_by_name(&self, name: &str) -> AccessorResult<ResourceView> {
        let host = self.host_ref()?;
        let id = first_named(host, EntityKind::Resource, name)?;
        resource_view(host, id)
    }

    pub fn find_resource_id(&self, name: &str) -> AccessorResult<RecordId> {
        first_named(self.host_ref()?, EntityKind::Resource, name)
    }

    /// Appends a resource. Optional values left as `None` leave their slot
    /// empty; a zero is stored as zero.
    pub fn append_resource(&mut self, resource: NewResource) -> AccessorResult<RecordId> {
        let category: ResourceCategory = resource.category.parse()?;
        let values = [
            (Attribute::Warehouse, FieldValue::text(&resource.warehouse)),
            (Attribute::Category, FieldValue::text(category.as_str())),
            (Attribute::Model, FieldValue::from(resource.model.clone())),
            (Attribute::Pitch, FieldValue::from(resource.pitch)),
            (Attribute::CenterToCenter, FieldValue::from(resource.center_to_center)),
            (Attribute::Diameter, FieldValue::from(resource.diameter)),
            (Attribute::Max, FieldValue::from(resource.max)),
            (Attribute::Note, FieldValue::from(resource.note.clone())),
        ];
        let encoded = values
            .into_iter()
            .map(|(attribute, value)| fields::encode(EntityKind::Resource, attribute, value))
            .collect::<AccessorResult<Vec<_>>>()?;

        let host = self.host_mut()?;
        let id = host.add_resource(&resource.name)?;
        for (slot, raw) in encoded {
            if !raw.is_empty() {
                host.set_field(EntityKind::Resource, id, slot, raw)?;
            }
        }
        debug!(resource = id, name = %resource.name, %category, "appended resource");
        Ok(id)
    }

    /// Removes a resource; the host drops its assignments.
    pub fn delete_resource(&mut self, id: RecordId) -> AccessorResult<()> {
        let host = self.host_mut()?;
        require(host, EntityKind::Resource, id)?;
        host.delete_record(EntityKind::Resource, id)?;
        debug!(resource = id, "deleted resource");
        Ok(())
    }

    /// Assigns each resource to `task`. Resources already assigned to the task
    /// are skipped, so repeated calls never duplicate an assignment. Every id is
    /// resolved before anything is assigned.
    pub fn assign_resources(
        &mut self,
        task: RecordId,
        resources: &[RecordId],
    ) -> AccessorResult<()> {
        let host = self.host_mut()?;
        require(host, EntityKind::Task, task)?;
        for resource in resources {
            require(host, EntityKind::Resource, *resource)?;
        }

        let mut assigned: HashSet<RecordId> = host
            .assignments(EntityKind::Task, task)?
            .into_iter()
            .map(|a| a.resource_id)
            .collect();
        for resource in resources {
            if assigned.insert(*resource) {
                host.add_assignment(task, *resource)?;
                debug!(task, resource, "assigned resource");
            }
        }
        Ok(())
    }

    /// Writes one mapped attribute on an existing resource.
    pub fn set_resource_attribute(
        &mut self,
        id: RecordId,
        attribute: Attribute,
        value: FieldValue,
    ) -> AccessorResult<()> {
        let host = self.host_mut()?;
        require(host, EntityKind::Resource, id)?;
        write_attribute(host, EntityKind::Resource, id, attribute, value)
    }
}

fn resource_view<H: ProjectHost>(host: &H, id: RecordId) -> AccessorResult<ResourceView> {
    let record = read_slots(host, EntityKind::Resource, id)?;
    let decoded = fields::decode(EntityKind::Resource, &record);
    let name = read_name(host, EntityKind::Resource, id)?;
    Ok(ResourceView::from_fields(id, name, &decoded))
}
