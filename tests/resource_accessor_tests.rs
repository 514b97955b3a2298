use chrono::NaiveDate;
use project_accessor::{
    AccessorError, Attribute, EntityKind, FieldValue, HostField, NewResource, NewTask,
    ProjectAccessor, ProjectDocument, ProjectHost, ResourceCategory,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn accessor() -> ProjectAccessor<ProjectDocument> {
    ProjectAccessor::new(ProjectDocument::new())
}

#[test]
fn resource_attributes_land_in_their_slots() {
    let mut acc = accessor();
    let id = acc
        .append_resource(
            NewResource::new("M1", "Maschera", "WH2")
                .with_pitch(1.5)
                .with_center_to_center(40.0)
                .with_model("MX-200")
                .with_max(8.0)
                .with_note("spare"),
        )
        .unwrap();

    let host = acc.host();
    assert_eq!(
        host.field(EntityKind::Resource, id, HostField::Text1).unwrap(),
        FieldValue::text("WH2")
    );
    assert_eq!(
        host.field(EntityKind::Resource, id, HostField::Text2).unwrap(),
        FieldValue::text("Maschera")
    );
    assert_eq!(
        host.field(EntityKind::Resource, id, HostField::Number1).unwrap(),
        FieldValue::Number(1.5)
    );
    assert_eq!(
        host.field(EntityKind::Resource, id, HostField::Number2).unwrap(),
        FieldValue::Number(40.0)
    );
    assert_eq!(
        host.field(EntityKind::Resource, id, HostField::Number3).unwrap(),
        FieldValue::Empty
    );

    let view = acc.get_resource(id).unwrap();
    assert_eq!(view.category, Some(ResourceCategory::Maschera));
    assert_eq!(view.model.as_deref(), Some("MX-200"));
    assert_eq!(view.max, Some(8.0));
    assert_eq!(view.notes.as_deref(), Some("spare"));
    assert_eq!(view.diameter, None);
}

#[test]
fn zero_values_are_stored() {
    let mut acc = accessor();
    let id = acc
        .append_resource(NewResource::new("T0", "Testa", "WH1").with_diameter(0.0))
        .unwrap();
    assert_eq!(acc.get_resource(id).unwrap().diameter, Some(0.0));
}

#[test]
fn invalid_category_is_rejected_before_creation() {
    let mut acc = accessor();
    let err = acc
        .append_resource(NewResource::new("X", "Invalid", "WH1"))
        .unwrap_err();
    assert!(matches!(err, AccessorError::InvalidCategory(ref c) if c == "Invalid"));
    assert!(acc.list_resources().unwrap().is_empty());
}

#[test]
fn category_match_is_case_sensitive() {
    let mut acc = accessor();
    let err = acc
        .append_resource(NewResource::new("X", "tastatore", "WH1"))
        .unwrap_err();
    assert!(matches!(err, AccessorError::InvalidCategory(_)));
}

#[test]
fn non_finite_number_is_an_invalid_value() {
    let mut acc = accessor();
    let err = acc
        .append_resource(NewResource::new("X", "Testa", "WH1").with_diameter(f64::NAN))
        .unwrap_err();
    assert!(matches!(
        err,
        AccessorError::InvalidValue {
            attribute: Attribute::Diameter,
            ..
        }
    ));
    assert!(acc.list_resources().unwrap().is_empty());
}

#[test]
fn assigning_twice_does_not_duplicate() {
    let mut acc = accessor();
    let t = acc
        .append_task(NewTask::new("T", d(2025, 1, 1), d(2025, 1, 5), "WH1", "Doe"))
        .unwrap();
    let r1 = acc
        .append_resource(NewResource::new("R1", "Tastatore", "WH1"))
        .unwrap();
    let r2 = acc
        .append_resource(NewResource::new("R2", "Mandrino", "WH1"))
        .unwrap();

    acc.assign_resources(t, &[r1]).unwrap();
    acc.assign_resources(t, &[r1, r2, r1]).unwrap();

    assert_eq!(
        acc.get_task(t).unwrap().resources,
        vec!["R1".to_string(), "R2".to_string()]
    );
    assert_eq!(acc.host().all_assignments().len(), 2);
}

#[test]
fn assignment_with_unknown_resource_changes_nothing() {
    let mut acc = accessor();
    let t = acc
        .append_task(NewTask::new("T", d(2025, 1, 1), d(2025, 1, 5), "WH1", "Doe"))
        .unwrap();
    let r1 = acc
        .append_resource(NewResource::new("R1", "Tastatore", "WH1"))
        .unwrap();

    let err = acc.assign_resources(t, &[r1, 99]).unwrap_err();
    assert!(err.is_not_found());
    assert!(acc.get_task(t).unwrap().resources.is_empty());

    assert!(acc.assign_resources(42, &[r1]).unwrap_err().is_not_found());
}

#[test]
fn deleting_a_resource_removes_it_from_tasks() {
    let mut acc = accessor();
    let t = acc
        .append_task(NewTask::new("T", d(2025, 1, 1), d(2025, 1, 5), "WH1", "Doe"))
        .unwrap();
    let r1 = acc
        .append_resource(NewResource::new("R1", "Tastatore", "WH1"))
        .unwrap();
    acc.assign_resources(t, &[r1]).unwrap();

    acc.delete_resource(r1).unwrap();

    assert!(acc.get_resource(r1).unwrap_err().is_not_found());
    assert!(acc.get_task(t).unwrap().resources.is_empty());
    assert!(acc.delete_resource(r1).unwrap_err().is_not_found());
}

#[test]
fn duplicate_resource_names_resolve_to_the_first() {
    let mut acc = accessor();
    let first = acc
        .append_resource(NewResource::new("Dup", "Testa", "WH1"))
        .unwrap();
    acc.append_resource(NewResource::new("Dup", "Testa", "WH2"))
        .unwrap();
    assert_eq!(acc.find_resource_id("Dup").unwrap(), first);
    assert_eq!(
        acc.find_resource_by_name("Dup").unwrap().warehouse.as_deref(),
        Some("WH1")
    );
    assert!(acc.find_resource_by_name("Nope").unwrap_err().is_not_found());
}

#[test]
fn resource_attribute_update_checks_value_shape() {
    let mut acc = accessor();
    let id = acc
        .append_resource(NewResource::new("R", "Generatore", "WH1"))
        .unwrap();

    acc.set_resource_attribute(id, Attribute::Diameter, FieldValue::Number(22.0))
        .unwrap();
    assert_eq!(acc.get_resource(id).unwrap().diameter, Some(22.0));

    let err = acc
        .set_resource_attribute(id, Attribute::Diameter, FieldValue::text("wide"))
        .unwrap_err();
    assert!(matches!(err, AccessorError::InvalidValue { .. }));

    let err = acc
        .set_resource_attribute(id, Attribute::Category, FieldValue::text("Nope"))
        .unwrap_err();
    assert!(matches!(err, AccessorError::InvalidCategory(_)));
}

#[test]
fn unrecognized_stored_category_reads_as_none() {
    let mut doc = ProjectDocument::new();
    let id = doc.add_resource("Legacy").unwrap();
    doc.set_field(
        EntityKind::Resource,
        id,
        HostField::Text2,
        FieldValue::text("Sconosciuto"),
    )
    .unwrap();

    let acc = ProjectAccessor::new(doc);
    let view = acc.get_resource(id).unwrap();
    assert_eq!(view.name, "Legacy");
    assert_eq!(view.category, None);
}
