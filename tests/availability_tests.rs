use chrono::NaiveDate;
use project_accessor::{
    AccessorError, NewResource, NewTask, ProjectAccessor, ProjectDocument, RecordId,
    ResourceCategory, ResourceQuery,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn accessor() -> ProjectAccessor<ProjectDocument> {
    ProjectAccessor::new(ProjectDocument::new())
}

fn busy_task(
    acc: &mut ProjectAccessor<ProjectDocument>,
    start: NaiveDate,
    finish: NaiveDate,
    resources: &[RecordId],
) -> RecordId {
    let id = acc
        .append_task(NewTask::new("Job", start, finish, "WH1", "Doe"))
        .unwrap();
    acc.assign_resources(id, resources).unwrap();
    id
}

#[test]
fn resource_becomes_busy_once_assigned_to_an_overlapping_task() {
    let mut acc = accessor();
    let r1 = acc
        .append_resource(NewResource::new("R1", "Tastatore", "WH2").with_diameter(12.5))
        .unwrap();
    assert!(acc.check_availability(r1, d(2025, 3, 1), d(2025, 3, 10)).unwrap());

    busy_task(&mut acc, d(2025, 3, 1), d(2025, 3, 10), &[r1]);

    assert!(!acc.check_availability(r1, d(2025, 3, 1), d(2025, 3, 10)).unwrap());
    assert!(acc.check_availability(r1, d(2025, 3, 11), d(2025, 3, 20)).unwrap());
}

#[test]
fn touching_intervals_count_as_overlapping() {
    let mut acc = accessor();
    let r = acc
        .append_resource(NewResource::new("R", "Testa", "WH1"))
        .unwrap();
    busy_task(&mut acc, d(2025, 3, 10), d(2025, 3, 20), &[r]);

    assert!(!acc.check_availability(r, d(2025, 3, 1), d(2025, 3, 10)).unwrap());
    assert!(!acc.check_availability(r, d(2025, 3, 20), d(2025, 3, 25)).unwrap());
    assert!(acc.check_availability(r, d(2025, 3, 1), d(2025, 3, 9)).unwrap());
    assert!(acc.check_availability(r, d(2025, 3, 21), d(2025, 3, 25)).unwrap());
}

#[test]
fn availability_rejects_reversed_range_and_unknown_resource() {
    let mut acc = accessor();
    let r = acc
        .append_resource(NewResource::new("R", "Testa", "WH1"))
        .unwrap();
    assert!(matches!(
        acc.check_availability(r, d(2025, 3, 10), d(2025, 3, 1)),
        Err(AccessorError::InvalidDateRange { .. })
    ));
    assert!(
        acc.check_availability(99, d(2025, 3, 1), d(2025, 3, 10))
            .unwrap_err()
            .is_not_found()
    );
}

#[test]
fn query_with_only_one_window_bound_is_missing_pair() {
    let acc = accessor();
    let only_start = ResourceQuery {
        start: Some(d(2025, 1, 1)),
        ..ResourceQuery::default()
    };
    assert!(matches!(
        acc.query(&only_start),
        Err(AccessorError::MissingPair {
            given: "start",
            missing: "end"
        })
    ));

    let only_end = ResourceQuery {
        end: Some(d(2025, 1, 1)),
        ..ResourceQuery::default()
    };
    assert!(matches!(
        acc.query(&only_end),
        Err(AccessorError::MissingPair { given: "end", .. })
    ));
}

#[test]
fn empty_query_returns_every_resource_in_order() {
    let mut acc = accessor();
    for name in ["C", "A", "B"] {
        acc.append_resource(NewResource::new(name, "Testa", "WH1"))
            .unwrap();
    }
    let names: Vec<String> = acc
        .query(&ResourceQuery::new())
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["C", "A", "B"]);
}

#[test]
fn diameter_range_is_inclusive_and_skips_unset_diameters() {
    let mut acc = accessor();
    let cases = [
        ("D5", Some(5.0)),
        ("D10", Some(10.0)),
        ("D15", Some(15.0)),
        ("D20", Some(20.0)),
        ("D25", Some(25.0)),
        ("None", None),
    ];
    for (name, diameter) in cases {
        let mut resource = NewResource::new(name, "Mandrino", "WH1");
        resource.diameter = diameter;
        acc.append_resource(resource).unwrap();
    }

    let query = ResourceQuery::new().diameter_between(Some(10.0), Some(20.0));
    let names: Vec<String> = acc
        .query(&query)
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["D10", "D15", "D20"]);

    let at_least = ResourceQuery::new().diameter_between(Some(20.0), None);
    let names: Vec<String> = acc
        .query(&at_least)
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["D20", "D25"]);
}

#[test]
fn filters_combine_with_availability() {
    let mut acc = accessor();
    let probe_wh1 = acc
        .append_resource(NewResource::new("P1", "Tastatore", "WH1").with_model("X1"))
        .unwrap();
    let probe_wh1_busy = acc
        .append_resource(NewResource::new("P2", "Tastatore", "WH1").with_model("X1"))
        .unwrap();
    acc.append_resource(NewResource::new("P3", "Tastatore", "WH2").with_model("X1"))
        .unwrap();
    acc.append_resource(NewResource::new("M1", "Maschera", "WH1").with_pitch(1.5))
        .unwrap();
    busy_task(&mut acc, d(2025, 5, 1), d(2025, 5, 31), &[probe_wh1_busy]);

    let query = ResourceQuery::new()
        .category(ResourceCategory::Tastatore)
        .warehouse("WH1")
        .model("X1")
        .available_between(d(2025, 5, 10), d(2025, 5, 12));
    let ids: Vec<RecordId> = acc.query(&query).unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![probe_wh1]);

    let masks = ResourceQuery::new().pitch(1.5);
    let names: Vec<String> = acc
        .query(&masks)
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["M1"]);
}

#[test]
fn reversed_query_window_is_invalid() {
    let acc = accessor();
    let query = ResourceQuery::new().available_between(d(2025, 2, 1), d(2025, 1, 1));
    assert!(matches!(
        acc.query(&query),
        Err(AccessorError::InvalidDateRange { .. })
    ));
}
