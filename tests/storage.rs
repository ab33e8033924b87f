#![forbid(unsafe_code)]
use chrono::{TimeZone, Utc};
use corvees::{
    generate_schedule, Engine, JsonStorage, Person, PersonId, Roster, ScheduleId,
    ScheduleRequest, Storage, StorageError, WorkloadCounters,
};
use tempfile::tempdir;

fn roster() -> Roster {
    Roster::new(
        (0..6)
            .map(|i| Person::new(format!("M{i}")).with_id(format!("m{i}")))
            .collect(),
    )
}

#[test]
fn empty_directory_reads_as_defaults() {
    let dir = tempdir().unwrap();
    let store = JsonStorage::open(dir.path()).unwrap();
    assert!(store.load_roster().unwrap().people.is_empty());
    assert!(store.load_schedules().unwrap().is_empty());
    let counters = store.load_counters().unwrap();
    assert_eq!(counters.version, 0);
    assert!(counters.value.is_empty());
}

#[test]
fn roster_and_schedules_persist() {
    let dir = tempdir().unwrap();
    let store = JsonStorage::open(dir.path()).unwrap();
    let roster = roster();
    store.save_roster(&roster).unwrap();
    assert_eq!(store.load_roster().unwrap(), roster);

    let engine = Engine::default();
    let early = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let late = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    let first = generate_schedule(
        &engine,
        &roster,
        &ScheduleRequest::new(2, 2026, 3, 2026),
        &WorkloadCounters::new(),
        early,
    )
    .unwrap()
    .schedule;
    let second = generate_schedule(
        &engine,
        &roster,
        &ScheduleRequest::new(4, 2026, 5, 2026),
        &WorkloadCounters::new(),
        late,
    )
    .unwrap()
    .schedule;
    store.save_schedule(&first).unwrap();
    store.save_schedule(&second).unwrap();

    let listed = store.load_schedules().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0], second, "newest first");
    assert_eq!(store.find_schedule(&first.id).unwrap(), first);

    store.delete_schedule(&first.id).unwrap();
    assert_eq!(store.load_schedules().unwrap(), vec![second]);
    assert!(matches!(
        store.delete_schedule(&first.id),
        Err(StorageError::UnknownSchedule(_))
    ));
    assert!(matches!(
        store.find_schedule(&ScheduleId::new("nope")),
        Err(StorageError::UnknownSchedule(_))
    ));
}

#[test]
fn counters_use_optimistic_versioning() {
    let dir = tempdir().unwrap();
    let store = JsonStorage::open(dir.path()).unwrap();

    let seen = store.load_counters().unwrap();
    let mut counters = seen.value.clone();
    counters.set(PersonId::new("m0"), 4);
    assert_eq!(store.save_counters(seen.version, &counters).unwrap(), 1);

    // une deuxième génération partie de la même lecture perd la course
    let err = store.save_counters(seen.version, &WorkloadCounters::new());
    assert!(matches!(
        err,
        Err(StorageError::VersionConflict {
            expected: 0,
            found: 1
        })
    ));

    let reread = store.load_counters().unwrap();
    assert_eq!(reread.version, 1);
    assert_eq!(reread.value.get(&PersonId::new("m0")), 4);
}

#[test]
fn tally_rebuilds_counts_from_a_schedule() {
    let roster = roster();
    let out = generate_schedule(
        &Engine::default(),
        &roster,
        &ScheduleRequest::new(2, 2026, 3, 2026),
        &WorkloadCounters::new(),
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    )
    .unwrap();

    let mut recounted = WorkloadCounters::new();
    let counted = recounted.tally(&roster, &out.schedule);
    assert_eq!(counted, 8 * 5);
    assert_eq!(recounted, out.counters);
}

#[test]
fn corrupt_document_is_a_parse_error() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("roster.json"), "{ not json").unwrap();
    let store = JsonStorage::open(dir.path()).unwrap();
    assert!(matches!(
        store.load_roster(),
        Err(StorageError::Parse { .. })
    ));
}
