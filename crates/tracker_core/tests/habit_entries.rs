use rusqlite::Connection;
use tracker_core::db::open_db_in_memory;
use tracker_core::{
    CoreError, EntryRepository, Habit, HabitService, HabitStatus, NewHabit, RepoError,
    SqliteEntryRepository, SqliteHabitRepository,
};
use uuid::Uuid;

type Service<'conn> = HabitService<SqliteHabitRepository<'conn>, SqliteEntryRepository<'conn>>;

fn service(conn: &Connection) -> Service<'_> {
    HabitService::new(
        SqliteHabitRepository::try_new(conn).unwrap(),
        SqliteEntryRepository::try_new(conn).unwrap(),
    )
}

fn create(service: &Service<'_>, name: &str, daily_target: Option<u32>) -> Habit {
    service
        .create_habit(NewHabit {
            name: name.to_string(),
            daily_target,
            ..NewHabit::default()
        })
        .unwrap()
}

#[test]
fn set_status_creates_then_overwrites_one_entry_per_day() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let habit = create(&service, "Meditate", None);

    let first = service
        .set_status(habit.uuid, "2025-03-10", HabitStatus::Complete, None)
        .unwrap();
    assert_eq!(first.status, HabitStatus::Complete);

    let second = service
        .set_status(habit.uuid, "2025-03-10", HabitStatus::Missed, None)
        .unwrap();
    assert_eq!(second.status, HabitStatus::Missed);

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM habit_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn repeated_upsert_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let habit = create(&service, "Pushups", Some(20));

    let first = service
        .set_status(habit.uuid, "2025-03-10", HabitStatus::Partial, Some(12))
        .unwrap();
    let second = service
        .set_status(habit.uuid, "2025-03-10", HabitStatus::Partial, Some(12))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second.count, Some(12));
}

#[test]
fn missing_count_keeps_stored_count_for_count_based_habits() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let habit = create(&service, "Pushups", Some(20));

    service
        .set_status(habit.uuid, "2025-03-10", HabitStatus::Partial, Some(12))
        .unwrap();
    let updated = service
        .set_status(habit.uuid, "2025-03-10", HabitStatus::Complete, None)
        .unwrap();

    assert_eq!(updated.status, HabitStatus::Complete);
    assert_eq!(updated.count, Some(12));
}

#[test]
fn counts_are_dropped_for_habits_without_daily_target() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let habit = create(&service, "Read", None);

    let entry = service
        .set_status(habit.uuid, "2025-03-10", HabitStatus::Complete, Some(3))
        .unwrap();
    assert_eq!(entry.count, None);
}

#[test]
fn invalid_input_is_rejected_before_any_write() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let habit = create(&service, "Pushups", Some(20));

    let err = service
        .set_status(habit.uuid, "2025-03-10", HabitStatus::Trending, None)
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidStatus(_)));

    let err = service
        .set_status(habit.uuid, "2025-03-10", HabitStatus::Partial, Some(-1))
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidCount(_)));
    assert_eq!(err.http_status(), 400);

    let err = service
        .set_status(habit.uuid, "2025-02-30", HabitStatus::Complete, None)
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidDate(_)));

    assert!(service.get_entry(habit.uuid, "2025-03-10").unwrap().is_none());
}

#[test]
fn set_status_on_unknown_or_deleted_habit_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .set_status(Uuid::new_v4(), "2025-03-10", HabitStatus::Complete, None)
        .unwrap_err();
    assert!(matches!(err, CoreError::HabitNotFound(_)));

    let habit = create(&service, "Walk", None);
    service.soft_delete_habit(habit.uuid).unwrap();
    let err = service
        .set_status(habit.uuid, "2025-03-10", HabitStatus::Complete, None)
        .unwrap_err();
    assert!(matches!(err, CoreError::HabitNotFound(id) if id == habit.uuid));
}

#[test]
fn cycle_entry_walks_the_full_cycle() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let habit = create(&service, "Stretch", None);

    let mut seen = Vec::new();
    for _ in 0..8 {
        seen.push(service.cycle_entry(habit.uuid, "2025-03-10").unwrap().status);
    }

    assert_eq!(
        seen,
        vec![
            HabitStatus::Complete,
            HabitStatus::Missed,
            HabitStatus::Partial,
            HabitStatus::Na,
            HabitStatus::Exempt,
            HabitStatus::Extra,
            HabitStatus::Pink,
            HabitStatus::Empty,
        ]
    );
}

#[test]
fn notes_survive_status_changes_and_blank_notes_clear() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let habit = create(&service, "Journal", None);

    let noted = service
        .set_notes(habit.uuid, "2025-03-10", Some("  evening  ".to_string()))
        .unwrap();
    assert_eq!(noted.status, HabitStatus::Empty);
    assert_eq!(noted.notes.as_deref(), Some("evening"));

    let updated = service
        .set_status(habit.uuid, "2025-03-10", HabitStatus::Complete, None)
        .unwrap();
    assert_eq!(updated.notes.as_deref(), Some("evening"));

    let cleared = service
        .set_notes(habit.uuid, "2025-03-10", Some("   ".to_string()))
        .unwrap();
    assert_eq!(cleared.notes, None);
    assert_eq!(cleared.status, HabitStatus::Complete);
}

#[test]
fn list_entries_is_inclusive_and_ordered_by_day() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let habit = create(&service, "Run", None);

    for day in ["2025-03-12", "2025-03-01", "2025-02-28", "2025-03-31"] {
        service
            .set_status(habit.uuid, day, HabitStatus::Complete, None)
            .unwrap();
    }

    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let days: Vec<String> = repo
        .list_entries(habit.uuid, "2025-03-01", "2025-03-31")
        .unwrap()
        .into_iter()
        .map(|entry| entry.day)
        .collect();
    assert_eq!(days, vec!["2025-03-01", "2025-03-12", "2025-03-31"]);
}

#[test]
fn repositories_reject_unmigrated_connections() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteEntryRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            actual_version, ..
        }) => assert_eq!(actual_version, 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unmigrated connection should be rejected"),
    }
}
