use rusqlite::Connection;
use tracker_core::db::open_db_in_memory;
use tracker_core::{
    Habit, HabitService, HabitStatus, NewHabit, SqliteEntryRepository, SqliteHabitRepository,
    TrendVerdict,
};

type Service<'conn> = HabitService<SqliteHabitRepository<'conn>, SqliteEntryRepository<'conn>>;

fn service(conn: &Connection) -> Service<'_> {
    HabitService::new(
        SqliteHabitRepository::try_new(conn).unwrap(),
        SqliteEntryRepository::try_new(conn).unwrap(),
    )
}

fn create(service: &Service<'_>, request: NewHabit) -> Habit {
    service.create_habit(request).unwrap()
}

fn named(name: &str) -> NewHabit {
    NewHabit {
        name: name.to_string(),
        ..NewHabit::default()
    }
}

#[test]
fn trend_counts_complete_and_extra_in_current_month_only() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let habit = create(
        &service,
        NewHabit {
            monthly_target: Some(10),
            ..named("Gym")
        },
    );

    for (day, status) in [
        ("2025-03-01", HabitStatus::Complete),
        ("2025-03-02", HabitStatus::Extra),
        ("2025-03-03", HabitStatus::Missed),
        ("2025-03-04", HabitStatus::Complete),
        ("2025-02-27", HabitStatus::Complete),
        ("2025-03-20", HabitStatus::Complete),
    ] {
        service.set_status(habit.uuid, day, status, None).unwrap();
    }

    let report = service.evaluate_trend(habit.uuid, "2025-03-10").unwrap();
    assert_eq!(report.completed_count, 3);
    assert_eq!(report.elapsed_days, 10);
    assert_eq!(report.period_days, 31);
    assert_eq!(report.remaining_days, 21);
    // 3 / (10/31) = 9.3 < 10
    assert!(!report.on_pace);
    assert_eq!(report.verdict, TrendVerdict::Trending);
    assert!((report.expected_count - 10.0 * 10.0 / 31.0).abs() < 1e-9);
}

#[test]
fn habit_without_monthly_target_is_always_on_pace() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let habit = create(&service, named("Read"));

    let report = service.evaluate_trend(habit.uuid, "2025-03-31").unwrap();
    assert!(report.on_pace);
    assert_eq!(report.verdict, TrendVerdict::OnPace);
}

#[test]
fn off_pace_on_last_day_is_a_hard_miss() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let habit = create(
        &service,
        NewHabit {
            monthly_target: Some(20),
            ..named("Swim")
        },
    );
    service
        .set_status(habit.uuid, "2025-04-02", HabitStatus::Complete, None)
        .unwrap();

    let report = service.evaluate_trend(habit.uuid, "2025-04-30").unwrap();
    assert_eq!(report.remaining_days, 0);
    assert_eq!(report.verdict, TrendVerdict::Missed);
    assert!(!report.is_trending());
}

#[test]
fn daily_view_orders_pending_by_priority_then_sort_order() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let done = create(
        &service,
        NewHabit {
            priority: Some(1),
            ..named("Done early")
        },
    );
    let unprioritized = create(&service, named("Someday"));
    let low = create(
        &service,
        NewHabit {
            priority: Some(5),
            ..named("Low")
        },
    );
    let high = create(
        &service,
        NewHabit {
            priority: Some(1),
            ..named("High")
        },
    );
    service
        .set_status(done.uuid, "2025-03-10", HabitStatus::Complete, None)
        .unwrap();
    service
        .set_status(low.uuid, "2025-03-10", HabitStatus::Partial, None)
        .unwrap();

    let order: Vec<_> = service
        .daily_view("2025-03-10")
        .unwrap()
        .into_iter()
        .map(|row| row.habit.uuid)
        .collect();
    assert_eq!(order, vec![high.uuid, low.uuid, unprioritized.uuid, done.uuid]);
}

#[test]
fn empty_off_pace_cell_displays_as_trending() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let behind = create(
        &service,
        NewHabit {
            monthly_target: Some(30),
            ..named("Daily walk")
        },
    );
    let relaxed = create(&service, named("Stretch"));

    let rows = service.daily_view("2025-03-10").unwrap();
    let behind_row = rows.iter().find(|row| row.habit.uuid == behind.uuid).unwrap();
    let relaxed_row = rows.iter().find(|row| row.habit.uuid == relaxed.uuid).unwrap();

    assert_eq!(behind_row.display_status, HabitStatus::Trending);
    assert!(behind_row.entry.is_none());
    assert_eq!(relaxed_row.display_status, HabitStatus::Empty);

    // A recorded status replaces the overlay.
    service
        .set_status(behind.uuid, "2025-03-10", HabitStatus::Missed, None)
        .unwrap();
    let rows = service.daily_view("2025-03-10").unwrap();
    let behind_row = rows.iter().find(|row| row.habit.uuid == behind.uuid).unwrap();
    assert_eq!(behind_row.display_status, HabitStatus::Missed);
}
