use chrono::Weekday;
use tracker_core::db::open_db_in_memory;
use tracker_core::{
    BoundaryHour, CoreError, RepoError, Settings, SettingsRepository, SqliteSettingsRepository,
};

#[test]
fn fresh_database_loads_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();

    let settings = repo.load_settings().unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.day_boundary_hour.hour(), 6);
    assert_eq!(settings.week_start, Weekday::Mon);
}

#[test]
fn saved_settings_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();

    let settings = Settings {
        day_boundary_hour: BoundaryHour::new(4).unwrap(),
        week_start: Weekday::Sun,
    };
    repo.save_settings(&settings).unwrap();

    assert_eq!(repo.load_settings().unwrap(), settings);
    let stored: String = conn
        .query_row(
            "SELECT value FROM settings WHERE key = 'week_start';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, "sunday");
}

#[test]
fn missing_keys_fall_back_to_defaults() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("DELETE FROM settings;", []).unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();

    assert_eq!(repo.load_settings().unwrap(), Settings::default());
}

#[test]
fn malformed_stored_values_are_reported() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "UPDATE settings SET value = '25' WHERE key = 'day_boundary_hour';",
        [],
    )
    .unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();

    let err = repo.load_settings().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));

    let core: CoreError = err.into();
    assert_eq!(core.code(), "STORAGE_ERROR");
    assert_eq!(core.http_status(), 500);
}
