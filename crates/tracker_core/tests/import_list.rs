use tracker_core::db::open_db_in_memory;
use tracker_core::import::{parse, parse_for_import, validate};
use tracker_core::{
    CategoryRepository, CoreError, HabitListQuery, HabitRepository, ImportService,
    SqliteCategoryRepository, SqliteHabitRepository, SqliteImportRepository,
};

const HEALTH_LIST: &str =
    "# Health\n## Morning\n- Stretch\n- Meditation\n## Evening\n- Wind down\n- Journal";

fn category_names(content: &str) -> Vec<String> {
    parse(content)
        .categories
        .into_iter()
        .map(|category| category.name)
        .collect()
}

#[test]
fn nested_headings_yield_fully_qualified_categories() {
    let result = parse(HEALTH_LIST);

    assert_eq!(
        category_names(HEALTH_LIST),
        vec!["Health", "Health > Morning", "Health > Evening"]
    );
    let placed: Vec<(&str, Option<&str>)> = result
        .habits
        .iter()
        .map(|habit| (habit.name.as_str(), habit.category.as_deref()))
        .collect();
    assert_eq!(
        placed,
        vec![
            ("Stretch", Some("Health > Morning")),
            ("Meditation", Some("Health > Morning")),
            ("Wind down", Some("Health > Evening")),
            ("Journal", Some("Health > Evening")),
        ]
    );
    assert_eq!(result.stats.habits_found, 4);
    assert_eq!(result.stats.categories_found, 3);
    assert_eq!(result.stats.total_lines, 7);
    assert!(result.errors.is_empty());
}

#[test]
fn repeated_heading_path_is_deduplicated() {
    let content = "# Fitness\n- Running\n# Nutrition\n- Eating\n# Fitness\n- Gym";
    let result = parse(content);

    assert_eq!(category_names(content), vec!["Fitness", "Nutrition"]);
    let fitness: Vec<&str> = result
        .habits
        .iter()
        .filter(|habit| habit.category.as_deref() == Some("Fitness"))
        .map(|habit| habit.name.as_str())
        .collect();
    assert_eq!(fitness, vec!["Running", "Gym"]);
}

#[test]
fn same_leaf_under_different_parents_stays_distinct() {
    let content = "# Home\n## Morning\n- Tidy\n# Work\n## Morning\n- Plan day";
    assert_eq!(
        category_names(content),
        vec!["Home", "Home > Morning", "Work", "Work > Morning"]
    );
}

#[test]
fn sort_orders_are_zero_based_in_first_seen_order() {
    let result = parse(HEALTH_LIST);

    let habit_orders: Vec<usize> = result.habits.iter().map(|habit| habit.sort_order).collect();
    assert_eq!(habit_orders, vec![0, 1, 2, 3]);
    let category_orders: Vec<usize> = result
        .categories
        .iter()
        .map(|category| category.sort_order)
        .collect();
    assert_eq!(category_orders, vec![0, 1, 2]);
}

#[test]
fn empty_bullet_is_reported_without_aborting() {
    let result = parse("# Daily\n- Floss\n-   \n- Read");

    let names: Vec<&str> = result.habits.iter().map(|habit| habit.name.as_str()).collect();
    assert_eq!(names, vec!["Floss", "Read"]);
    assert_eq!(result.errors, vec!["Empty habit name at line 3".to_string()]);
}

#[test]
fn habits_before_any_heading_are_uncategorized() {
    let result = parse("- Drink water\n# Later\n- Sleep early");
    assert_eq!(result.habits[0].category, None);
    assert_eq!(result.habits[1].category.as_deref(), Some("Later"));
}

#[test]
fn validate_matches_documented_cases() {
    for content in ["", "   \n   "] {
        let report = validate(content);
        assert!(!report.is_valid);
        assert!(!report.errors.is_empty());
    }

    let report = validate("# Category\n- My Habit");
    assert!(report.is_valid);
    assert!(report.errors.is_empty());

    let report = validate("# Category only");
    assert!(!report.is_valid);
    assert!(report.errors[0].starts_with("No habits found"));
}

#[test]
fn parse_for_import_rejects_document_level_problems() {
    assert!(matches!(
        parse_for_import("\n\n"),
        Err(CoreError::EmptyImportContent)
    ));
    assert!(matches!(
        parse_for_import("# Heading\nprose line"),
        Err(CoreError::NoHabitsFound)
    ));
}

#[test]
fn import_service_writes_categories_and_habits_in_order() {
    let conn = open_db_in_memory().unwrap();
    let service = ImportService::new(SqliteImportRepository::try_new(&conn).unwrap());

    let report = service.import_list(HEALTH_LIST).unwrap();
    assert_eq!(report.outcome.categories.len(), 3);
    assert_eq!(report.outcome.habits.len(), 4);
    assert_eq!(report.outcome.reused_categories, 0);

    let categories = SqliteCategoryRepository::try_new(&conn)
        .unwrap()
        .list_categories(false)
        .unwrap();
    let names: Vec<&str> = categories.iter().map(|category| category.name.as_str()).collect();
    assert_eq!(names, vec!["Health", "Health > Morning", "Health > Evening"]);

    let habits = SqliteHabitRepository::try_new(&conn)
        .unwrap()
        .list_habits(&HabitListQuery::default())
        .unwrap();
    let names: Vec<&str> = habits.iter().map(|habit| habit.name.as_str()).collect();
    assert_eq!(names, vec!["Stretch", "Meditation", "Wind down", "Journal"]);
    assert_eq!(habits[0].category_uuid, Some(categories[1].uuid));
    assert_eq!(habits[3].category_uuid, Some(categories[2].uuid));
}

#[test]
fn second_import_reuses_existing_categories_and_appends_habits() {
    let conn = open_db_in_memory().unwrap();
    let service = ImportService::new(SqliteImportRepository::try_new(&conn).unwrap());

    service.import_list("# Fitness\n- Running").unwrap();
    let report = service
        .import_list("# Fitness\n- Gym\n# Nutrition\n- Eating")
        .unwrap();
    assert_eq!(report.outcome.reused_categories, 1);

    let categories = SqliteCategoryRepository::try_new(&conn)
        .unwrap()
        .list_categories(false)
        .unwrap();
    assert_eq!(categories.len(), 2);

    let habits = SqliteHabitRepository::try_new(&conn)
        .unwrap()
        .list_habits(&HabitListQuery::default())
        .unwrap();
    let names: Vec<&str> = habits.iter().map(|habit| habit.name.as_str()).collect();
    assert_eq!(names, vec!["Running", "Gym", "Eating"]);
    assert_eq!(habits[0].category_uuid, habits[1].category_uuid);
}

#[test]
fn rejected_import_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = ImportService::new(SqliteImportRepository::try_new(&conn).unwrap());

    let err = service.import_list("# Empty section\n").unwrap_err();
    assert!(matches!(err, CoreError::NoHabitsFound));
    assert_eq!(err.http_status(), 400);

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
