use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use proptest::prelude::*;
use proptest::test_runner::Config;
use tracker_core::{
    cycle_status, date_range, days_between, format_iso_date, is_effectively_today_at,
    is_past_at, parse_iso_date, to_logical_day, to_logical_day_id, to_logical_day_start,
    BoundaryHour, HabitStatus,
};

fn any_date() -> impl Strategy<Value = NaiveDate> {
    // 1900-01-01 ..= 2199-12-31
    (0_i64..109_572).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + Duration::days(offset)
    })
}

fn any_instant() -> impl Strategy<Value = NaiveDateTime> {
    (any_date(), 0_u32..24, 0_u32..60, 0_u32..60).prop_map(|(date, hour, minute, second)| {
        date.and_time(NaiveTime::from_hms_opt(hour, minute, second).unwrap())
    })
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn logical_day_follows_boundary_rule(instant in any_instant(), hour in 0_i64..24) {
        let boundary = BoundaryHour::new(hour).unwrap();
        let expected = if i64::from(instant.hour()) >= hour {
            instant.date()
        } else {
            instant.date() - Duration::days(1)
        };
        prop_assert_eq!(to_logical_day(instant, boundary), expected);
        prop_assert_eq!(to_logical_day_id(instant, boundary), format_iso_date(expected));
    }

    #[test]
    fn logical_day_start_is_midnight_of_logical_day(instant in any_instant(), hour in 0_i64..24) {
        let boundary = BoundaryHour::new(hour).unwrap();
        let start = to_logical_day_start(instant, boundary);
        prop_assert_eq!(start.time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        prop_assert_eq!(start.date(), to_logical_day(instant, boundary));
    }

    #[test]
    fn iso_format_parse_round_trips(date in any_date()) {
        let text = format_iso_date(date);
        prop_assert_eq!(text.len(), 10);
        prop_assert_eq!(parse_iso_date(&text).unwrap(), date);
    }

    #[test]
    fn date_range_length_matches_days_between(a in any_date(), span in -40_i64..400) {
        let b = a + Duration::days(span);
        let range = date_range(a, b);
        if a <= b {
            prop_assert_eq!(range.len() as i64, days_between(a, b) + 1);
            prop_assert_eq!(range.first().cloned(), Some(format_iso_date(a)));
            prop_assert_eq!(range.last().cloned(), Some(format_iso_date(b)));
        } else {
            prop_assert!(range.is_empty());
        }
    }

    #[test]
    fn today_and_past_agree_with_logical_day(now in any_instant(), hour in 0_i64..24, offset in -3_i64..4) {
        let boundary = BoundaryHour::new(hour).unwrap();
        let today = to_logical_day(now, boundary);
        let candidate = format_iso_date(today + Duration::days(offset));

        prop_assert_eq!(is_effectively_today_at(&candidate, boundary, now).unwrap(), offset == 0);
        prop_assert_eq!(is_past_at(&candidate, boundary, now).unwrap(), offset < 0);
    }

    #[test]
    fn boundary_hours_outside_day_are_rejected(hour in prop_oneof![i64::MIN..0, 24_i64..i64::MAX]) {
        prop_assert!(BoundaryHour::new(hour).is_err());
    }
}

#[test]
fn documented_range_example() {
    let start = parse_iso_date("2024-01-10").unwrap();
    let end = parse_iso_date("2024-01-13").unwrap();
    assert_eq!(
        date_range(start, end),
        vec!["2024-01-10", "2024-01-11", "2024-01-12", "2024-01-13"]
    );
}

#[test]
fn cycle_of_eight_returns_to_every_start() {
    for start in HabitStatus::CYCLE {
        let mut status = start;
        for _ in 0..8 {
            status = cycle_status(status);
        }
        assert_eq!(status, start);
    }
}
