//! Cycle token parsing tests.
//!
//! Covers: day-based tokens, the hour conversion rule, weekly rest day
//! validation, and purity.

use chrono::Weekday;
use roster_core::{
    cycle_spec::{parse_cycle_spec, CyclePattern},
    error::RosterError,
};

const NO_DAYS: &[&str] = &[];

#[test]
fn day_based_token_is_taken_literally() {
    let p = parse_cycle_spec("6x1", false, NO_DAYS).unwrap();
    assert_eq!(
        p,
        CyclePattern {
            work_days: 6,
            rest_days: 1,
            weekly_rest_days: vec![],
            uses_weekly_override: false,
        }
    );
    assert_eq!(p.cycle_length(), 7);

    let p = parse_cycle_spec("5x2", false, NO_DAYS).unwrap();
    assert_eq!((p.work_days, p.rest_days), (5, 2));
}

/// 12 hours on, 36 off is a 48-hour cycle: within 3 days, so one day on,
/// one day off.
#[test]
fn twelve_by_thirty_six_collapses_to_one_by_one() {
    let p = parse_cycle_spec("12x36", false, NO_DAYS).unwrap();
    assert_eq!((p.work_days, p.rest_days), (1, 1));
    assert_eq!(p.cycle_length(), 2);
    assert_eq!(p.token(), "1x1");
}

/// Longer hour-based cycles keep one work day and round(m / n) rest days.
#[test]
fn long_hour_cycles_round_rest_ratio() {
    let cases = [("24x72", (1, 3)), ("12x72", (1, 6)), ("24x60", (1, 3)), ("48x48", (1, 1))];
    for (token, expected) in cases {
        let p = parse_cycle_spec(token, false, NO_DAYS).unwrap();
        assert_eq!(
            (p.work_days, p.rest_days),
            expected,
            "token {token} normalized to {}",
            p.token()
        );
    }
}

#[test]
fn malformed_tokens_fail_with_invalid_format() {
    for token in ["", "6", "x1", "6x", "6x1x1", "123x1", "6 x 1", "6X1", "0x5", "5x0", "-1x2", "ax1"] {
        match parse_cycle_spec(token, false, NO_DAYS) {
            Err(RosterError::InvalidFormat { token: t }) => assert_eq!(t, token),
            other => panic!("expected InvalidFormat for {token:?}, got {other:?}"),
        }
    }
}

#[test]
fn weekly_rest_days_accept_any_case_and_form() {
    for days in [["Sat", "Sun"], ["sat", "SUNDAY"], ["Saturday", "sun"]] {
        let p = parse_cycle_spec("5x2", true, &days).unwrap();
        assert!(p.uses_weekly_override);
        assert_eq!(p.weekly_rest_days, vec![Weekday::Sat, Weekday::Sun], "days {days:?}");
    }
}

#[test]
fn weekly_rest_days_are_sorted_and_deduplicated() {
    let p = parse_cycle_spec("5x2", true, &["Sun", "sat", "Saturday"]).unwrap();
    assert_eq!(p.weekly_rest_days, vec![Weekday::Sat, Weekday::Sun]);
}

#[test]
fn weekly_rest_day_count_must_match_rest_days() {
    match parse_cycle_spec("5x2", true, &["Sat"]) {
        Err(RosterError::InvalidWeeklyOverride { values, .. }) => {
            assert_eq!(values, vec!["Sat".to_string()]);
        }
        other => panic!("expected count mismatch, got {other:?}"),
    }
    // Duplicates do not count twice.
    assert!(matches!(
        parse_cycle_spec("5x2", true, &["Sat", "saturday"]),
        Err(RosterError::InvalidWeeklyOverride { .. })
    ));
}

#[test]
fn unknown_weekday_tag_is_named_in_error() {
    match parse_cycle_spec("5x2", true, &["Sat", "Xyz"]) {
        Err(RosterError::InvalidWeeklyOverride { values, .. }) => {
            assert_eq!(values, vec!["Xyz".to_string()], "only the offending tag is reported");
        }
        other => panic!("expected invalid tag error, got {other:?}"),
    }
}

#[test]
fn weekly_override_requires_a_day_list() {
    assert!(matches!(
        parse_cycle_spec("6x1", true, NO_DAYS),
        Err(RosterError::InvalidWeeklyOverride { .. })
    ));
}

/// Without the flag, a supplied day list is ignored and the pattern carries
/// no weekly rest days.
#[test]
fn day_list_ignored_without_flag() {
    let p = parse_cycle_spec("6x1", false, &["Sun", "Xyz"]).unwrap();
    assert!(!p.uses_weekly_override);
    assert!(p.weekly_rest_days.is_empty());
}

/// Hour-based tokens normalize first; the day list is checked against the
/// normalized rest count.
#[test]
fn weekly_override_checked_after_hour_conversion() {
    let p = parse_cycle_spec("24x72", true, &["Fri", "Sat", "Sun"]).unwrap();
    assert_eq!(p.rest_days, 3);
    assert_eq!(p.weekly_rest_days.len(), 3);
    assert!(parse_cycle_spec("24x72", true, &["Sat", "Sun"]).is_err());
}

#[test]
fn parsing_is_pure() {
    let inputs: [(&str, bool, &[&str]); 4] = [
        ("6x1", false, &[]),
        ("12x36", false, &[]),
        ("5x2", true, &["sun", "SAT"]),
        ("24x72", true, &["mon", "Wednesday", "fri"]),
    ];
    for (token, flag, days) in inputs {
        let a = parse_cycle_spec(token, flag, days).unwrap();
        let b = parse_cycle_spec(token, flag, days).unwrap();
        assert_eq!(a, b, "two parses of {token} differ");
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
