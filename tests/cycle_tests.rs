// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, NaiveDate};
use paycycle::cycle::{compute_cycle, compute_due_date, cycle_for_label, parse_label, previous_label};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn reference_after_pay_day_starts_this_month() {
    let c = compute_cycle(d(2025, 1, 28), 25).unwrap();
    assert_eq!(c.start, d(2025, 1, 25));
    assert_eq!(c.end, d(2025, 2, 24));
    assert_eq!(c.label, "2025-01");
}

#[test]
fn reference_before_pay_day_starts_previous_month() {
    let c = compute_cycle(d(2025, 1, 10), 25).unwrap();
    assert_eq!(c.start, d(2024, 12, 25));
    assert_eq!(c.end, d(2025, 1, 24));
    assert_eq!(c.label, "2024-12");
}

#[test]
fn pay_day_one_is_the_calendar_month() {
    let c = compute_cycle(d(2025, 6, 15), 1).unwrap();
    assert_eq!(c.start, d(2025, 6, 1));
    assert_eq!(c.end, d(2025, 6, 30));
}

#[test]
fn pay_day_31_clamps_in_short_months() {
    // Cycle anchored on Jan 31 ends the day before the clamped Feb pay day
    let c = compute_cycle(d(2025, 1, 31), 31).unwrap();
    assert_eq!(c.start, d(2025, 1, 31));
    assert_eq!(c.end, d(2025, 2, 27));

    // Feb 28 is the clamped pay day of a non-leap February
    let c = compute_cycle(d(2025, 2, 28), 31).unwrap();
    assert_eq!(c.start, d(2025, 2, 28));
    assert_eq!(c.end, d(2025, 3, 30));

    // Leap year
    let c = compute_cycle(d(2024, 2, 29), 31).unwrap();
    assert_eq!(c.start, d(2024, 2, 29));
}

#[test]
fn cycles_are_contiguous_for_every_pay_day() {
    for pay_day in [1u32, 5, 15, 25, 28, 29, 30, 31] {
        let mut date = d(2024, 1, 1);
        let mut prev = compute_cycle(date, pay_day).unwrap();
        // Walk two years day by day; every cycle change must be seamless
        for _ in 0..730 {
            date += Duration::days(1);
            let cur = compute_cycle(date, pay_day).unwrap();
            if cur != prev {
                assert_eq!(
                    cur.start,
                    prev.end + Duration::days(1),
                    "gap between cycles at {} for pay day {}",
                    date,
                    pay_day
                );
                prev = cur;
            }
        }
    }
}

#[test]
fn every_date_falls_inside_its_own_cycle() {
    for pay_day in [1u32, 15, 31] {
        let mut date = d(2024, 12, 20);
        for _ in 0..90 {
            let c = compute_cycle(date, pay_day).unwrap();
            assert!(c.start <= date && date <= c.end, "{} outside {:?}", date, c);
            date += Duration::days(1);
        }
    }
}

#[test]
fn due_date_in_start_month() {
    let c = compute_cycle(d(2025, 1, 28), 25).unwrap();
    assert_eq!(compute_due_date(&c, 25), Some(d(2025, 1, 25)));
    assert_eq!(compute_due_date(&c, 31), Some(d(2025, 1, 31)));
}

#[test]
fn due_date_rolls_into_next_month() {
    // Day 5 of January is before the cycle start, so rent lands Feb 5
    let c = compute_cycle(d(2025, 1, 28), 25).unwrap();
    assert_eq!(compute_due_date(&c, 5), Some(d(2025, 2, 5)));
}

#[test]
fn due_date_none_when_day_falls_in_the_clamped_gap() {
    // Pay day 31: cycle Jan 31 - Feb 27. Day 28 misses both months.
    let c = compute_cycle(d(2025, 1, 31), 31).unwrap();
    assert_eq!(compute_due_date(&c, 28), None);
}

#[test]
fn bad_pay_day_rejected() {
    assert!(compute_cycle(d(2025, 1, 1), 0).is_err());
    assert!(compute_cycle(d(2025, 1, 1), 32).is_err());
}

#[test]
fn labels_parse_and_step_back() {
    assert_eq!(parse_label("2025-03").unwrap(), (2025, 3));
    assert!(parse_label("2025-3").is_err());
    assert!(parse_label("2025-13").is_err());
    assert!(parse_label("garbage").is_err());
    assert_eq!(previous_label("2025-01").unwrap(), "2024-12");
    assert_eq!(previous_label("2025-07").unwrap(), "2025-06");
}

#[test]
fn cycle_for_label_anchors_on_pay_day() {
    let c = cycle_for_label("2025-01", 25).unwrap();
    assert_eq!(c.start, d(2025, 1, 25));
    assert_eq!(c.end, d(2025, 2, 24));
    assert_eq!(c.label, "2025-01");

    // Clamped anchor keeps the label of the anchor month
    let c = cycle_for_label("2025-02", 31).unwrap();
    assert_eq!(c.start, d(2025, 2, 28));
    assert_eq!(c.label, "2025-02");
}
