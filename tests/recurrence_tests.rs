// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use paycycle::cycle::cycle_for_label;
use paycycle::models::{Category, Frequency, RecurringCharge};
use paycycle::recurrence::is_due_this_cycle;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn charge(frequency: Frequency, start: NaiveDate) -> RecurringCharge {
    RecurringCharge {
        id: 1,
        user_id: 1,
        account_id: 1,
        name: "Insurance".into(),
        category: Category::Insurance,
        amount: "42.50".parse().unwrap(),
        day_of_month: 10,
        frequency,
        start_date: start,
        end_date: None,
        active: true,
    }
}

#[test]
fn monthly_is_always_due() {
    let c = charge(Frequency::Monthly, d(2024, 3, 1));
    for label in ["2024-03", "2024-04", "2025-02", "2026-01"] {
        let cycle = cycle_for_label(label, 25).unwrap();
        assert!(is_due_this_cycle(&c, &cycle), "monthly not due in {}", label);
    }
}

#[test]
fn quarterly_from_january_over_two_years() {
    let c = charge(Frequency::Quarterly, d(2024, 1, 15));
    for year in [2024, 2025] {
        for month in 1..=12u32 {
            let label = format!("{:04}-{:02}", year, month);
            let cycle = cycle_for_label(&label, 25).unwrap();
            let expected = matches!(month, 1 | 4 | 7 | 10);
            assert_eq!(
                is_due_this_cycle(&c, &cycle),
                expected,
                "quarterly due mismatch in {}",
                label
            );
        }
    }
}

#[test]
fn bimonthly_parity() {
    let c = charge(Frequency::Bimonthly, d(2024, 1, 1));
    for (offset_months, expected) in [(0, true), (1, false), (2, true), (3, false), (4, true), (5, false)] {
        let month = 1 + offset_months;
        let cycle = cycle_for_label(&format!("2024-{:02}", month), 25).unwrap();
        assert_eq!(is_due_this_cycle(&c, &cycle), expected, "offset {}", offset_months);
    }
}

#[test]
fn annual_only_on_anniversary_month() {
    let c = charge(Frequency::Annual, d(2023, 6, 1));
    assert!(is_due_this_cycle(&c, &cycle_for_label("2024-06", 25).unwrap()));
    assert!(!is_due_this_cycle(&c, &cycle_for_label("2024-07", 25).unwrap()));
    assert!(!is_due_this_cycle(&c, &cycle_for_label("2025-05", 25).unwrap()));
    assert!(is_due_this_cycle(&c, &cycle_for_label("2025-06", 25).unwrap()));
}

#[test]
fn inactive_charge_never_due() {
    let mut c = charge(Frequency::Monthly, d(2024, 1, 1));
    c.active = false;
    assert!(!is_due_this_cycle(&c, &cycle_for_label("2024-02", 25).unwrap()));
}

#[test]
fn window_gates_apply_before_frequency() {
    // Starts after the cycle ends
    let c = charge(Frequency::Monthly, d(2025, 6, 1));
    assert!(!is_due_this_cycle(&c, &cycle_for_label("2025-01", 25).unwrap()));

    // Ended before the cycle starts
    let mut c = charge(Frequency::Monthly, d(2024, 1, 1));
    c.end_date = Some(d(2024, 12, 31));
    assert!(!is_due_this_cycle(&c, &cycle_for_label("2025-01", 25).unwrap()));

    // End date inside the cycle still passes
    let mut c = charge(Frequency::Monthly, d(2024, 1, 1));
    c.end_date = Some(d(2025, 2, 1));
    assert!(is_due_this_cycle(&c, &cycle_for_label("2025-01", 25).unwrap()));
}

#[test]
fn charge_starting_mid_cycle_is_due_that_cycle() {
    // Cycle 2025-01 runs Jan 25 - Feb 24; a charge starting Feb 1 overlaps it
    let c = charge(Frequency::Monthly, d(2025, 2, 1));
    assert!(is_due_this_cycle(&c, &cycle_for_label("2025-01", 25).unwrap()));
}
