// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget-cycle date arithmetic. A cycle runs from one pay day to the day
//! before the next pay day, so it is the pay-day analogue of a calendar
//! month. Everything here is pure; cycles are recomputed on every call.

use chrono::{Datelike, Duration, NaiveDate};

use crate::errors::{Error, Result};
use crate::models::BudgetCycle;

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Day-of-month clamped to the month's actual length, so day 31 in February
/// yields the 28th/29th.
pub fn clamp_day(year: i32, month: u32, day: u32) -> NaiveDate {
    let d = day.min(days_in_month(year, month)).max(1);
    // Safe: d is within the month by construction.
    NaiveDate::from_ymd_opt(year, month, d).unwrap_or_default()
}

fn next_ym(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn prev_ym(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

fn check_day_of_month(day: u32) -> Result<()> {
    if !(1..=31).contains(&day) {
        return Err(Error::InvalidArgument(format!(
            "Day of month {} outside 1-31",
            day
        )));
    }
    Ok(())
}

/// Compute the budget cycle containing `reference` for a given pay day.
///
/// If the reference date is on or after the (clamped) pay day of its month,
/// the cycle starts that month; otherwise it starts the previous month. The
/// end is always the day before the next cycle's start, which keeps cycles
/// contiguous and non-overlapping even when clamping kicks in.
pub fn compute_cycle(reference: NaiveDate, pay_day: u32) -> Result<BudgetCycle> {
    check_day_of_month(pay_day)?;

    let this_start = clamp_day(reference.year(), reference.month(), pay_day);
    let start = if reference >= this_start {
        this_start
    } else {
        let (py, pm) = prev_ym(reference.year(), reference.month());
        clamp_day(py, pm, pay_day)
    };

    let (ny, nm) = next_ym(start.year(), start.month());
    let end = clamp_day(ny, nm, pay_day) - Duration::days(1);

    Ok(BudgetCycle {
        start,
        end,
        label: format!("{:04}-{:02}", start.year(), start.month()),
    })
}

/// Concrete due date of a charge inside a cycle, or None when the charge
/// day sits just outside a cycle that spans a month boundary.
pub fn compute_due_date(cycle: &BudgetCycle, charge_day: u32) -> Option<NaiveDate> {
    let candidate = clamp_day(cycle.start.year(), cycle.start.month(), charge_day);
    if candidate >= cycle.start && candidate <= cycle.end {
        return Some(candidate);
    }
    let (ny, nm) = next_ym(cycle.start.year(), cycle.start.month());
    let candidate = clamp_day(ny, nm, charge_day);
    if candidate >= cycle.start && candidate <= cycle.end {
        return Some(candidate);
    }
    None
}

/// Parse a `YYYY-MM` cycle label.
pub fn parse_label(label: &str) -> Result<(i32, u32)> {
    let invalid = || Error::InvalidArgument(format!("Invalid cycle label '{}', expected YYYY-MM", label));
    let (y, m) = label.split_once('-').ok_or_else(invalid)?;
    if y.len() != 4 || m.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = y.parse().map_err(|_| invalid())?;
    let month: u32 = m.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

/// The cycle that starts in the labeled month, anchored on the pay day.
pub fn cycle_for_label(label: &str, pay_day: u32) -> Result<BudgetCycle> {
    let (year, month) = parse_label(label)?;
    check_day_of_month(pay_day)?;
    let anchor = clamp_day(year, month, pay_day);
    compute_cycle(anchor, pay_day)
}

pub fn previous_label(label: &str) -> Result<String> {
    let (year, month) = parse_label(label)?;
    let (py, pm) = prev_ym(year, month);
    Ok(format!("{:04}-{:02}", py, pm))
}
