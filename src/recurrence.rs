// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Decides whether a recurring charge is due in a given cycle at all,
//! independent of the day-of-month placement handled by the cycle module.

use chrono::Datelike;

use crate::models::{BudgetCycle, Frequency, RecurringCharge};

/// Whole months between the charge's start month and the cycle's start
/// month. Negative when the charge starts in a later month.
fn months_since_start(charge: &RecurringCharge, cycle: &BudgetCycle) -> i32 {
    (cycle.start.year() - charge.start_date.year()) * 12
        + (cycle.start.month() as i32 - charge.start_date.month() as i32)
}

/// Both gates must pass: the charge's active window overlaps the cycle, and
/// the cycle-month offset since the charge started lands on the frequency
/// interval.
pub fn is_due_this_cycle(charge: &RecurringCharge, cycle: &BudgetCycle) -> bool {
    if !charge.active {
        return false;
    }
    if charge.start_date > cycle.end {
        return false;
    }
    if let Some(end) = charge.end_date {
        if end < cycle.start {
            return false;
        }
    }

    match charge.frequency {
        Frequency::Monthly => true,
        freq => months_since_start(charge, cycle).rem_euclid(freq.interval_months()) == 0,
    }
}
