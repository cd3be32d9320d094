// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Charge application engine. Walks a user's active recurring charges for
//! the cycle containing a reference date and applies each due charge to the
//! ledger exactly once: one negative entry plus one balance adjustment, as a
//! single SQLite transaction per charge. Running a pass twice with no other
//! writes in between leaves the ledger unchanged.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::cycle;
use crate::errors::{Error, Result};
use crate::ledger::{self, NewEntry};
use crate::models::{BudgetCycle, LedgerEntry, MonthSnapshot, RecurringCharge};
use crate::recurrence;
use crate::snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Dashboard-load trigger: never apply a charge whose due date is still
    /// in the future.
    CheckDue,
    /// Post-salary-validation trigger: apply every due charge of the cycle
    /// regardless of today's date.
    PostSalary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChargeFailure {
    pub charge_id: i64,
    pub charge_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub cycle: BudgetCycle,
    pub created: Vec<LedgerEntry>,
    pub failures: Vec<ChargeFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalaryOutcome {
    pub entry: LedgerEntry,
    pub previous_snapshot: MonthSnapshot,
    pub report: ApplyReport,
}

/// Apply every recurring charge due in the cycle containing `reference`.
/// Charges are independent: one failed write is recorded in the report and
/// the pass continues with the rest.
pub fn apply_due_charges(
    conn: &mut Connection,
    user_id: i64,
    reference: NaiveDate,
    mode: ApplyMode,
) -> Result<ApplyReport> {
    let user = ledger::get_user(conn, user_id)?;
    let cycle = cycle::compute_cycle(reference, user.pay_day)?;
    let charges = ledger::active_charges_for_cycle(conn, user_id, &cycle)?;

    let mut report = ApplyReport {
        cycle: cycle.clone(),
        created: Vec::new(),
        failures: Vec::new(),
    };

    for charge in &charges {
        if !recurrence::is_due_this_cycle(charge, &cycle) {
            continue;
        }
        let Some(due_date) = cycle::compute_due_date(&cycle, charge.day_of_month) else {
            continue;
        };
        if mode == ApplyMode::CheckDue && due_date > reference {
            continue;
        }

        match apply_one(conn, charge, &cycle, due_date) {
            Ok(Some(entry)) => report.created.push(entry),
            Ok(None) => {} // already applied this cycle
            Err(e) => report.failures.push(ChargeFailure {
                charge_id: charge.id,
                charge_name: charge.name.clone(),
                error: e.to_string(),
            }),
        }
    }

    Ok(report)
}

/// One charge's idempotency check, entry append, and balance adjustment as
/// an atomic unit. Returns None when the charge was already applied.
fn apply_one(
    conn: &mut Connection,
    charge: &RecurringCharge,
    cycle: &BudgetCycle,
    due_date: NaiveDate,
) -> Result<Option<LedgerEntry>> {
    if charge.amount <= Decimal::ZERO {
        return Err(Error::InvalidArgument(format!(
            "Charge '{}' has non-positive amount {}",
            charge.name, charge.amount
        )));
    }

    let tx = conn.transaction()?;

    if ledger::charge_applied(&tx, charge.id, &cycle.label)? {
        return Ok(None);
    }

    let amount = -charge.amount;
    let description = format!("{} - {}", charge.name, cycle.label);
    let entry_id = ledger::append_entry(
        &tx,
        &NewEntry {
            user_id: charge.user_id,
            account_id: charge.account_id,
            amount,
            category: charge.category,
            description: &description,
            date: due_date,
            charge_id: Some(charge.id),
            cycle_label: Some(&cycle.label),
        },
    )
    .map_err(|e| match e {
        Error::Storage(inner) => Error::from_sqlite_for_charge(inner, &charge.name),
        other => other,
    })?;
    ledger::adjust_balance(&tx, charge.account_id, amount)?;

    tx.commit()?;

    Ok(Some(LedgerEntry {
        id: entry_id,
        user_id: charge.user_id,
        account_id: charge.account_id,
        amount,
        category: charge.category,
        description,
        date: due_date,
        charge_id: Some(charge.id),
        cycle_label: Some(cycle.label.clone()),
    }))
}

/// Salary validation trigger: freeze the previous cycle's snapshot, record
/// the salary (upsert per month, so re-validation updates in place), then
/// apply the current cycle's charges unconditionally.
#[allow(clippy::too_many_arguments)]
pub fn validate_salary(
    conn: &mut Connection,
    user_id: i64,
    month: &str,
    amount: Option<Decimal>,
    received_on: NaiveDate,
    account_id: Option<i64>,
    description: Option<&str>,
) -> Result<SalaryOutcome> {
    cycle::parse_label(month)?;
    let user = ledger::get_user(conn, user_id)?;

    let account = match account_id {
        Some(id) => {
            let account = ledger::get_active_account(conn, id)?;
            if account.user_id != user_id {
                return Err(Error::NotFound(format!("Account {} not found", id)));
            }
            account
        }
        None => ledger::default_current_account(conn, user_id)?,
    };

    let amount = amount.unwrap_or(user.salary);
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidArgument(format!(
            "Salary amount {} must be positive",
            amount
        )));
    }
    let description = match description {
        Some(d) if !d.trim().is_empty() => d.to_string(),
        _ => format!("Salary {}", month),
    };

    let previous_snapshot = snapshot::freeze(conn, user_id, &cycle::previous_label(month)?)?;

    let entry = {
        let tx = conn.transaction()?;
        ledger::upsert_validated_salary(
            &tx,
            user_id,
            month,
            amount,
            received_on,
            account.id,
            &description,
        )?;
        let entry_id = ledger::append_entry(
            &tx,
            &NewEntry {
                user_id,
                account_id: account.id,
                amount,
                category: crate::models::Category::Salary,
                description: &description,
                date: received_on,
                charge_id: None,
                cycle_label: None,
            },
        )?;
        ledger::adjust_balance(&tx, account.id, amount)?;
        tx.commit()?;
        ledger::get_entry(conn, entry_id)?
    };

    let report = apply_due_charges(conn, user_id, received_on, ApplyMode::PostSalary)?;

    Ok(SalaryOutcome {
        entry,
        previous_snapshot,
        report,
    })
}
