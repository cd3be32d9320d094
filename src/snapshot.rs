// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Freezes one user's one budget cycle into an immutable, replaceable
//! snapshot row. Freezing is an upsert keyed by (user, cycle label), so it
//! is idempotent and safe to recompute.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::cycle;
use crate::errors::{Error, Result};
use crate::ledger;
use crate::models::{Category, MonthSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Income,
    Fixed,
    Variable,
    Savings,
}

/// Fixed category classification. Categories in no bucket (transfers, cash
/// withdrawals, commissions) contribute to no snapshot total. Bank fees
/// count as a fixed charge.
pub fn bucket_for(category: Category) -> Option<Bucket> {
    use Category::*;
    match category {
        Salary | Bonus | Freelance | Allowance | Refund | InvestmentGain | GiftReceived | Sale => {
            Some(Bucket::Income)
        }
        Rent | Insurance | Subscription | MortgageLoan | ConsumerLoan | Taxes | HealthInsurance
        | BankFees => Some(Bucket::Fixed),
        Groceries | Restaurant | Transport | Fuel | Shopping | Leisure | Health | Beauty | Home
        | Education | Travel => Some(Bucket::Variable),
        Savings | Investment => Some(Bucket::Savings),
        InternalTransfer | GoalTransfer | CashWithdrawal | Commission | Other => None,
    }
}

fn pct_of(salary: Decimal, pct: Decimal) -> Decimal {
    (salary * pct / Decimal::new(100, 0)).round_dp(2)
}

/// Compute and upsert the snapshot for the cycle starting in the labeled
/// month. Budget figures use the user's percentages as of freeze time, which
/// may drift from what was configured during the cycle; that approximation
/// is accepted.
pub fn freeze(conn: &Connection, user_id: i64, label: &str) -> Result<MonthSnapshot> {
    let user = ledger::get_user(conn, user_id)?;
    let cycle = cycle::cycle_for_label(label, user.pay_day)?;
    let entries = ledger::entries_in_range(conn, user_id, cycle.start, cycle.end)?;

    let mut total_income = Decimal::ZERO;
    let mut total_fixed = Decimal::ZERO;
    let mut total_variable = Decimal::ZERO;
    let mut total_savings = Decimal::ZERO;
    let mut fixed_count: i64 = 0;
    let mut variable_count: i64 = 0;

    for entry in &entries {
        match bucket_for(entry.category) {
            Some(Bucket::Income) if entry.amount > Decimal::ZERO => {
                total_income += entry.amount;
            }
            Some(Bucket::Fixed) if entry.amount < Decimal::ZERO => {
                total_fixed += entry.amount.abs();
                fixed_count += 1;
            }
            Some(Bucket::Variable) if entry.amount < Decimal::ZERO => {
                total_variable += entry.amount.abs();
                variable_count += 1;
            }
            Some(Bucket::Savings) if entry.amount < Decimal::ZERO => {
                total_savings += entry.amount.abs();
            }
            _ => {}
        }
    }

    let current_balance = ledger::current_accounts_balance(conn, user_id)?;
    let budget_fixed = pct_of(user.salary, user.pct_fixed);
    let budget_variable = pct_of(user.salary, user.pct_variable);

    conn.execute(
        "INSERT INTO month_snapshots(
             user_id, month, cycle_start, cycle_end,
             total_income, total_fixed, total_variable, total_savings,
             current_balance, salary, budget_fixed, budget_variable,
             entry_count, fixed_count, variable_count)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15)
         ON CONFLICT(user_id, month) DO UPDATE SET
             cycle_start=excluded.cycle_start,
             cycle_end=excluded.cycle_end,
             total_income=excluded.total_income,
             total_fixed=excluded.total_fixed,
             total_variable=excluded.total_variable,
             total_savings=excluded.total_savings,
             current_balance=excluded.current_balance,
             salary=excluded.salary,
             budget_fixed=excluded.budget_fixed,
             budget_variable=excluded.budget_variable,
             entry_count=excluded.entry_count,
             fixed_count=excluded.fixed_count,
             variable_count=excluded.variable_count",
        params![
            user_id,
            label,
            cycle.start.to_string(),
            cycle.end.to_string(),
            total_income.to_string(),
            total_fixed.to_string(),
            total_variable.to_string(),
            total_savings.to_string(),
            current_balance.to_string(),
            user.salary.to_string(),
            budget_fixed.to_string(),
            budget_variable.to_string(),
            entries.len() as i64,
            fixed_count,
            variable_count,
        ],
    )?;

    get_snapshot(conn, user_id, label)?
        .ok_or_else(|| Error::NotFound(format!("Snapshot {} missing after freeze", label)))
}

fn snapshot_from_row(r: &rusqlite::Row) -> rusqlite::Result<MonthSnapshot> {
    let dec = |idx: usize| -> rusqlite::Result<Decimal> {
        let s: String = r.get(idx)?;
        s.parse::<Decimal>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    };
    Ok(MonthSnapshot {
        id: r.get(0)?,
        user_id: r.get(1)?,
        month: r.get(2)?,
        cycle_start: r.get(3)?,
        cycle_end: r.get(4)?,
        total_income: dec(5)?,
        total_fixed: dec(6)?,
        total_variable: dec(7)?,
        total_savings: dec(8)?,
        current_balance: dec(9)?,
        salary: dec(10)?,
        budget_fixed: dec(11)?,
        budget_variable: dec(12)?,
        entry_count: r.get(13)?,
        fixed_count: r.get(14)?,
        variable_count: r.get(15)?,
    })
}

const SNAPSHOT_COLS: &str = "id, user_id, month, cycle_start, cycle_end, \
     total_income, total_fixed, total_variable, total_savings, \
     current_balance, salary, budget_fixed, budget_variable, \
     entry_count, fixed_count, variable_count";

pub fn get_snapshot(conn: &Connection, user_id: i64, label: &str) -> Result<Option<MonthSnapshot>> {
    let sql = format!(
        "SELECT {} FROM month_snapshots WHERE user_id=?1 AND month=?2",
        SNAPSHOT_COLS
    );
    let mut stmt = conn.prepare(&sql)?;
    Ok(stmt
        .query_row(params![user_id, label], snapshot_from_row)
        .optional()?)
}

pub fn list_snapshots(conn: &Connection, user_id: i64) -> Result<Vec<MonthSnapshot>> {
    let sql = format!(
        "SELECT {} FROM month_snapshots WHERE user_id=?1 ORDER BY month DESC",
        SNAPSHOT_COLS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], snapshot_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
