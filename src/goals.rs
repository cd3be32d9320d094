// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Savings goals. A goal's current amount is never stored on the goal row:
//! it is always the sum of its per-account allocation records, and the
//! allocations move in the same transaction as the ledger entry and balance
//! adjustment they mirror.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::errors::{Error, Result};
use crate::ledger::{self, NewEntry};
use crate::models::{Category, LedgerEntry, SavingsGoal};

/// A goal with its computed-on-read metrics.
#[derive(Debug, Clone, Serialize)]
pub struct GoalView {
    pub goal: SavingsGoal,
    pub current_amount: Decimal,
    pub progress_pct: Decimal,
}

fn decimal_col(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    s.parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn goal_from_row(r: &rusqlite::Row) -> rusqlite::Result<SavingsGoal> {
    Ok(SavingsGoal {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        target_amount: decimal_col(r, 3)?,
        active: r.get(4)?,
    })
}

pub fn create_goal(
    conn: &Connection,
    user_id: i64,
    name: &str,
    target_amount: Decimal,
) -> Result<i64> {
    if target_amount <= Decimal::ZERO {
        return Err(Error::InvalidArgument(format!(
            "Goal target {} must be positive",
            target_amount
        )));
    }
    conn.execute(
        "INSERT INTO savings_goals(user_id, name, target_amount) VALUES (?1, ?2, ?3)",
        params![user_id, name, target_amount.to_string()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_goal(conn: &Connection, user_id: i64, goal_id: i64) -> Result<SavingsGoal> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, target_amount, active
         FROM savings_goals WHERE id=?1 AND user_id=?2 AND active=1",
    )?;
    stmt.query_row(params![goal_id, user_id], goal_from_row)
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Goal {} not found or inactive", goal_id)))
}

/// Sum of the goal's allocation records; the computed "current amount".
pub fn current_amount(conn: &Connection, goal_id: i64) -> Result<Decimal> {
    let mut stmt = conn.prepare("SELECT amount FROM goal_allocations WHERE goal_id=?1")?;
    let mut rows = stmt.query(params![goal_id])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        total += decimal_col(r, 0)?;
    }
    Ok(total)
}

fn progress_pct(current: Decimal, target: Decimal) -> Decimal {
    if target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (current / target * Decimal::new(100, 0))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Active goals with their computed amounts and progress.
pub fn list_goals(conn: &Connection, user_id: i64) -> Result<Vec<GoalView>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, target_amount, active
         FROM savings_goals WHERE user_id=?1 AND active=1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![user_id], goal_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        let goal = row?;
        let current = current_amount(conn, goal.id)?;
        let pct = progress_pct(current, goal.target_amount);
        out.push(GoalView {
            goal,
            current_amount: current,
            progress_pct: pct,
        });
    }
    Ok(out)
}

fn allocation_amount(conn: &Connection, goal_id: i64, account_id: i64) -> Result<Decimal> {
    let s: Option<String> = conn
        .query_row(
            "SELECT amount FROM goal_allocations WHERE goal_id=?1 AND account_id=?2",
            params![goal_id, account_id],
            |r| r.get(0),
        )
        .optional()?;
    match s {
        Some(s) => s
            .parse::<Decimal>()
            .map_err(|e| Error::InvalidArgument(format!("Bad allocation amount '{}': {}", s, e))),
        None => Ok(Decimal::ZERO),
    }
}

fn set_allocation(conn: &Connection, goal_id: i64, account_id: i64, amount: Decimal) -> Result<()> {
    conn.execute(
        "INSERT INTO goal_allocations(goal_id, account_id, amount) VALUES (?1, ?2, ?3)
         ON CONFLICT(goal_id, account_id) DO UPDATE SET amount=excluded.amount",
        params![goal_id, account_id, amount.round_dp(2).to_string()],
    )?;
    Ok(())
}

fn check_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidArgument(format!(
            "Amount {} must be positive",
            amount
        )));
    }
    Ok(())
}

fn check_owner(account_user: i64, user_id: i64, account_id: i64) -> Result<()> {
    if account_user != user_id {
        return Err(Error::NotFound(format!("Account {} not found", account_id)));
    }
    Ok(())
}

/// Move money from an account into a goal: one negative goal-transfer entry,
/// the matching balance debit, and the allocation increment, atomically.
pub fn allocate(
    conn: &mut Connection,
    user_id: i64,
    goal_id: i64,
    account_id: i64,
    amount: Decimal,
    date: NaiveDate,
) -> Result<LedgerEntry> {
    check_positive(amount)?;
    let goal = get_goal(conn, user_id, goal_id)?;
    let account = ledger::get_active_account(conn, account_id)?;
    check_owner(account.user_id, user_id, account_id)?;

    let description = format!("Goal allocation - {}", goal.name);
    let tx = conn.transaction()?;
    let entry_id = ledger::append_entry(
        &tx,
        &NewEntry {
            user_id,
            account_id,
            amount: -amount,
            category: Category::GoalTransfer,
            description: &description,
            date,
            charge_id: None,
            cycle_label: None,
        },
    )?;
    ledger::adjust_balance(&tx, account_id, -amount)?;
    let allocated = allocation_amount(&tx, goal_id, account_id)?;
    set_allocation(&tx, goal_id, account_id, allocated + amount)?;
    tx.commit()?;

    ledger::get_entry(conn, entry_id)
}

/// Move money back from a goal's allocation into the account it sits on.
/// Rejected before any mutation when the allocation cannot cover it.
pub fn withdraw(
    conn: &mut Connection,
    user_id: i64,
    goal_id: i64,
    account_id: i64,
    amount: Decimal,
    date: NaiveDate,
) -> Result<LedgerEntry> {
    check_positive(amount)?;
    let goal = get_goal(conn, user_id, goal_id)?;
    let account = ledger::get_active_account(conn, account_id)?;
    check_owner(account.user_id, user_id, account_id)?;

    let allocated = allocation_amount(conn, goal_id, account_id)?;
    if allocated < amount {
        return Err(Error::InvalidArgument(format!(
            "Goal '{}' has only {} allocated on this account",
            goal.name, allocated
        )));
    }

    let description = format!("Goal withdrawal - {}", goal.name);
    let tx = conn.transaction()?;
    let entry_id = ledger::append_entry(
        &tx,
        &NewEntry {
            user_id,
            account_id,
            amount,
            category: Category::GoalTransfer,
            description: &description,
            date,
            charge_id: None,
            cycle_label: None,
        },
    )?;
    ledger::adjust_balance(&tx, account_id, amount)?;
    set_allocation(&tx, goal_id, account_id, allocated - amount)?;
    tx.commit()?;

    ledger::get_entry(conn, entry_id)
}

/// Goals are soft-deactivated so past goal-transfer entries keep resolving.
pub fn deactivate_goal(conn: &Connection, user_id: i64, goal_id: i64) -> Result<()> {
    let goal = get_goal(conn, user_id, goal_id)?;
    conn.execute(
        "UPDATE savings_goals SET active=0 WHERE id=?1",
        params![goal.id],
    )?;
    Ok(())
}
