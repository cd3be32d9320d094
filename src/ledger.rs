// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Store gateway: append-only ledger entries plus mutable account balances.
//! The engine goes through these functions and never computes a balance on
//! the fly.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::errors::{Error, Result};
use crate::models::{Account, AccountKind, BudgetCycle, Category, Frequency, LedgerEntry, RecurringCharge, User};

fn decimal_col(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    s.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn category_col(row: &Row, idx: usize) -> rusqlite::Result<Category> {
    let s: String = row.get(idx)?;
    Category::parse(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn frequency_col(row: &Row, idx: usize) -> rusqlite::Result<Frequency> {
    let s: String = row.get(idx)?;
    Frequency::parse(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn get_user(conn: &Connection, user_id: i64) -> Result<User> {
    let mut stmt = conn.prepare(
        "SELECT id, name, pay_day, salary, pct_fixed, pct_variable, pct_savings
         FROM users WHERE id=?1",
    )?;
    stmt.query_row(params![user_id], |r| {
        Ok(User {
            id: r.get(0)?,
            name: r.get(1)?,
            pay_day: r.get(2)?,
            salary: decimal_col(r, 3)?,
            pct_fixed: decimal_col(r, 4)?,
            pct_variable: decimal_col(r, 5)?,
            pct_savings: decimal_col(r, 6)?,
        })
    })
    .optional()?
    .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))
}

fn account_from_row(r: &Row) -> rusqlite::Result<Account> {
    let kind: String = r.get(3)?;
    Ok(Account {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        kind: AccountKind::parse(&kind)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
        balance: decimal_col(r, 4)?,
        active: r.get(5)?,
    })
}

/// Active account by id; deactivated accounts are NotFound to the engine.
pub fn get_active_account(conn: &Connection, account_id: i64) -> Result<Account> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, kind, balance, active FROM accounts WHERE id=?1 AND active=1",
    )?;
    stmt.query_row(params![account_id], account_from_row)
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Account {} not found or inactive", account_id)))
}

/// The user's first active current account, used when no target account is
/// given for a salary.
pub fn default_current_account(conn: &Connection, user_id: i64) -> Result<Account> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, kind, balance, active FROM accounts
         WHERE user_id=?1 AND kind='current' AND active=1 ORDER BY id LIMIT 1",
    )?;
    stmt.query_row(params![user_id], account_from_row)
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("No active current account for user {}", user_id)))
}

/// Apply a signed delta to an account balance, rounded to 2 decimal places.
pub fn adjust_balance(conn: &Connection, account_id: i64, delta: Decimal) -> Result<()> {
    let account = get_active_account(conn, account_id)?;
    let new_balance = (account.balance + delta).round_dp(2);
    conn.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![new_balance.to_string(), account_id],
    )?;
    Ok(())
}

pub struct NewEntry<'a> {
    pub user_id: i64,
    pub account_id: i64,
    pub amount: Decimal,
    pub category: Category,
    pub description: &'a str,
    pub date: NaiveDate,
    pub charge_id: Option<i64>,
    pub cycle_label: Option<&'a str>,
}

/// Insert one ledger entry and return its id. The UNIQUE index on
/// (charge_id, cycle_label) surfaces a lost idempotency race here.
pub fn append_entry(conn: &Connection, entry: &NewEntry) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(user_id, account_id, amount, category, description, date, charge_id, cycle_label)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entry.user_id,
            entry.account_id,
            entry.amount.to_string(),
            entry.category.as_str(),
            entry.description,
            entry.date.to_string(),
            entry.charge_id,
            entry.cycle_label,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn entry_from_row(r: &Row) -> rusqlite::Result<LedgerEntry> {
    Ok(LedgerEntry {
        id: r.get(0)?,
        user_id: r.get(1)?,
        account_id: r.get(2)?,
        amount: decimal_col(r, 3)?,
        category: category_col(r, 4)?,
        description: r.get(5)?,
        date: r.get(6)?,
        charge_id: r.get(7)?,
        cycle_label: r.get(8)?,
    })
}

pub fn get_entry(conn: &Connection, entry_id: i64) -> Result<LedgerEntry> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, account_id, amount, category, description, date, charge_id, cycle_label
         FROM transactions WHERE id=?1",
    )?;
    stmt.query_row(params![entry_id], entry_from_row)
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Entry {} not found", entry_id)))
}

/// Has the engine already applied this charge for this cycle?
pub fn charge_applied(conn: &Connection, charge_id: i64, cycle_label: &str) -> Result<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE charge_id=?1 AND cycle_label=?2",
        params![charge_id, cycle_label],
        |r| r.get(0),
    )?;
    Ok(n > 0)
}

/// All of a user's entries dated within [start, end], for snapshot
/// aggregation.
pub fn entries_in_range(
    conn: &Connection,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<LedgerEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, account_id, amount, category, description, date, charge_id, cycle_label
         FROM transactions WHERE user_id=?1 AND date>=?2 AND date<=?3
         ORDER BY date, id",
    )?;
    let rows = stmt.query_map(
        params![user_id, start.to_string(), end.to_string()],
        entry_from_row,
    )?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn charge_from_row(r: &Row) -> rusqlite::Result<RecurringCharge> {
    Ok(RecurringCharge {
        id: r.get(0)?,
        user_id: r.get(1)?,
        account_id: r.get(2)?,
        name: r.get(3)?,
        category: category_col(r, 4)?,
        amount: decimal_col(r, 5)?,
        day_of_month: r.get(6)?,
        frequency: frequency_col(r, 7)?,
        start_date: r.get(8)?,
        end_date: r.get(9)?,
        active: r.get(10)?,
    })
}

/// Active charges whose [start_date, end_date] window overlaps the cycle.
pub fn active_charges_for_cycle(
    conn: &Connection,
    user_id: i64,
    cycle: &BudgetCycle,
) -> Result<Vec<RecurringCharge>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, account_id, name, category, amount, day_of_month, frequency,
                start_date, end_date, active
         FROM recurring_charges
         WHERE user_id=?1 AND active=1 AND start_date<=?2
           AND (end_date IS NULL OR end_date>=?3)
         ORDER BY day_of_month, id",
    )?;
    let rows = stmt.query_map(
        params![user_id, cycle.end.to_string(), cycle.start.to_string()],
        charge_from_row,
    )?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Sum of the user's active current-account balances.
pub fn current_accounts_balance(conn: &Connection, user_id: i64) -> Result<Decimal> {
    let mut stmt = conn.prepare(
        "SELECT balance FROM accounts WHERE user_id=?1 AND kind='current' AND active=1",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        total += decimal_col(r, 0)?;
    }
    Ok(total)
}

/// Record a validated salary for a month; re-validating the same month
/// updates in place instead of duplicating.
pub fn upsert_validated_salary(
    conn: &Connection,
    user_id: i64,
    month: &str,
    amount: Decimal,
    received_on: NaiveDate,
    account_id: i64,
    description: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO validated_salaries(user_id, month, amount, received_on, account_id, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(user_id, month) DO UPDATE SET
             amount=excluded.amount,
             received_on=excluded.received_on,
             account_id=excluded.account_id,
             description=excluded.description",
        params![
            user_id,
            month,
            amount.to_string(),
            received_on.to_string(),
            account_id,
            description
        ],
    )?;
    Ok(())
}
