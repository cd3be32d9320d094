// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("org.paycycle", "Paycycle", "paycycle"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("paycycle.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// Public so integration tests can run against an in-memory connection.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        pay_day INTEGER NOT NULL CHECK(pay_day BETWEEN 1 AND 31),
        salary TEXT NOT NULL DEFAULT '0',
        pct_fixed TEXT NOT NULL DEFAULT '50',
        pct_variable TEXT NOT NULL DEFAULT '30',
        pct_savings TEXT NOT NULL DEFAULT '20',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('current','savings')),
        balance TEXT NOT NULL DEFAULT '0',
        opening_balance TEXT NOT NULL DEFAULT '0',
        active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, name),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS recurring_charges(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        account_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        day_of_month INTEGER NOT NULL CHECK(day_of_month BETWEEN 1 AND 31),
        frequency TEXT NOT NULL
            CHECK(frequency IN ('monthly','bimonthly','quarterly','semiannual','annual')),
        start_date TEXT NOT NULL,
        end_date TEXT,
        active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(account_id) REFERENCES accounts(id)
    );
    CREATE INDEX IF NOT EXISTS idx_charges_user_active
        ON recurring_charges(user_id, active);

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        account_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT NOT NULL,
        date TEXT NOT NULL,
        charge_id INTEGER,
        cycle_label TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(account_id) REFERENCES accounts(id),
        FOREIGN KEY(charge_id) REFERENCES recurring_charges(id)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
    -- Idempotency key for engine-applied recurring charges: at most one
    -- entry per (charge, cycle).
    CREATE UNIQUE INDEX IF NOT EXISTS idx_transactions_charge_cycle
        ON transactions(charge_id, cycle_label) WHERE charge_id IS NOT NULL;

    CREATE TABLE IF NOT EXISTS validated_salaries(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        month TEXT NOT NULL,
        amount TEXT NOT NULL,
        received_on TEXT NOT NULL,
        account_id INTEGER NOT NULL,
        description TEXT,
        UNIQUE(user_id, month),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(account_id) REFERENCES accounts(id)
    );

    CREATE TABLE IF NOT EXISTS savings_goals(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        target_amount TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, name),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    -- One row per (goal, account); the goal's current amount is always
    -- SUM(amount) over these rows, never cached on the goal itself.
    CREATE TABLE IF NOT EXISTS goal_allocations(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        goal_id INTEGER NOT NULL,
        account_id INTEGER NOT NULL,
        amount TEXT NOT NULL DEFAULT '0',
        UNIQUE(goal_id, account_id),
        FOREIGN KEY(goal_id) REFERENCES savings_goals(id) ON DELETE CASCADE,
        FOREIGN KEY(account_id) REFERENCES accounts(id)
    );

    CREATE TABLE IF NOT EXISTS month_snapshots(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        month TEXT NOT NULL,
        cycle_start TEXT NOT NULL,
        cycle_end TEXT NOT NULL,
        total_income TEXT NOT NULL,
        total_fixed TEXT NOT NULL,
        total_variable TEXT NOT NULL,
        total_savings TEXT NOT NULL,
        current_balance TEXT NOT NULL,
        salary TEXT NOT NULL,
        budget_fixed TEXT NOT NULL,
        budget_variable TEXT NOT NULL,
        entry_count INTEGER NOT NULL,
        fixed_count INTEGER NOT NULL,
        variable_count INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, month),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}
