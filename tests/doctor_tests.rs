// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use paycycle::commands::doctor;
use paycycle::db;
use paycycle::engine::{self, ApplyMode};
use rusqlite::Connection;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// User with pay day 25, one current account opened at 1000, one monthly
/// rent charge of 800 due on day 5.
fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO users(id, name, pay_day, salary) VALUES (1, 'alice', 25, '3000.00')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO accounts(id, user_id, name, kind, balance, opening_balance)
         VALUES (1, 1, 'Checking', 'current', '1000.00', '1000.00')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO recurring_charges(id, user_id, account_id, name, category, amount,
                                       day_of_month, frequency, start_date)
         VALUES (1, 1, 1, 'Rent', 'rent', '800.00', 5, 'monthly', '2024-12-01')",
        [],
    )
    .unwrap();
    conn
}

fn issues_named(rows: &[Vec<String>], name: &str) -> usize {
    rows.iter().filter(|r| r[0] == name).count()
}

#[test]
fn clean_ledger_reports_nothing() {
    let mut conn = setup();
    engine::apply_due_charges(&mut conn, 1, d(2025, 2, 5), ApplyMode::CheckDue).unwrap();
    let rows = doctor::scan(&conn).unwrap();
    assert!(rows.is_empty(), "unexpected issues: {:?}", rows);
}

#[test]
fn balance_drift_is_flagged() {
    let mut conn = setup();
    engine::apply_due_charges(&mut conn, 1, d(2025, 2, 5), ApplyMode::CheckDue).unwrap();
    // Opening 1000 minus the 800 rent entry leaves 200, so a hand-edited
    // balance no longer matches the entry history.
    conn.execute("UPDATE accounts SET balance='350.00' WHERE id=1", [])
        .unwrap();

    let rows = doctor::scan(&conn).unwrap();
    assert_eq!(issues_named(&rows, "balance_drift"), 1);
    let detail = &rows.iter().find(|r| r[0] == "balance_drift").unwrap()[1];
    assert!(detail.contains("Checking"), "detail: {}", detail);
    assert!(detail.contains("350.00"), "detail: {}", detail);
    assert!(detail.contains("200.00"), "detail: {}", detail);
}

#[test]
fn entry_without_matching_balance_update_is_flagged() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(user_id, account_id, amount, category, description, date)
         VALUES (1, 1, '-25.00', 'groceries', 'Market', '2025-02-01')",
        [],
    )
    .unwrap();
    let rows = doctor::scan(&conn).unwrap();
    assert_eq!(issues_named(&rows, "balance_drift"), 1);
}

#[test]
fn drift_check_covers_each_account_separately() {
    let conn = setup();
    conn.execute(
        "INSERT INTO accounts(id, user_id, name, kind, balance, opening_balance)
         VALUES (2, 1, 'Livret', 'savings', '480.00', '500.00')",
        [],
    )
    .unwrap();
    let rows = doctor::scan(&conn).unwrap();
    assert_eq!(issues_named(&rows, "balance_drift"), 1);
    assert!(rows.iter().any(|r| r[1].contains("Livret")));
}

#[test]
fn charge_entry_without_cycle_label_is_flagged() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(user_id, account_id, amount, category, description, date, charge_id)
         VALUES (1, 1, '-800.00', 'rent', 'Rent', '2025-02-05', 1)",
        [],
    )
    .unwrap();
    let rows = doctor::scan(&conn).unwrap();
    assert_eq!(issues_named(&rows, "charge_entry_no_cycle"), 1);
}

#[test]
fn active_charge_on_deactivated_account_is_flagged() {
    let conn = setup();
    conn.execute("UPDATE accounts SET active=0 WHERE id=1", [])
        .unwrap();
    let rows = doctor::scan(&conn).unwrap();
    assert_eq!(issues_named(&rows, "charge_inactive_account"), 1);
}
