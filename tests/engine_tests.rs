// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use paycycle::db;
use paycycle::engine::{self, ApplyMode};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// User with pay day 25 and salary 3000, one current account at 1000, one
/// monthly rent charge of 800 due on day 5.
fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO users(id, name, pay_day, salary) VALUES (1, 'alice', 25, '3000.00')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO accounts(id, user_id, name, kind, balance)
         VALUES (1, 1, 'Checking', 'current', '1000.00')",
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

fn balance(conn: &Connection, account_id: i64) -> Decimal {
    let s: String = conn
        .query_row(
            "SELECT balance FROM accounts WHERE id=?1",
            params![account_id],
            |r| r.get(0),
        )
        .unwrap();
    s.parse().unwrap()
}

fn entry_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn check_due_skips_charges_still_in_the_future() {
    let mut conn = setup();
    // Cycle is Jan 25 - Feb 24; rent lands Feb 5, after the reference date
    let report = engine::apply_due_charges(&mut conn, 1, d(2025, 1, 28), ApplyMode::CheckDue).unwrap();
    assert_eq!(report.cycle.label, "2025-01");
    assert!(report.created.is_empty());
    assert!(report.failures.is_empty());
    assert_eq!(entry_count(&conn), 0);
    assert_eq!(balance(&conn, 1), "1000.00".parse::<Decimal>().unwrap());
}

#[test]
fn check_due_applies_once_the_date_arrives() {
    let mut conn = setup();
    let report = engine::apply_due_charges(&mut conn, 1, d(2025, 2, 5), ApplyMode::CheckDue).unwrap();
    assert_eq!(report.created.len(), 1);
    let entry = &report.created[0];
    assert_eq!(entry.amount, "-800.00".parse::<Decimal>().unwrap());
    assert_eq!(entry.date, d(2025, 2, 5));
    assert_eq!(entry.cycle_label.as_deref(), Some("2025-01"));
    assert_eq!(entry.description, "Rent - 2025-01");
    assert_eq!(balance(&conn, 1), "200.00".parse::<Decimal>().unwrap());
}

#[test]
fn applying_twice_changes_nothing() {
    let mut conn = setup();
    engine::apply_due_charges(&mut conn, 1, d(2025, 2, 10), ApplyMode::CheckDue).unwrap();
    let after_first = (entry_count(&conn), balance(&conn, 1));

    let report = engine::apply_due_charges(&mut conn, 1, d(2025, 2, 10), ApplyMode::CheckDue).unwrap();
    assert!(report.created.is_empty());
    assert!(report.failures.is_empty());
    assert_eq!((entry_count(&conn), balance(&conn, 1)), after_first);
}

#[test]
fn post_salary_applies_regardless_of_today() {
    let mut conn = setup();
    // Feb 5 is in the future relative to Jan 28, yet PostSalary applies it
    let report =
        engine::apply_due_charges(&mut conn, 1, d(2025, 1, 28), ApplyMode::PostSalary).unwrap();
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.created[0].date, d(2025, 2, 5));
}

#[test]
fn frequency_gate_skips_off_cycle_months() {
    let mut conn = setup();
    conn.execute(
        "UPDATE recurring_charges SET frequency='quarterly', start_date='2025-01-01' WHERE id=1",
        [],
    )
    .unwrap();
    // 2025-02 cycle: months_since_start = 1, quarterly not due
    let report =
        engine::apply_due_charges(&mut conn, 1, d(2025, 3, 5), ApplyMode::PostSalary).unwrap();
    assert_eq!(report.cycle.label, "2025-02");
    assert!(report.created.is_empty());

    // 2025-04 cycle: months_since_start = 3, due
    let report =
        engine::apply_due_charges(&mut conn, 1, d(2025, 5, 5), ApplyMode::PostSalary).unwrap();
    assert_eq!(report.cycle.label, "2025-04");
    assert_eq!(report.created.len(), 1);
}

#[test]
fn one_bad_charge_does_not_block_the_rest() {
    let mut conn = setup();
    // Second charge points at a deactivated account
    conn.execute(
        "INSERT INTO accounts(id, user_id, name, kind, balance, active)
         VALUES (2, 1, 'Old', 'current', '0', 0)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO recurring_charges(id, user_id, account_id, name, category, amount,
                                       day_of_month, frequency, start_date)
         VALUES (2, 1, 2, 'Gym', 'subscription', '30.00', 3, 'monthly', '2024-12-01')",
        [],
    )
    .unwrap();

    let report =
        engine::apply_due_charges(&mut conn, 1, d(2025, 2, 10), ApplyMode::CheckDue).unwrap();
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.created[0].description, "Rent - 2025-01");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].charge_name, "Gym");
    // The failed charge left no partial state behind
    assert_eq!(entry_count(&conn), 1);
}

#[test]
fn non_positive_amount_is_rejected_without_mutation() {
    let mut conn = setup();
    conn.execute("UPDATE recurring_charges SET amount='0' WHERE id=1", [])
        .unwrap();
    let report =
        engine::apply_due_charges(&mut conn, 1, d(2025, 2, 10), ApplyMode::CheckDue).unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(entry_count(&conn), 0);
    assert_eq!(balance(&conn, 1), "1000.00".parse::<Decimal>().unwrap());
}

#[test]
fn unknown_user_is_not_found() {
    let mut conn = setup();
    let err = engine::apply_due_charges(&mut conn, 99, d(2025, 2, 10), ApplyMode::CheckDue)
        .unwrap_err();
    assert!(matches!(err, paycycle::errors::Error::NotFound(_)));
}

#[test]
fn validate_salary_freezes_previous_and_applies_current() {
    let mut conn = setup();
    let outcome =
        engine::validate_salary(&mut conn, 1, "2025-02", None, d(2025, 2, 25), None, None).unwrap();

    // Salary entry defaults to the configured net salary
    assert_eq!(outcome.entry.amount, "3000.00".parse::<Decimal>().unwrap());
    assert_eq!(outcome.entry.description, "Salary 2025-02");

    // Previous cycle frozen
    assert_eq!(outcome.previous_snapshot.month, "2025-01");

    // Current cycle (Feb 25 - Mar 24) rent applied in advance of Mar 5
    assert_eq!(outcome.report.cycle.label, "2025-02");
    assert_eq!(outcome.report.created.len(), 1);
    assert_eq!(outcome.report.created[0].date, d(2025, 3, 5));

    // 1000 + 3000 - 800
    assert_eq!(balance(&conn, 1), "3200.00".parse::<Decimal>().unwrap());
}

#[test]
fn revalidating_a_month_updates_the_salary_record() {
    let mut conn = setup();
    engine::validate_salary(&mut conn, 1, "2025-02", None, d(2025, 2, 25), None, None).unwrap();
    engine::validate_salary(
        &mut conn,
        1,
        "2025-02",
        Some("3100.00".parse().unwrap()),
        d(2025, 2, 26),
        None,
        None,
    )
    .unwrap();

    let (count, amount): (i64, String) = conn
        .query_row(
            "SELECT COUNT(*), MAX(amount) FROM validated_salaries WHERE user_id=1 AND month='2025-02'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(amount, "3100.00");

    // The rent charge still went through exactly once
    let rent: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transactions WHERE charge_id=1 AND cycle_label='2025-02'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(rent, 1);
}
