// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Category;
use crate::utils::{fmt_money, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Collect every inconsistency as an (issue, detail) row. Split out of
/// `handle` so the checks can be exercised directly.
pub fn scan(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Engine-applied entries missing their cycle label half of the
    //    idempotency key
    let mut stmt = conn.prepare(
        "SELECT id FROM transactions WHERE charge_id IS NOT NULL AND cycle_label IS NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["charge_entry_no_cycle".into(), format!("entry {}", id)]);
    }

    // 2) Active charges debiting a deactivated account
    let mut stmt2 = conn.prepare(
        "SELECT c.name FROM recurring_charges c JOIN accounts a ON c.account_id=a.id
         WHERE c.active=1 AND a.active=0",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let name: String = r.get(0)?;
        rows.push(vec!["charge_inactive_account".into(), name]);
    }

    // 3) Unparsable stored categories or amounts
    let mut stmt3 = conn.prepare("SELECT id, category, amount FROM transactions")?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let cat: String = r.get(1)?;
        let amt: String = r.get(2)?;
        if Category::parse(&cat).is_err() {
            rows.push(vec!["unknown_category".into(), format!("entry {}: {}", id, cat)]);
        }
        if amt.parse::<Decimal>().is_err() {
            rows.push(vec!["bad_amount".into(), format!("entry {}: {}", id, amt)]);
        }
    }

    // 4) Account balances drifting from opening balance + entry sums
    let mut stmt4 = conn.prepare("SELECT id, name, balance, opening_balance FROM accounts")?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        let balance: String = r.get(2)?;
        let opening: String = r.get(3)?;
        let (Ok(balance), Ok(opening)) = (balance.parse::<Decimal>(), opening.parse::<Decimal>())
        else {
            // Unparsable amounts already reported above
            continue;
        };
        let expected = opening + entry_sum(conn, id)?;
        if expected != balance {
            rows.push(vec![
                "balance_drift".into(),
                format!(
                    "account '{}': balance {} but entries total {}",
                    name,
                    fmt_money(&balance),
                    fmt_money(&expected)
                ),
            ]);
        }
    }

    Ok(rows)
}

fn entry_sum(conn: &Connection, account_id: i64) -> Result<Decimal> {
    let mut stmt = conn.prepare("SELECT amount FROM transactions WHERE account_id=?1")?;
    let mut cur = stmt.query([account_id])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = cur.next()? {
        let amt: String = r.get(0)?;
        if let Ok(d) = amt.parse::<Decimal>() {
            total += d;
        }
    }
    Ok(total)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = scan(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
