// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::AccountKind;
use crate::utils::{id_for_account, id_for_user, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("deactivate", sub)) => deactivate(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let kind = AccountKind::parse(sub.get_one::<String>("kind").unwrap())?;
    let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;

    // The creation balance is also stored as the opening balance so that
    // doctor can later reconcile balance against the entry history.
    conn.execute(
        "INSERT INTO accounts(user_id, name, kind, balance, opening_balance)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![user_id, name, kind.as_str(), balance.to_string()],
    )?;
    println!("Added {} account '{}' with balance {}", kind.as_str(), name, balance);
    Ok(())
}

#[derive(Serialize)]
struct AccountRow {
    name: String,
    kind: String,
    balance: String,
    active: bool,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;

    let mut stmt = conn.prepare(
        "SELECT name, kind, balance, active FROM accounts WHERE user_id=?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok(AccountRow {
            name: r.get(0)?,
            kind: r.get(1)?,
            balance: r.get(2)?,
            active: r.get(3)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|a| {
                vec![
                    a.name.clone(),
                    a.kind.clone(),
                    a.balance.clone(),
                    if a.active { "yes".into() } else { "no".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Account", "Kind", "Balance", "Active"], rows)
        );
    }
    Ok(())
}

fn deactivate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap();
    let account_id = id_for_account(conn, user_id, name)?;
    conn.execute(
        "UPDATE accounts SET active=0 WHERE id=?1",
        params![account_id],
    )?;
    println!("Deactivated account '{}'", name);
    Ok(())
}
