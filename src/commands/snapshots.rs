// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::MonthSnapshot;
use crate::snapshot;
use crate::utils::{fmt_money, id_for_user, maybe_print_json, parse_month, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("freeze", sub)) => freeze(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn snapshot_rows(snaps: &[MonthSnapshot]) -> Vec<Vec<String>> {
    snaps
        .iter()
        .map(|s| {
            vec![
                s.month.clone(),
                format!("{} to {}", s.cycle_start, s.cycle_end),
                fmt_money(&s.total_income),
                fmt_money(&s.total_fixed),
                fmt_money(&s.total_variable),
                fmt_money(&s.total_savings),
                fmt_money(&s.current_balance),
                s.entry_count.to_string(),
            ]
        })
        .collect()
}

const SNAPSHOT_HEADERS: [&str; 8] = [
    "Cycle", "Range", "Income", "Fixed", "Variable", "Savings", "Balance", "Entries",
];

fn freeze(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let snap = snapshot::freeze(conn, user_id, &month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &snap)? {
        println!(
            "{}",
            pretty_table(&SNAPSHOT_HEADERS, snapshot_rows(std::slice::from_ref(&snap)))
        );
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;

    let snaps = snapshot::list_snapshots(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &snaps)? {
        println!("{}", pretty_table(&SNAPSHOT_HEADERS, snapshot_rows(&snaps)));
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let Some(snap) = snapshot::get_snapshot(conn, user_id, &month)? else {
        bail!("No snapshot for {}", month);
    };
    if !maybe_print_json(json_flag, jsonl_flag, &snap)? {
        println!(
            "{}",
            pretty_table(&SNAPSHOT_HEADERS, snapshot_rows(std::slice::from_ref(&snap)))
        );
        println!(
            "Budget: fixed {} / variable {} (salary {})",
            snap.budget_fixed, snap.budget_variable, snap.salary
        );
    }
    Ok(())
}
