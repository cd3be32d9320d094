// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine;
use crate::utils::{
    id_for_account, id_for_user, maybe_print_json, parse_date, parse_decimal, parse_month,
};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("validate", sub)) => validate(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn validate(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let amount = sub
        .get_one::<String>("amount")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let received_on = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let account_id = sub
        .get_one::<String>("account")
        .map(|name| id_for_account(conn, user_id, name))
        .transpose()?;
    let description = sub.get_one::<String>("description").map(|s| s.as_str());

    let outcome = engine::validate_salary(
        conn,
        user_id,
        &month,
        amount,
        received_on,
        account_id,
        description,
    )?;

    if maybe_print_json(json_flag, jsonl_flag, &outcome)? {
        return Ok(());
    }

    println!(
        "Validated salary {} for {} (froze cycle {})",
        outcome.entry.amount, month, outcome.previous_snapshot.month
    );
    println!(
        "Applied {} charge(s) for cycle {}",
        outcome.report.created.len(),
        outcome.report.cycle.label
    );
    for e in &outcome.report.created {
        println!("  {} {} {}", e.date, e.description, e.amount);
    }
    for f in &outcome.report.failures {
        eprintln!("Charge '{}' failed: {}", f.charge_name, f.error);
    }
    Ok(())
}
