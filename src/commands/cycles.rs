// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{self, ApplyMode};
use crate::utils::{id_for_user, maybe_print_json, parse_date, pretty_table};
use crate::{cycle, ledger};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("apply", sub)) => apply(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn reference_date(sub: &clap::ArgMatches) -> Result<chrono::NaiveDate> {
    match sub.get_one::<String>("date") {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let user = ledger::get_user(conn, user_id)?;
    let reference = reference_date(sub)?;

    let cycle = cycle::compute_cycle(reference, user.pay_day)?;
    if !maybe_print_json(json_flag, jsonl_flag, &cycle)? {
        println!(
            "Cycle {}: {} to {}",
            cycle.label, cycle.start, cycle.end
        );
    }
    Ok(())
}

/// On-demand trigger (dashboard-load equivalent): applies charges due on or
/// before the reference date, a no-op when everything was already applied.
fn apply(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let reference = reference_date(sub)?;

    let report = engine::apply_due_charges(conn, user_id, reference, ApplyMode::CheckDue)?;

    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }

    if report.created.is_empty() && report.failures.is_empty() {
        println!("Cycle {}: no charges to apply", report.cycle.label);
    } else {
        let rows: Vec<Vec<String>> = report
            .created
            .iter()
            .map(|e| {
                vec![
                    e.date.to_string(),
                    e.description.clone(),
                    e.amount.to_string(),
                    e.category.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Description", "Amount", "Category"], rows)
        );
    }
    for f in &report.failures {
        eprintln!("Charge '{}' failed: {}", f.charge_name, f.error);
    }
    Ok(())
}
