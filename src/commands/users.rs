// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::{id_for_user, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_pay_day(s: &str) -> Result<u32> {
    let day: u32 = s.parse()?;
    if !(1..=31).contains(&day) {
        bail!("Pay day {} outside 1-31", day);
    }
    Ok(day)
}

/// The budget-split invariant lives here, not in the engine: percentages
/// must sum to 100 whenever they are set.
fn check_percentages(fixed: Decimal, variable: Decimal, savings: Decimal) -> Result<()> {
    if fixed + variable + savings != Decimal::new(100, 0) {
        bail!(
            "Budget percentages must sum to 100 (got {} + {} + {})",
            fixed,
            variable,
            savings
        );
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let pay_day = parse_pay_day(sub.get_one::<String>("pay-day").unwrap())?;
    let salary = parse_decimal(sub.get_one::<String>("salary").unwrap())?;
    let pct_fixed = parse_decimal(sub.get_one::<String>("pct-fixed").unwrap())?;
    let pct_variable = parse_decimal(sub.get_one::<String>("pct-variable").unwrap())?;
    let pct_savings = parse_decimal(sub.get_one::<String>("pct-savings").unwrap())?;
    check_percentages(pct_fixed, pct_variable, pct_savings)?;

    conn.execute(
        "INSERT INTO users(name, pay_day, salary, pct_fixed, pct_variable, pct_savings)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            name,
            pay_day,
            salary.to_string(),
            pct_fixed.to_string(),
            pct_variable.to_string(),
            pct_savings.to_string()
        ],
    )?;
    println!("Added user '{}' (pay day {})", name, pay_day);
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let user = ledger::get_user(conn, user_id)?;

    if !maybe_print_json(json_flag, jsonl_flag, &user)? {
        let rows = vec![vec![
            user.name.clone(),
            user.pay_day.to_string(),
            user.salary.to_string(),
            user.pct_fixed.to_string(),
            user.pct_variable.to_string(),
            user.pct_savings.to_string(),
        ]];
        println!(
            "{}",
            pretty_table(
                &["Name", "Pay day", "Salary", "Fixed %", "Variable %", "Savings %"],
                rows
            )
        );
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let user = ledger::get_user(conn, user_id)?;

    let pay_day = match sub.get_one::<String>("pay-day") {
        Some(s) => parse_pay_day(s)?,
        None => user.pay_day,
    };
    let salary = match sub.get_one::<String>("salary") {
        Some(s) => parse_decimal(s)?,
        None => user.salary,
    };
    let pct_fixed = match sub.get_one::<String>("pct-fixed") {
        Some(s) => parse_decimal(s)?,
        None => user.pct_fixed,
    };
    let pct_variable = match sub.get_one::<String>("pct-variable") {
        Some(s) => parse_decimal(s)?,
        None => user.pct_variable,
    };
    let pct_savings = match sub.get_one::<String>("pct-savings") {
        Some(s) => parse_decimal(s)?,
        None => user.pct_savings,
    };
    check_percentages(pct_fixed, pct_variable, pct_savings)?;

    conn.execute(
        "UPDATE users SET pay_day=?1, salary=?2, pct_fixed=?3, pct_variable=?4, pct_savings=?5
         WHERE id=?6",
        params![
            pay_day,
            salary.to_string(),
            pct_fixed.to_string(),
            pct_variable.to_string(),
            pct_savings.to_string(),
            user_id
        ],
    )?;
    println!("Updated user '{}'", user.name);
    Ok(())
}
