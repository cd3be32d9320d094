// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Frequency};
use crate::utils::{
    id_for_account, id_for_charge, id_for_user, maybe_print_json, parse_date, parse_decimal,
    pretty_table,
};
use anyhow::{Result, bail};
use chrono::Local;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
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
    let account_id = id_for_account(conn, user_id, sub.get_one::<String>("account").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let category = Category::parse(sub.get_one::<String>("category").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount <= Decimal::ZERO {
        bail!("Charge amount {} must be positive", amount);
    }
    let day: u32 = sub.get_one::<String>("day").unwrap().parse()?;
    if !(1..=31).contains(&day) {
        bail!("Charge day {} outside 1-31", day);
    }
    let frequency = Frequency::parse(sub.get_one::<String>("frequency").unwrap())?;
    let start = match sub.get_one::<String>("start") {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let end = sub
        .get_one::<String>("end")
        .map(|s| parse_date(s))
        .transpose()?;

    conn.execute(
        "INSERT INTO recurring_charges(user_id, account_id, name, category, amount,
                                       day_of_month, frequency, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            user_id,
            account_id,
            name,
            category.as_str(),
            amount.to_string(),
            day,
            frequency.as_str(),
            start.to_string(),
            end.map(|d| d.to_string()),
        ],
    )?;
    println!(
        "Added {} charge '{}' of {} on day {}",
        frequency.as_str(),
        name,
        amount,
        day
    );
    Ok(())
}

#[derive(Serialize)]
struct ChargeRow {
    name: String,
    category: String,
    amount: String,
    day: i64,
    frequency: String,
    start: String,
    end: Option<String>,
    active: bool,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;

    let mut stmt = conn.prepare(
        "SELECT name, category, amount, day_of_month, frequency, start_date, end_date, active
         FROM recurring_charges WHERE user_id=?1 ORDER BY day_of_month, name",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok(ChargeRow {
            name: r.get(0)?,
            category: r.get(1)?,
            amount: r.get(2)?,
            day: r.get(3)?,
            frequency: r.get(4)?,
            start: r.get(5)?,
            end: r.get(6)?,
            active: r.get(7)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    c.category.clone(),
                    c.amount.clone(),
                    c.day.to_string(),
                    c.frequency.clone(),
                    c.start.clone(),
                    c.end.clone().unwrap_or_default(),
                    if c.active { "yes".into() } else { "no".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Charge", "Category", "Amount", "Day", "Frequency", "Start", "End", "Active"],
                rows
            )
        );
    }
    Ok(())
}

/// Charges are never hard-deleted: historical entries and snapshots keep
/// resolving the charge they came from.
fn deactivate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap();
    let charge_id = id_for_charge(conn, user_id, name)?;
    conn.execute(
        "UPDATE recurring_charges SET active=0 WHERE id=?1",
        params![charge_id],
    )?;
    println!("Deactivated charge '{}'", name);
    Ok(())
}
