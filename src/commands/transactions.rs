// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{self, NewEntry};
use crate::models::Category;
use crate::utils::{
    id_for_account, id_for_user, maybe_print_json, parse_date, parse_decimal, parse_month,
    pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let account_id = id_for_account(conn, user_id, sub.get_one::<String>("account").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = Category::parse(sub.get_one::<String>("category").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap().to_string();

    // Entry and balance move together or not at all.
    let tx = conn.transaction()?;
    ledger::append_entry(
        &tx,
        &NewEntry {
            user_id,
            account_id,
            amount,
            category,
            description: &description,
            date,
            charge_id: None,
            cycle_label: None,
        },
    )?;
    ledger::adjust_balance(&tx, account_id, amount)?;
    tx.commit()?;

    println!("Recorded {} on {} '{}'", amount, date, description);
    Ok(())
}

#[derive(Serialize)]
pub struct EntryRow {
    pub date: String,
    pub account: String,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub cycle_label: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<EntryRow>> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let mut sql = String::from(
        "SELECT t.date, a.name, t.amount, t.category, t.description, t.cycle_label
         FROM transactions t LEFT JOIN accounts a ON t.account_id=a.id
         WHERE t.user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];

    if let Some(month) = sub.get_one::<String>("month") {
        parse_month(month)?;
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        Category::parse(cat)?;
        sql.push_str(" AND t.category=?");
        params_vec.push(cat.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let account: Option<String> = r.get(1)?;
        let cycle_label: Option<String> = r.get(5)?;
        data.push(EntryRow {
            date: r.get(0)?,
            account: account.unwrap_or_default(),
            amount: r.get(2)?,
            category: r.get(3)?,
            description: r.get(4)?,
            cycle_label: cycle_label.unwrap_or_default(),
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.account.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.cycle_label.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Account", "Amount", "Category", "Description", "Cycle"],
                rows
            )
        );
    }
    Ok(())
}
