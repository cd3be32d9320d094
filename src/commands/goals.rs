// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::goals;
use crate::utils::{
    fmt_money, id_for_account, id_for_goal, id_for_user, maybe_print_json, parse_date,
    parse_decimal, pretty_table,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("allocate", sub)) => transfer(conn, sub, Direction::Into)?,
        Some(("withdraw", sub)) => transfer(conn, sub, Direction::OutOf)?,
        Some(("deactivate", sub)) => deactivate(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let target = parse_decimal(sub.get_one::<String>("target").unwrap())?;

    goals::create_goal(conn, user_id, &name, target)?;
    println!("Added goal '{}' with target {}", name, fmt_money(&target));
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;

    let views = goals::list_goals(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &views)? {
        let rows: Vec<Vec<String>> = views
            .iter()
            .map(|v| {
                vec![
                    v.goal.name.clone(),
                    fmt_money(&v.goal.target_amount),
                    fmt_money(&v.current_amount),
                    format!("{}%", v.progress_pct),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Goal", "Target", "Saved", "Progress"], rows)
        );
    }
    Ok(())
}

enum Direction {
    Into,
    OutOf,
}

fn transfer(conn: &mut Connection, sub: &clap::ArgMatches, direction: Direction) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let goal_name = sub.get_one::<String>("goal").unwrap();
    let goal_id = id_for_goal(conn, user_id, goal_name)?;
    let account_id = id_for_account(conn, user_id, sub.get_one::<String>("account").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date: NaiveDate = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };

    let entry = match direction {
        Direction::Into => goals::allocate(conn, user_id, goal_id, account_id, amount, date)?,
        Direction::OutOf => goals::withdraw(conn, user_id, goal_id, account_id, amount, date)?,
    };
    if !maybe_print_json(json_flag, jsonl_flag, &entry)? {
        let verb = match direction {
            Direction::Into => "Allocated",
            Direction::OutOf => "Withdrew",
        };
        println!(
            "{} {} {} goal '{}' (entry {})",
            verb,
            fmt_money(&amount),
            match direction {
                Direction::Into => "to",
                Direction::OutOf => "from",
            },
            goal_name,
            entry.id
        );
    }
    Ok(())
}

fn deactivate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap();
    let goal_id = id_for_goal(conn, user_id, name)?;
    goals::deactivate_goal(conn, user_id, goal_id)?;
    println!("Deactivated goal '{}'", name);
    Ok(())
}
