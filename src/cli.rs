// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn user_arg() -> Arg {
    Arg::new("user").long("user").required(true).help("User name")
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("paycycle")
        .version(crate_version!())
        .about("Pay-day budget cycles, recurring charge reconciliation, and monthly snapshots")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .about("Add a user")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("pay-day")
                                .long("pay-day")
                                .required(true)
                                .help("Day of month the salary lands (1-31)"),
                        )
                        .arg(Arg::new("salary").long("salary").required(true))
                        .arg(Arg::new("pct-fixed").long("pct-fixed").default_value("50"))
                        .arg(
                            Arg::new("pct-variable")
                                .long("pct-variable")
                                .default_value("30"),
                        )
                        .arg(
                            Arg::new("pct-savings")
                                .long("pct-savings")
                                .default_value("20"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("show").about("Show a user").arg(user_arg()),
                ))
                .subcommand(
                    Command::new("set")
                        .about("Update pay day, salary, or budget percentages")
                        .arg(user_arg())
                        .arg(Arg::new("pay-day").long("pay-day"))
                        .arg(Arg::new("salary").long("salary"))
                        .arg(Arg::new("pct-fixed").long("pct-fixed"))
                        .arg(Arg::new("pct-variable").long("pct-variable"))
                        .arg(Arg::new("pct-savings").long("pct-savings")),
                ),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .about("Add an account")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .default_value("current")
                                .help("current or savings"),
                        )
                        .arg(Arg::new("balance").long("balance").default_value("0")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List accounts").arg(user_arg()),
                ))
                .subcommand(
                    Command::new("deactivate")
                        .about("Soft-deactivate an account")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("charge")
                .about("Manage recurring charges")
                .subcommand(
                    Command::new("add")
                        .about("Add a recurring charge")
                        .arg(user_arg())
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .help("Target account name"),
                        )
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("day")
                                .long("day")
                                .required(true)
                                .help("Day of month the charge is debited (1-31)"),
                        )
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .default_value("monthly"),
                        )
                        .arg(
                            Arg::new("start")
                                .long("start")
                                .help("Start date YYYY-MM-DD (defaults to today)"),
                        )
                        .arg(Arg::new("end").long("end").help("Optional end date YYYY-MM-DD")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List recurring charges")
                        .arg(user_arg()),
                ))
                .subcommand(
                    Command::new("deactivate")
                        .about("Soft-deactivate a charge (history keeps resolving)")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Manual ledger entries")
                .subcommand(
                    Command::new("add")
                        .about("Record an entry")
                        .arg(user_arg())
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Signed amount; negative is a debit"),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .required(true),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List entries")
                        .arg(user_arg())
                        .arg(Arg::new("month").long("month").help("Filter by YYYY-MM"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("cycle")
                .about("Budget cycles")
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show the cycle containing a date")
                        .arg(user_arg())
                        .arg(Arg::new("date").long("date").help("Reference date, defaults to today")),
                ))
                .subcommand(json_flags(
                    Command::new("apply")
                        .about("Apply charges due on or before today in the current cycle")
                        .arg(user_arg())
                        .arg(Arg::new("date").long("date").help("Reference date, defaults to today")),
                )),
        )
        .subcommand(
            Command::new("salary")
                .about("Salary validation")
                .subcommand(json_flags(
                    Command::new("validate")
                        .about("Record the salary, freeze last cycle, apply this cycle's charges")
                        .arg(user_arg())
                        .arg(Arg::new("month").long("month").required(true).help("YYYY-MM"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .help("Defaults to the user's configured net salary"),
                        )
                        .arg(Arg::new("date").long("date").help("Reception date, defaults to today"))
                        .arg(Arg::new("account").long("account").help("Target account name"))
                        .arg(Arg::new("description").long("description")),
                )),
        )
        .subcommand(
            Command::new("snapshot")
                .about("Frozen cycle snapshots")
                .subcommand(json_flags(
                    Command::new("freeze")
                        .about("Freeze (or re-freeze) a cycle's totals")
                        .arg(user_arg())
                        .arg(Arg::new("month").long("month").required(true).help("YYYY-MM")),
                ))
                .subcommand(json_flags(
                    Command::new("list").about("List snapshots").arg(user_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show one snapshot")
                        .arg(user_arg())
                        .arg(Arg::new("month").long("month").required(true).help("YYYY-MM")),
                )),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals funded from account allocations")
                .subcommand(
                    Command::new("add")
                        .about("Add a savings goal")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("target").long("target").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List goals with saved amounts and progress")
                        .arg(user_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("allocate")
                        .about("Move money from an account into a goal")
                        .arg(user_arg())
                        .arg(Arg::new("goal").long("goal").required(true).help("Goal name"))
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").help("Defaults to today")),
                ))
                .subcommand(json_flags(
                    Command::new("withdraw")
                        .about("Move money back from a goal into its account")
                        .arg(user_arg())
                        .arg(Arg::new("goal").long("goal").required(true).help("Goal name"))
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").help("Defaults to today")),
                ))
                .subcommand(
                    Command::new("deactivate")
                        .about("Soft-deactivate a goal")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Scan for ledger inconsistencies"))
}
