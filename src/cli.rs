// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn yes_flag() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .action(ArgAction::SetTrue)
        .help("Skip the confirmation prompt")
}

fn type_arg(required: bool) -> Arg {
    Arg::new("type")
        .long("type")
        .required(required)
        .value_parser(["expense", "income"])
}

fn tx_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(type_arg(required))
        .arg(
            Arg::new("date")
                .long("date")
                .required(required)
                .help("YYYY-MM-DD"),
        )
        .arg(
            Arg::new("amount")
                .long("amount")
                .required(required)
                .allow_negative_numbers(true)
                .help("Non-negative amount"),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .help("Category name"),
        )
        .arg(
            Arg::new("ardoise")
                .long("ardoise")
                .help("Ardoise id or name to link"),
        )
        .arg(Arg::new("note").long("note"))
}

pub fn build_cli() -> Command {
    command!()
        .name("ardoise")
        .about("Track income and expenses, with savings/debt slates")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Database file (defaults to the platform data dir)"),
        )
        .subcommand(
            Command::new("init")
                .about("Create the database, optionally from a seed snapshot")
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed database path or http(s) URL, copied only if no database exists"),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(tx_fields(Command::new("add").about("Record a transaction"), true))
                .subcommand(
                    tx_fields(Command::new("edit").about("Edit a transaction"), false)
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("no_category")
                                .long("no-category")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("category"),
                        )
                        .arg(
                            Arg::new("no_ardoise")
                                .long("no-ardoise")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("ardoise"),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(yes_flag()),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List transactions grouped by day, newest first"),
                )),
        )
        .subcommand(
            Command::new("category")
                .about("Categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(type_arg(true))
                        .arg(Arg::new("link").long("link").help("Display label")),
                )
                .subcommand(Command::new("list").arg(type_arg(false)))
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(yes_flag()),
                )
                .subcommand(
                    Command::new("reset-defaults")
                        .about("Replace all categories with the default set")
                        .arg(yes_flag()),
                ),
        )
        .subcommand(
            Command::new("ardoise")
                .about("Savings/debt slates")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("risk")
                                .long("risk")
                                .help("Ultra Sure, Very Low Risk, Low Risk, Moderate Risk, High Risk, Very High Risk"),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("risk").long("risk")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true))
                        .arg(yes_flag()),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show an ardoise with its linked transactions")
                        .arg(Arg::new("id").required(true)),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Reports")
                .subcommand(json_flags(
                    Command::new("weekly")
                        .about("Day-of-week histogram over all transactions")
                        .arg(type_arg(false).default_value("expense"))
                        .arg(
                            Arg::new("height")
                                .long("height")
                                .help("Max bar height (defaults to the chart_height setting)"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("available").about("Income minus expenses"),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .required(true)
                                .value_parser(["csv", "json"]),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(Command::new("doctor").about("Check references and cached balances"))
}
