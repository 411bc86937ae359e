// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn range_args() -> [Arg; 3] {
    [
        Arg::new("range")
            .long("range")
            .default_value("this_month")
            .help("Preset: today, this_week, this_month, this_year, last_7_days, last_30_days, custom"),
        Arg::new("from")
            .long("from")
            .help("Start date YYYY-MM-DD (overrides the preset)"),
        Arg::new("to")
            .long("to")
            .help("End date YYYY-MM-DD, inclusive (overrides the preset)"),
    ]
}

fn when_args() -> [Arg; 3] {
    [
        Arg::new("date").long("date").help("Local date YYYY-MM-DD"),
        Arg::new("time")
            .long("time")
            .default_value("00:00")
            .help("Local time HH:MM"),
        Arg::new("tz")
            .long("tz")
            .default_value("UTC")
            .help("IANA timezone of --date/--time, e.g. Europe/Belgrade"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("greed")
        .about("Personal finance ledger: accounts, transactions, categories and stats")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("DB_URL")
                .help("SQLite database path (file:// prefix allowed)"),
        )
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("currency").long("currency").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .default_value("0")
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("description").long("description").default_value("")),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(Command::new("show").arg(id_arg()).arg(json_flag()))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("amount").long("amount").allow_hyphen_values(true))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(Command::new("count")),
        )
        .subcommand(
            Command::new("category")
                .about("Show categories")
                .subcommand(Command::new("list").arg(json_flag())),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .help("Account id, or 'id;name'"),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Signed amount: negative is an expense"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .help("Category id, or 'id;name'"),
                        )
                        .arg(Arg::new("description").long("description").default_value(""))
                        .args(when_args()),
                )
                .subcommand(
                    Command::new("list")
                        .arg(
                            Arg::new("page")
                                .long("page")
                                .value_parser(value_parser!(u64))
                                .default_value("0"),
                        )
                        .arg(
                            Arg::new("size")
                                .long("size")
                                .value_parser(value_parser!(u64))
                                .help("Page size, 0 for everything"),
                        )
                        .arg(Arg::new("search").long("search"))
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(Arg::new("expense").long("expense").action(ArgAction::SetTrue))
                        .arg(Arg::new("income").long("income").action(ArgAction::SetTrue))
                        .arg(json_flag()),
                )
                .subcommand(Command::new("show").arg(id_arg()).arg(json_flag()))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("amount").long("amount").allow_hyphen_values(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("no-category")
                                .long("no-category")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("category"),
                        )
                        .arg(Arg::new("description").long("description"))
                        .args(when_args()),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(Command::new("count")),
        )
        .subcommand(
            Command::new("stats")
                .about("Balances, cash flow and spend by category")
                .subcommand(Command::new("balance").arg(json_flag()))
                .subcommand(Command::new("cashflow").args(range_args()).arg(json_flag()))
                .subcommand(Command::new("categories").args(range_args()).arg(json_flag()))
                .subcommand(Command::new("all").args(range_args()).arg(json_flag())),
        )
        .subcommand(
            Command::new("daterange")
                .about("Show the concrete range behind a preset")
                .arg(Arg::new("preset").required(true)),
        )
}
