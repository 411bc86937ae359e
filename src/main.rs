// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use greed::{cli, commands, db};

fn main() -> Result<()> {
    env_logger::init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_arg = matches.get_one::<String>("db").map(String::as_str);
    let mut conn = db::open_or_init(db_arg)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path(db_arg)?.display());
        }
        Some(("account", sub)) => commands::accounts::handle(&conn, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut conn, sub)?,
        Some(("stats", sub)) => commands::stats::handle(&conn, sub)?,
        Some(("daterange", sub)) => commands::daterange::handle(sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
