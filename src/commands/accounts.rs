// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Account;
use crate::store::accounts;
use crate::utils::{maybe_print_json, parse_amount, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            accounts::delete_account(conn, id)
                .with_context(|| format!("Remove account {}", id))?;
            println!("Removed account {}", id);
        }
        Some(("count", _)) => println!("{}", accounts::count_accounts(conn)?),
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    let ccy = sub.get_one::<String>("currency").unwrap().trim().to_uppercase();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap();
    let account = accounts::create_account(conn, name, amount, &ccy, description)?;
    println!(
        "Added account {} '{}' ({} {})",
        account.id, account.name, account.amount, account.currency
    );
    Ok(())
}

fn rows(data: &[Account]) -> Vec<Vec<String>> {
    data.iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.name.clone(),
                a.amount.display_dp(2),
                a.currency.clone(),
                a.description.clone(),
            ]
        })
        .collect()
}

const HEADERS: [&str; 5] = ["ID", "Name", "Balance", "CCY", "Description"];

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = accounts::list_accounts(conn)?;
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        println!("{}", pretty_table(&HEADERS, rows(&data)));
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let account = accounts::get_account(conn, id)?;
    if !maybe_print_json(sub.get_flag("json"), &account)? {
        println!("{}", pretty_table(&HEADERS, rows(std::slice::from_ref(&account))));
    }
    Ok(())
}

/// Direct edit; setting the balance here bypasses transaction history.
fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut account = accounts::get_account(conn, id)?;
    if let Some(name) = sub.get_one::<String>("name") {
        account.name = name.trim().to_string();
    }
    if let Some(ccy) = sub.get_one::<String>("currency") {
        account.currency = ccy.trim().to_uppercase();
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        account.amount = parse_amount(amount)?;
    }
    if let Some(description) = sub.get_one::<String>("description") {
        account.description = description.clone();
    }
    accounts::update_account(conn, &account)?;
    println!("Updated account {} '{}'", account.id, account.name);
    Ok(())
}
