// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use crate::models::{DATE_NICE_LAYOUT, DEFAULT_PAGE_SIZE, DateRange, Transaction, TransactionFilter};
use crate::query::{count_transactions, list_transactions};
use crate::recalc::{
    create_transaction_with_recalc, delete_transaction_with_recalc, update_transaction_with_recalc,
};
use crate::store::{accounts, categories, transactions};
use crate::utils::{
    maybe_print_json, parse_amount, parse_id_name, parse_local_datetime, pretty_table,
    truncate_to_second,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            delete_transaction_with_recalc(conn, id)?;
            println!("Removed transaction {}", id);
        }
        Some(("count", _)) => println!("{}", count_transactions(conn)?),
        _ => {}
    }
    Ok(())
}

/// Accepts either a bare id or the composite `id;name` form value.
pub fn parse_ref(raw: &str) -> Result<i64, LedgerError> {
    if raw.contains(';') {
        Ok(parse_id_name(raw)?.0)
    } else {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| LedgerError::invalid_input(format!("Invalid id '{}'", raw)))
    }
}

fn created_at_from(sub: &clap::ArgMatches) -> Result<Option<DateTime<Utc>>, LedgerError> {
    match sub.get_one::<String>("date") {
        Some(date) => {
            let time = sub.get_one::<String>("time").map(String::as_str).unwrap_or("00:00");
            let tz = sub.get_one::<String>("tz").map(String::as_str).unwrap_or("UTC");
            Ok(Some(parse_local_datetime(date, time, tz)?))
        }
        None => Ok(None),
    }
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    // everything is parsed before the unit of work starts
    let account_id = parse_ref(sub.get_one::<String>("account").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let category_id = sub
        .get_one::<String>("category")
        .map(|c| parse_ref(c))
        .transpose()?;
    let description = sub.get_one::<String>("description").unwrap();
    let created_at = created_at_from(sub)?.unwrap_or_else(|| truncate_to_second(&Utc::now()));

    let account = accounts::get_account(conn, account_id)?;
    let category = category_id
        .map(|id| categories::get_category(conn, id))
        .transpose()?;

    let t = create_transaction_with_recalc(
        conn,
        &account,
        amount,
        category.as_ref(),
        &created_at,
        description,
    )?;
    println!(
        "Recorded {} {} on {} (acct: {}, balance {})",
        t.amount, t.account.currency, t.created_at, t.account.name, t.account.amount
    );
    Ok(())
}

/// Builds the listing filter from `tx list` arguments.
pub fn filter_from_matches(sub: &clap::ArgMatches) -> Result<TransactionFilter, LedgerError> {
    let expense = sub.get_flag("expense");
    let income = sub.get_flag("income");
    Ok(TransactionFilter {
        page: sub.get_one::<u64>("page").copied().unwrap_or(0),
        page_size: sub.get_one::<u64>("size").copied().unwrap_or(DEFAULT_PAGE_SIZE),
        search: sub
            .get_one::<String>("search")
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        date_range: DateRange::from_input_dates(
            sub.get_one::<String>("from").map(String::as_str),
            sub.get_one::<String>("to").map(String::as_str),
        )?,
        expense_only: expense,
        income_only: income,
    })
}

fn rows(data: &[Transaction]) -> Vec<Vec<String>> {
    data.iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.created_at.format(DATE_NICE_LAYOUT).to_string(),
                t.account.name.clone(),
                t.amount.display_dp(2),
                t.account.currency.clone(),
                t.category
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "-".into()),
                t.description.clone(),
            ]
        })
        .collect()
}

const HEADERS: [&str; 7] = ["ID", "Date", "Account", "Amount", "CCY", "Category", "Description"];

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let filter = filter_from_matches(sub)?;
    let data = list_transactions(conn, &filter)?;
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        println!("{}", pretty_table(&HEADERS, rows(&data)));
        if filter.page_size > 0 && data.len() as u64 == filter.page_size {
            println!("more: {}", filter.next_page().query_params());
        }
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let t = transactions::get_transaction(conn, id)?;
    if !maybe_print_json(sub.get_flag("json"), &t)? {
        println!("{}", pretty_table(&HEADERS, rows(std::slice::from_ref(&t))));
    }
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut t = transactions::get_transaction(conn, id)?;

    if let Some(raw) = sub.get_one::<String>("account") {
        t.account = accounts::get_account(conn, parse_ref(raw)?)?;
    }
    if let Some(raw) = sub.get_one::<String>("amount") {
        t.amount = parse_amount(raw)?;
    }
    if sub.get_flag("no-category") {
        t.category = None;
    } else if let Some(raw) = sub.get_one::<String>("category") {
        t.category = Some(categories::get_category(conn, parse_ref(raw)?)?);
    }
    if let Some(description) = sub.get_one::<String>("description") {
        t.description = description.clone();
    }
    if let Some(at) = created_at_from(sub)? {
        t.created_at = at;
    }

    update_transaction_with_recalc(conn, &t)?;
    println!("Updated transaction {}", t.id);
    Ok(())
}
