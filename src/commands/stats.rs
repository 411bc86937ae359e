// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::daterange::DateRangePreset;
use crate::error::LedgerError;
use crate::models::{CashFlow, CurrencyAmount, CurrencySpend, DateRange};
use crate::stats::{get_balance, get_cash_flow, get_expenses_by_category, get_stats};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balance", sub)) => {
            let data = get_balance(conn)?;
            if !maybe_print_json(sub.get_flag("json"), &data)? {
                print_balance(&data);
            }
        }
        Some(("cashflow", sub)) => {
            let data = get_cash_flow(conn, &range_from_matches(sub)?)?;
            if !maybe_print_json(sub.get_flag("json"), &data)? {
                print_cash_flow(&data);
            }
        }
        Some(("categories", sub)) => {
            let data = get_expenses_by_category(conn, &range_from_matches(sub)?)?;
            if !maybe_print_json(sub.get_flag("json"), &data)? {
                print_categories(&data);
            }
        }
        Some(("all", sub)) => {
            let stats = get_stats(conn, &range_from_matches(sub)?)?;
            if !maybe_print_json(sub.get_flag("json"), &stats)? {
                print_balance(&stats.balance);
                print_cash_flow(&stats.cash_flow);
                print_categories(&stats.categories_spent);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Explicit `--from/--to` dates win over the preset; either one given
/// replaces only its own end of the preset range.
pub fn range_from_matches(sub: &clap::ArgMatches) -> Result<DateRange, LedgerError> {
    let preset: DateRangePreset = sub
        .get_one::<String>("range")
        .map(String::as_str)
        .unwrap_or("this_month")
        .parse()?;
    let mut range = preset.resolve(Utc::now());
    let explicit = DateRange::from_input_dates(
        sub.get_one::<String>("from").map(String::as_str),
        sub.get_one::<String>("to").map(String::as_str),
    )?;
    if explicit.start.is_some() {
        range.start = explicit.start;
    }
    if explicit.end.is_some() {
        range.end = explicit.end;
    }
    Ok(range)
}

fn print_balance(data: &[CurrencyAmount]) {
    let rows = data
        .iter()
        .map(|b| vec![b.currency.clone(), b.amount.display_dp(2)])
        .collect();
    println!("{}", pretty_table(&["CCY", "Balance"], rows));
}

fn print_cash_flow(data: &[CashFlow]) {
    let rows = data
        .iter()
        .map(|f| {
            let sign = if f.positive { "+" } else { "-" };
            vec![
                f.value.currency.clone(),
                format!("{}{}", sign, f.value.amount.display_dp(2)),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["CCY", "Cash flow"], rows));
}

fn print_categories(data: &[CurrencySpend]) {
    let mut rows = Vec::new();
    for bucket in data {
        for spend in &bucket.categories {
            rows.push(vec![
                bucket.currency.clone(),
                spend.category.name.clone(),
                spend.value.amount.display_dp(2),
            ]);
        }
    }
    println!("{}", pretty_table(&["CCY", "Category", "Spent"], rows));
}
