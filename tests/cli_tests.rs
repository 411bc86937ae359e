// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Datelike, Timelike, Utc};
use greed::cli::build_cli;
use greed::commands::stats::range_from_matches;
use greed::commands::transactions::{filter_from_matches, parse_ref};
use greed::models::{DEFAULT_PAGE_SIZE, SignFilter};
use greed::utils::{parse_id_name, parse_local_datetime};
use greed::{LedgerError, Money};

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn tx_list(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["greed", "tx", "list"];
    argv.extend_from_slice(args);
    let m = build_cli().get_matches_from(argv);
    let (_, tx) = m.subcommand().unwrap();
    tx.subcommand_matches("list").unwrap().clone()
}

fn stats_cashflow(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["greed", "stats", "cashflow"];
    argv.extend_from_slice(args);
    let m = build_cli().get_matches_from(argv);
    let (_, stats) = m.subcommand().unwrap();
    stats.subcommand_matches("cashflow").unwrap().clone()
}

#[test]
fn list_defaults() {
    let filter = filter_from_matches(&tx_list(&[])).unwrap();
    assert_eq!(filter.page, 0);
    assert_eq!(filter.page_size, DEFAULT_PAGE_SIZE);
    assert!(filter.search.is_empty());
    assert_eq!(filter.date_range.start, None);
    assert_eq!(filter.date_range.end, None);
    assert_eq!(filter.sign(), None);
}

#[test]
fn list_arguments_map_onto_filter() {
    let filter = filter_from_matches(&tx_list(&[
        "--page", "2", "--size", "0", "--search", "  coffee ", "--from", "2024-01-01", "--to",
        "2024-01-31", "--expense",
    ]))
    .unwrap();
    assert_eq!(filter.page, 2);
    assert_eq!(filter.page_size, 0);
    assert_eq!(filter.search, "coffee");
    assert_eq!(filter.date_range.start, Some(at("2024-01-01T00:00:00Z")));
    assert_eq!(filter.date_range.end, Some(at("2024-02-01T00:00:00Z")));
    assert_eq!(filter.sign(), Some(SignFilter::Expense));
}

#[test]
fn both_sign_flags_cancel_out() {
    let filter = filter_from_matches(&tx_list(&["--expense", "--income"])).unwrap();
    assert!(filter.expense_only && filter.income_only);
    assert_eq!(filter.sign(), None);
}

#[test]
fn bad_list_date_is_invalid_input() {
    let err = filter_from_matches(&tx_list(&["--from", "01/02/2024"])).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
}

#[test]
fn explicit_dates_override_preset() {
    let range = range_from_matches(&stats_cashflow(&[
        "--range", "custom", "--from", "2024-01-01", "--to", "2024-01-31",
    ]))
    .unwrap();
    assert_eq!(range.start, Some(at("2024-01-01T00:00:00Z")));
    assert_eq!(range.end, Some(at("2024-02-01T00:00:00Z")));
}

#[test]
fn one_explicit_end_keeps_the_other_from_preset() {
    let range = range_from_matches(&stats_cashflow(&["--range", "this_year", "--to", "2030-12-31"]))
        .unwrap();
    let start = range.start.unwrap();
    assert_eq!((start.month(), start.day(), start.hour()), (1, 1, 0));
    assert_eq!(range.end, Some(at("2031-01-01T00:00:00Z")));
}

#[test]
fn unknown_range_preset_fails() {
    let err = range_from_matches(&stats_cashflow(&["--range", "none"])).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidPreset(_)));
}

#[test]
fn references_accept_id_or_composite() {
    assert_eq!(parse_ref("7").unwrap(), 7);
    assert_eq!(parse_ref(" 7 ").unwrap(), 7);
    assert_eq!(parse_ref("3;Visa Card").unwrap(), 3);
    assert!(parse_ref("Visa Card").is_err());
    assert!(parse_ref("x;Visa Card").is_err());
}

#[test]
fn composite_keeps_name_with_semicolons() {
    let (id, name) = parse_id_name("4;Food; drinks").unwrap();
    assert_eq!(id, 4);
    assert_eq!(name, "Food; drinks");
    assert!(parse_id_name("4").is_err());
}

#[test]
fn local_time_is_normalized_to_utc() {
    // CET in winter, CEST in summer
    let winter = parse_local_datetime("2024-03-01", "09:30", "Europe/Belgrade").unwrap();
    assert_eq!(winter, at("2024-03-01T08:30:00Z"));
    let summer = parse_local_datetime("2024-07-01", "09:30", "Europe/Belgrade").unwrap();
    assert_eq!(summer, at("2024-07-01T07:30:00Z"));
    assert!(parse_local_datetime("2024-03-01", "09:30", "Mars/Olympus").is_err());
    assert!(parse_local_datetime("2024-03-01", "9h30", "UTC").is_err());
}

#[test]
fn skipped_local_time_is_rejected() {
    // clocks jump from 02:00 to 03:00 on this night
    assert!(parse_local_datetime("2024-03-31", "02:30", "Europe/Belgrade").is_err());
}

#[test]
fn negative_amount_argument_is_accepted() {
    let m = build_cli().get_matches_from([
        "greed", "tx", "add", "--account", "1", "--amount", "-12.50",
    ]);
    let add = m
        .subcommand_matches("tx")
        .and_then(|tx| tx.subcommand_matches("add"))
        .unwrap();
    let amount: Money = add.get_one::<String>("amount").unwrap().parse().unwrap();
    assert!(amount.is_expense());
    assert_eq!(add.get_one::<String>("tz").unwrap(), "UTC");
}

#[test]
fn add_without_date_records_whole_second_now() {
    let mut conn = greed::db::open_in_memory().unwrap();
    let cash = greed::store::accounts::create_account(&conn, "Cash", Money::ZERO, "EUR", "")
        .unwrap();
    let id = cash.id.to_string();
    let before = greed::utils::truncate_to_second(&Utc::now());
    let m = build_cli().get_matches_from([
        "greed", "tx", "add", "--account", id.as_str(), "--amount", "-1.25",
    ]);
    greed::commands::transactions::handle(&mut conn, m.subcommand_matches("tx").unwrap())
        .unwrap();

    let listed = greed::query::list_transactions(&conn, &Default::default()).unwrap();
    assert_eq!(listed.len(), 1);
    let created_at = listed[0].created_at;
    assert_eq!(created_at.nanosecond(), 0);
    assert!(created_at >= before && created_at <= Utc::now());

    // ranges ending at a sub-second "now" still see it
    let range = greed::models::DateRange::new(before, Utc::now() + chrono::Duration::milliseconds(1));
    assert!(range.contains(&created_at));
    let flows = greed::stats::get_cash_flow(&conn, &range).unwrap();
    assert_eq!(flows[0].value.amount.to_string(), "1.25");
}

#[test]
fn whole_second_helpers() {
    let stored = at("2024-01-01T12:00:00Z");
    let later = stored + chrono::Duration::milliseconds(500);
    assert_eq!(greed::utils::truncate_to_second(&later), stored);
    assert_eq!(greed::utils::ceil_to_second(&later), at("2024-01-01T12:00:01Z"));
    assert_eq!(greed::utils::ceil_to_second(&stored), stored);
}
