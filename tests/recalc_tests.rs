// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use greed::models::{Account, Category, TransactionFilter};
use greed::query::{count_transactions, list_transactions};
use greed::recalc::{
    create_transaction_with_recalc, delete_transaction_with_recalc, update_transaction_with_recalc,
};
use greed::store::{accounts, categories, transactions};
use greed::{LedgerError, Money, db};
use rusqlite::Connection;
use std::thread;
use tempfile::tempdir;

fn setup() -> Connection {
    db::open_in_memory().unwrap()
}

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn groceries(conn: &Connection) -> Category {
    categories::list_categories(conn)
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Groceries")
        .unwrap()
}

fn balance(conn: &Connection, account: &Account) -> Money {
    accounts::get_account(conn, account.id).unwrap().amount
}

fn assert_invariant(conn: &Connection) {
    let all = list_transactions(
        conn,
        &TransactionFilter {
            page_size: 0,
            ..Default::default()
        },
    )
    .unwrap();
    for account in accounts::list_accounts(conn).unwrap() {
        let sum: Money = all
            .iter()
            .filter(|t| t.account.id == account.id)
            .map(|t| t.amount)
            .sum();
        assert_eq!(account.amount, sum, "account {} out of sync", account.name);
    }
}

fn install_failing_balance_write(conn: &Connection) {
    conn.execute_batch(
        "CREATE TRIGGER fail_balance BEFORE UPDATE OF amount ON accounts
         BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
    )
    .unwrap();
}

#[test]
fn end_to_end_create_update_delete() {
    let mut conn = setup();
    let a = accounts::create_account(&conn, "A", money("0"), "USD", "").unwrap();
    let cat = groceries(&conn);

    let t = create_transaction_with_recalc(
        &mut conn,
        &a,
        money("-25.00"),
        Some(&cat),
        &at("2024-02-10T12:00:00Z"),
        "weekly shop",
    )
    .unwrap();
    assert_eq!(balance(&conn, &a), money("-25.00"));
    assert_eq!(t.account.amount, money("-25.00"));
    assert_eq!(t.category.as_ref().map(|c| c.name.as_str()), Some("Groceries"));

    let mut edited = transactions::get_transaction(&conn, t.id).unwrap();
    edited.amount = money("-40.00");
    assert_eq!(update_transaction_with_recalc(&mut conn, &edited).unwrap(), 1);
    assert_eq!(balance(&conn, &a), money("-40.00"));

    delete_transaction_with_recalc(&mut conn, t.id).unwrap();
    assert_eq!(balance(&conn, &a).to_string(), "0.00");
    assert_eq!(count_transactions(&conn).unwrap(), 0);
}

#[test]
fn round_trip_keeps_exact_balance() {
    let mut conn = setup();
    let a = accounts::create_account(&conn, "test account", money("420.69"), "USD", "").unwrap();
    let t = create_transaction_with_recalc(&mut conn, &a, money("123.12"), None, &at("2024-01-01T00:00:00Z"), "")
        .unwrap();
    create_transaction_with_recalc(&mut conn, &a, money("-123.12"), None, &at("2024-01-02T00:00:00Z"), "")
        .unwrap();
    assert_eq!(balance(&conn, &a).to_string(), "420.69");

    // finer precision than the balance still compares exactly
    let mut e = transactions::get_transaction(&conn, t.id).unwrap();
    e.amount = money("123.123");
    update_transaction_with_recalc(&mut conn, &e).unwrap();
    assert_eq!(balance(&conn, &a), money("420.693"));
}

#[test]
fn reassigning_account_moves_the_amount() {
    let mut conn = setup();
    let a = accounts::create_account(&conn, "A", Money::ZERO, "USD", "").unwrap();
    let b = accounts::create_account(&conn, "B", Money::ZERO, "USD", "").unwrap();
    let t = create_transaction_with_recalc(&mut conn, &a, money("-25"), None, &at("2024-01-01T00:00:00Z"), "")
        .unwrap();

    let mut moved = t.clone();
    moved.account = accounts::get_account(&conn, b.id).unwrap();
    moved.amount = money("-40");
    update_transaction_with_recalc(&mut conn, &moved).unwrap();

    assert_eq!(balance(&conn, &a), Money::ZERO);
    assert_eq!(balance(&conn, &b), money("-40"));
    assert_invariant(&conn);
}

#[test]
fn invariant_holds_across_interleaved_operations() {
    let mut conn = setup();
    let a = accounts::create_account(&conn, "Visa Card", Money::ZERO, "RSD", "").unwrap();
    let b = accounts::create_account(&conn, "Cash", Money::ZERO, "EUR", "").unwrap();
    let cat = groceries(&conn);

    let t1 = create_transaction_with_recalc(&mut conn, &a, money("-100"), Some(&cat), &at("2024-01-01T08:00:00Z"), "")
        .unwrap();
    let t2 = create_transaction_with_recalc(&mut conn, &b, money("50"), None, &at("2024-01-01T09:00:00Z"), "")
        .unwrap();
    let _t3 = create_transaction_with_recalc(&mut conn, &a, money("-210.55"), Some(&cat), &at("2024-01-02T08:00:00Z"), "")
        .unwrap();
    assert_invariant(&conn);

    let mut e = transactions::get_transaction(&conn, t2.id).unwrap();
    e.amount = money("75");
    e.category = Some(cat.clone());
    update_transaction_with_recalc(&mut conn, &e).unwrap();
    assert_invariant(&conn);

    let mut e = transactions::get_transaction(&conn, t1.id).unwrap();
    e.account = accounts::get_account(&conn, b.id).unwrap();
    update_transaction_with_recalc(&mut conn, &e).unwrap();
    assert_invariant(&conn);

    delete_transaction_with_recalc(&mut conn, t2.id).unwrap();
    assert_invariant(&conn);
    assert_eq!(balance(&conn, &a), money("-210.55"));
    assert_eq!(balance(&conn, &b), money("-100"));
}

#[test]
fn failed_balance_write_discards_created_row() {
    let mut conn = setup();
    let a = accounts::create_account(&conn, "A", money("10"), "USD", "").unwrap();
    install_failing_balance_write(&conn);

    let err = create_transaction_with_recalc(&mut conn, &a, money("-3"), None, &at("2024-01-01T00:00:00Z"), "")
        .unwrap_err();
    assert!(matches!(err, LedgerError::Recalc { op: "create transaction", .. }));
    assert!(matches!(err.root_cause(), LedgerError::Persistence(_)));
    assert_eq!(count_transactions(&conn).unwrap(), 0);
    assert_eq!(balance(&conn, &a), money("10"));
}

#[test]
fn failed_balance_write_discards_update() {
    let mut conn = setup();
    let a = accounts::create_account(&conn, "A", Money::ZERO, "USD", "").unwrap();
    let t = create_transaction_with_recalc(&mut conn, &a, money("-3"), None, &at("2024-01-01T00:00:00Z"), "old")
        .unwrap();
    install_failing_balance_write(&conn);

    let mut e = t.clone();
    e.amount = money("-9");
    e.description = "new".into();
    assert!(update_transaction_with_recalc(&mut conn, &e).is_err());

    let stored = transactions::get_transaction(&conn, t.id).unwrap();
    assert_eq!(stored.amount, money("-3"));
    assert_eq!(stored.description, "old");
    assert_eq!(balance(&conn, &a), money("-3"));
}

#[test]
fn failed_balance_write_discards_delete() {
    let mut conn = setup();
    let a = accounts::create_account(&conn, "A", Money::ZERO, "USD", "").unwrap();
    let t = create_transaction_with_recalc(&mut conn, &a, money("-3"), None, &at("2024-01-01T00:00:00Z"), "")
        .unwrap();
    install_failing_balance_write(&conn);

    assert!(delete_transaction_with_recalc(&mut conn, t.id).is_err());
    assert!(transactions::get_transaction(&conn, t.id).is_ok());
    assert_eq!(balance(&conn, &a), money("-3"));
}

#[test]
fn missing_rows_surface_as_not_found() {
    let mut conn = setup();
    let err = delete_transaction_with_recalc(&mut conn, 42).unwrap_err();
    assert!(err.is_not_found());

    let a = accounts::create_account(&conn, "A", Money::ZERO, "USD", "").unwrap();
    let t = create_transaction_with_recalc(&mut conn, &a, money("1"), None, &at("2024-01-01T00:00:00Z"), "")
        .unwrap();
    let mut ghost = t.clone();
    ghost.id = 999;
    assert!(update_transaction_with_recalc(&mut conn, &ghost).unwrap_err().is_not_found());
    assert_eq!(balance(&conn, &a), money("1"));
}

#[test]
fn unknown_account_rolls_back_create() {
    let mut conn = setup();
    let ghost = Account {
        id: 77,
        name: "ghost".into(),
        amount: Money::ZERO,
        currency: "USD".into(),
        description: String::new(),
    };
    let err = create_transaction_with_recalc(&mut conn, &ghost, money("1"), None, &at("2024-01-01T00:00:00Z"), "")
        .unwrap_err();
    assert!(matches!(err, LedgerError::Recalc { .. }));
    assert_eq!(count_transactions(&conn).unwrap(), 0);
}

#[test]
fn concurrent_creates_do_not_lose_updates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("greed.sqlite");
    let conn = db::open(&path).unwrap();
    let account = accounts::create_account(&conn, "Shared", Money::ZERO, "USD", "").unwrap();

    let workers = 8;
    let per_worker = 10;
    let mut conns = Vec::new();
    for _ in 0..workers {
        conns.push(db::open(&path).unwrap());
    }

    let handles: Vec<_> = conns
        .into_iter()
        .enumerate()
        .map(|(w, mut c)| {
            let account = account.clone();
            thread::spawn(move || {
                for i in 0..per_worker {
                    let when = at("2024-01-01T00:00:00Z") + chrono::Duration::minutes((w * 100 + i) as i64);
                    create_transaction_with_recalc(&mut c, &account, money("-1.50"), None, &when, "")
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(count_transactions(&conn).unwrap(), (workers * per_worker) as i64);
    assert_eq!(balance(&conn, &account), money("-120.00"));
    assert_invariant(&conn);
}
