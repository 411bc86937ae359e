// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction mutations that keep `accounts.amount` equal to the sum of
//! the account's transactions.
//!
//! Each operation runs in one SQLite transaction opened with
//! `BEGIN IMMEDIATE`, so the write lock is held before the balance is read
//! and concurrent recalculations on the same account serialize. Any error
//! drops the `rusqlite::Transaction`, which rolls everything back, and is
//! reported as [`LedgerError::Recalc`].

use crate::error::{LedgerError, Result};
use crate::models::{Account, Category, Transaction};
use crate::money::Money;
use crate::store::{accounts, transactions};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};

fn in_unit_of_work<T>(
    conn: &mut Connection,
    op: &'static str,
    work: impl FnOnce(&rusqlite::Transaction<'_>) -> Result<T>,
) -> Result<T> {
    let run = |conn: &mut Connection| -> Result<T> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = work(&tx)?;
        tx.commit()?;
        Ok(out)
    };
    run(conn).map_err(|e| {
        log::warn!("{} rolled back: {}", op, e);
        LedgerError::Recalc {
            op,
            source: Box::new(e),
        }
    })
}

/// Re-reads the account and shifts its balance by `delta`.
fn adjust_balance(conn: &Connection, account_id: i64, delta: Money) -> Result<Account> {
    let mut account = accounts::get_account(conn, account_id)?;
    account.amount = account.amount.checked_add(delta).ok_or_else(|| {
        LedgerError::invalid_input(format!(
            "balance of account {} overflows when adding {}",
            account_id, delta
        ))
    })?;
    accounts::update_account(conn, &account)?;
    log::debug!(
        "account {} balance adjusted by {} to {}",
        account_id,
        delta,
        account.amount
    );
    Ok(account)
}

pub fn create_transaction_with_recalc(
    conn: &mut Connection,
    account: &Account,
    amount: Money,
    category: Option<&Category>,
    created_at: &DateTime<Utc>,
    description: &str,
) -> Result<Transaction> {
    in_unit_of_work(conn, "create transaction", |tx| {
        let mut created =
            transactions::create_transaction(tx, account, amount, category, created_at, description)?;
        created.account = adjust_balance(tx, created.account.id, created.amount)?;
        Ok(created)
    })
}

/// Applies `updated` over the stored row with the same id and moves the
/// balance difference. When the transaction changes account, the old
/// account gets its old amount back and the new account takes the new one.
pub fn update_transaction_with_recalc(
    conn: &mut Connection,
    updated: &Transaction,
) -> Result<usize> {
    in_unit_of_work(conn, "update transaction", |tx| {
        let old = transactions::get_transaction(tx, updated.id)?;
        let rows = transactions::update_transaction(tx, updated)?;
        if old.account.id == updated.account.id {
            let delta = updated.amount.checked_sub(old.amount).ok_or_else(|| {
                LedgerError::invalid_input(format!(
                    "amount change on transaction {} overflows",
                    updated.id
                ))
            })?;
            adjust_balance(tx, updated.account.id, delta)?;
        } else {
            adjust_balance(tx, old.account.id, -old.amount)?;
            adjust_balance(tx, updated.account.id, updated.amount)?;
        }
        Ok(rows)
    })
}

pub fn delete_transaction_with_recalc(conn: &mut Connection, id: i64) -> Result<()> {
    in_unit_of_work(conn, "delete transaction", |tx| {
        let existing = transactions::get_transaction(tx, id)?;
        transactions::delete_transaction(tx, id)?;
        adjust_balance(tx, existing.account.id, -existing.amount)?;
        Ok(())
    })
}
