// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::expect_single_row;
use crate::error::{LedgerError, Result};
use crate::models::{Account, Category, Transaction};
use crate::money::Money;
use crate::utils::{format_db_timestamp, parse_db_timestamp};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Transactions joined with their account and (optional) category.
pub(crate) const SELECT_TRANSACTIONS: &str = "SELECT t.id, t.amount, t.created_at, t.description, \
     a.id, a.name, a.amount, a.currency, a.description, c.id, c.name \
     FROM transactions t \
     JOIN accounts a ON t.account_id=a.id \
     LEFT JOIN categories c ON t.category_id=c.id";

/// Raw joined row; decimal and timestamp columns are parsed afterwards so
/// a malformed value surfaces as corruption rather than a driver error.
pub(crate) struct TransactionRow {
    id: i64,
    amount: String,
    created_at: String,
    description: String,
    account_id: i64,
    account_name: String,
    account_amount: String,
    account_currency: String,
    account_description: String,
    category_id: Option<i64>,
    category_name: Option<String>,
}

impl TransactionRow {
    pub(crate) fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(TransactionRow {
            id: r.get(0)?,
            amount: r.get(1)?,
            created_at: r.get(2)?,
            description: r.get(3)?,
            account_id: r.get(4)?,
            account_name: r.get(5)?,
            account_amount: r.get(6)?,
            account_currency: r.get(7)?,
            account_description: r.get(8)?,
            category_id: r.get(9)?,
            category_name: r.get(10)?,
        })
    }

    pub(crate) fn into_transaction(self) -> Result<Transaction> {
        let category = match (self.category_id, self.category_name) {
            (Some(id), Some(name)) => Some(Category { id, name }),
            _ => None,
        };
        Ok(Transaction {
            id: self.id,
            account: Account {
                id: self.account_id,
                name: self.account_name,
                amount: Money::from_db("accounts.amount", &self.account_amount)?,
                currency: self.account_currency,
                description: self.account_description,
            },
            amount: Money::from_db("transactions.amount", &self.amount)?,
            category,
            created_at: parse_db_timestamp(&self.created_at)?,
            description: self.description,
        })
    }
}

/// Inserts the row only; the account balance is left untouched.
pub(crate) fn create_transaction(
    conn: &Connection,
    account: &Account,
    amount: Money,
    category: Option<&Category>,
    created_at: &DateTime<Utc>,
    description: &str,
) -> Result<Transaction> {
    conn.execute(
        "INSERT INTO transactions(account_id, amount, category_id, created_at, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            account.id,
            amount,
            category.map(|c| c.id),
            format_db_timestamp(created_at),
            description
        ],
    )?;
    let id = conn.last_insert_rowid();
    log::debug!("inserted transaction {} ({} on account {})", id, amount, account.id);
    get_transaction(conn, id)
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    let sql = format!("{} WHERE t.id=?1", SELECT_TRANSACTIONS);
    let row = conn
        .query_row(&sql, params![id], TransactionRow::from_row)
        .optional()?;
    row.ok_or_else(|| LedgerError::not_found("transaction", id))?
        .into_transaction()
}

pub(crate) fn update_transaction(conn: &Connection, transaction: &Transaction) -> Result<usize> {
    let affected = conn.execute(
        "UPDATE transactions SET account_id=?1, amount=?2, category_id=?3, created_at=?4, description=?5
         WHERE id=?6",
        params![
            transaction.account.id,
            transaction.amount,
            transaction.category.as_ref().map(|c| c.id),
            format_db_timestamp(&transaction.created_at),
            transaction.description,
            transaction.id
        ],
    )?;
    expect_single_row(affected, "transaction", "update", transaction.id)
}

pub(crate) fn delete_transaction(conn: &Connection, id: i64) -> Result<()> {
    let affected = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    expect_single_row(affected, "transaction", "delete", id)?;
    Ok(())
}
