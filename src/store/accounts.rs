// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::expect_single_row;
use crate::error::{LedgerError, Result};
use crate::models::Account;
use crate::money::Money;
use rusqlite::{Connection, OptionalExtension, Row, params};

const ACCOUNT_COLUMNS: &str = "id, name, amount, currency, description";

struct AccountRow {
    id: i64,
    name: String,
    amount: String,
    currency: String,
    description: String,
}

impl AccountRow {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(AccountRow {
            id: r.get(0)?,
            name: r.get(1)?,
            amount: r.get(2)?,
            currency: r.get(3)?,
            description: r.get(4)?,
        })
    }

    fn into_account(self) -> Result<Account> {
        Ok(Account {
            id: self.id,
            name: self.name,
            amount: Money::from_db("accounts.amount", &self.amount)?,
            currency: self.currency,
            description: self.description,
        })
    }
}

pub fn create_account(
    conn: &Connection,
    name: &str,
    amount: Money,
    currency: &str,
    description: &str,
) -> Result<Account> {
    conn.execute(
        "INSERT INTO accounts(name, amount, currency, description) VALUES (?1, ?2, ?3, ?4)",
        params![name, amount, currency, description],
    )?;
    let id = conn.last_insert_rowid();
    log::debug!("created account {} '{}' ({} {})", id, name, amount, currency);
    Ok(Account {
        id,
        name: name.to_string(),
        amount,
        currency: currency.to_string(),
        description: description.to_string(),
    })
}

pub fn get_account(conn: &Connection, id: i64) -> Result<Account> {
    let sql = format!("SELECT {} FROM accounts WHERE id=?1", ACCOUNT_COLUMNS);
    let row = conn
        .query_row(&sql, params![id], AccountRow::from_row)
        .optional()?;
    row.ok_or_else(|| LedgerError::not_found("account", id))?
        .into_account()
}

/// All accounts in insertion order.
pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let sql = format!("SELECT {} FROM accounts ORDER BY id", ACCOUNT_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], AccountRow::from_row)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?.into_account()?);
    }
    Ok(data)
}

pub fn count_accounts(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM accounts", [], |r| r.get(0))?)
}

pub fn update_account(conn: &Connection, account: &Account) -> Result<usize> {
    let affected = conn.execute(
        "UPDATE accounts SET name=?1, amount=?2, currency=?3, description=?4 WHERE id=?5",
        params![
            account.name,
            account.amount,
            account.currency,
            account.description,
            account.id
        ],
    )?;
    expect_single_row(affected, "account", "update", account.id)
}

/// Deletes an account. Refused while any transaction still points at it,
/// otherwise those transactions would reference a missing account.
pub fn delete_account(conn: &Connection, id: i64) -> Result<()> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE account_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    if count > 0 {
        return Err(LedgerError::AccountInUse { id, count });
    }
    let affected = conn.execute("DELETE FROM accounts WHERE id=?1", params![id])?;
    expect_single_row(affected, "account", "delete", id)?;
    log::debug!("deleted account {}", id);
    Ok(())
}
