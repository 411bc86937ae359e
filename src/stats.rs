// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Currency-keyed aggregates. Sums are computed with exact decimals in
//! Rust; SQL only selects and filters rows.

use crate::error::Result;
use crate::models::{
    CashFlow, Category, CategorySpend, CurrencyAmount, CurrencySpend, DateRange, Stats,
};
use crate::money::Money;
use crate::query::push_date_range;
use rusqlite::Connection;
use rusqlite::types::Value;
use std::collections::BTreeMap;

/// Sum of absolute account balances per currency, currencies ascending.
pub fn get_balance(conn: &Connection) -> Result<Vec<CurrencyAmount>> {
    let mut stmt = conn.prepare("SELECT currency, amount FROM accounts ORDER BY id")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;

    let mut totals: BTreeMap<String, Money> = BTreeMap::new();
    for row in rows {
        let (ccy, raw) = row?;
        let amount = Money::from_db("accounts.amount", &raw)?;
        *totals.entry(ccy).or_insert(Money::ZERO) += amount.abs();
    }
    Ok(totals
        .into_iter()
        .map(|(currency, amount)| CurrencyAmount { currency, amount })
        .collect())
}

/// Net signed flow per account currency inside `range`, reported as a
/// magnitude plus direction. Currencies ascending.
pub fn get_cash_flow(conn: &Connection, range: &DateRange) -> Result<Vec<CashFlow>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut args: Vec<Value> = Vec::new();
    push_date_range(&mut clauses, &mut args, "t.created_at", range);

    let mut sql = String::from(
        "SELECT a.currency, t.amount FROM transactions t JOIN accounts a ON a.id=t.account_id",
    );
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    log::debug!("cash flow query: {}", sql);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;

    let mut flows: BTreeMap<String, Money> = BTreeMap::new();
    for row in rows {
        let (ccy, raw) = row?;
        *flows.entry(ccy).or_insert(Money::ZERO) += Money::from_db("transactions.amount", &raw)?;
    }
    Ok(flows
        .into_iter()
        .map(|(currency, net)| CashFlow {
            positive: !net.is_expense(),
            value: CurrencyAmount {
                currency,
                amount: net.abs(),
            },
        })
        .collect())
}

/// Expense totals per (currency, category). Currencies ascending; inside a
/// currency, categories by spend descending, ties kept in category id order.
/// Uncategorized expenses are left out rather than attributed to a category.
pub fn get_expenses_by_category(
    conn: &Connection,
    range: &DateRange,
) -> Result<Vec<CurrencySpend>> {
    let mut clauses: Vec<String> = vec!["CAST(t.amount AS REAL) < 0".to_string()];
    let mut args: Vec<Value> = Vec::new();
    push_date_range(&mut clauses, &mut args, "t.created_at", range);

    let sql = format!(
        "SELECT c.id, c.name, a.currency, t.amount
         FROM transactions t
         JOIN categories c ON c.id=t.category_id
         JOIN accounts a ON a.id=t.account_id
         WHERE {}
         ORDER BY a.currency ASC, c.id ASC, t.id ASC",
        clauses.join(" AND ")
    );
    log::debug!("categories spent query: {}", sql);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;

    let mut buckets: BTreeMap<String, Vec<CategorySpend>> = BTreeMap::new();
    for row in rows {
        let (cat_id, cat_name, ccy, raw) = row?;
        let spent = Money::from_db("transactions.amount", &raw)?.abs();
        let bucket = buckets.entry(ccy.clone()).or_default();
        match bucket.iter_mut().find(|s| s.category.id == cat_id) {
            Some(existing) => existing.value.amount += spent,
            None => bucket.push(CategorySpend {
                category: Category {
                    id: cat_id,
                    name: cat_name,
                },
                value: CurrencyAmount {
                    currency: ccy,
                    amount: spent,
                },
            }),
        }
    }

    Ok(buckets
        .into_iter()
        .map(|(currency, mut categories)| {
            // stable: equal totals keep their relative order
            categories.sort_by(|a, b| b.value.amount.cmp(&a.value.amount));
            CurrencySpend {
                currency,
                categories,
            }
        })
        .collect())
}

/// Everything the statistics view shows for one range.
pub fn get_stats(conn: &Connection, range: &DateRange) -> Result<Stats> {
    Ok(Stats {
        balance: get_balance(conn)?,
        cash_flow: get_cash_flow(conn, range)?,
        categories_spent: get_expenses_by_category(conn, range)?,
    })
}
