// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, Result};
use crate::models::{DATE_INPUT_LAYOUT, DateRange, SignFilter, Transaction, TransactionFilter};
use crate::store::transactions::{SELECT_TRANSACTIONS, TransactionRow};
use crate::utils::{ceil_to_second, format_db_timestamp};
use chrono::Duration;
use rusqlite::Connection;
use rusqlite::types::Value;

impl TransactionFilter {
    /// The sign restriction in effect. Only a genuine mismatch between the
    /// two flags filters; both set cancel out.
    pub fn sign(&self) -> Option<SignFilter> {
        match (self.expense_only, self.income_only) {
            (true, false) => Some(SignFilter::Expense),
            (false, true) => Some(SignFilter::Income),
            _ => None,
        }
    }

    pub fn next_page(&self) -> TransactionFilter {
        TransactionFilter {
            page: self.page + 1,
            ..self.clone()
        }
    }

    /// Query string that reproduces this filter, e.g. for a "load more" link.
    /// `date_end` is written as the last included day, matching how
    /// [`DateRange::from_input_dates`] reads it back.
    pub fn query_params(&self) -> String {
        let mut params = vec![
            format!("page={}", self.page),
            format!("size={}", self.page_size),
        ];
        if !self.search.is_empty() {
            params.push(format!("search={}", urlencoding::encode(&self.search)));
        }
        if let Some(start) = self.date_range.start {
            params.push(format!("date_start={}", start.format(DATE_INPUT_LAYOUT)));
        }
        if let Some(end) = self.date_range.end {
            let last_day = end - Duration::seconds(1);
            params.push(format!("date_end={}", last_day.format(DATE_INPUT_LAYOUT)));
        }
        match self.sign() {
            Some(SignFilter::Expense) => params.push("expense=true".to_string()),
            Some(SignFilter::Income) => params.push("income=true".to_string()),
            None => {}
        }
        format!("?{}", params.join("&"))
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Appends `created_at` bounds for `range` against the column `column`.
pub(crate) fn push_date_range(
    clauses: &mut Vec<String>,
    args: &mut Vec<Value>,
    column: &str,
    range: &DateRange,
) {
    // stored timestamps share one UTC layout, so text order is time order;
    // bounds are rounded up since the layout has no fractional seconds
    if let Some(start) = range.start {
        clauses.push(format!("{} >= ?", column));
        args.push(Value::Text(format_db_timestamp(&ceil_to_second(&start))));
    }
    if let Some(end) = range.end {
        clauses.push(format!("{} < ?", column));
        args.push(Value::Text(format_db_timestamp(&ceil_to_second(&end))));
    }
}

/// Filtered page of transactions, most recent first.
///
/// The search term matches account name, category name or description as a
/// substring. Case folding is SQLite's `LIKE` folding, which covers ASCII
/// letters only: `cafe` finds `CAFE`, but `čokolada` does not find `Čokolada`.
pub fn list_transactions(conn: &Connection, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
    log::debug!("querying transactions with filter={:?}", filter);

    let mut clauses: Vec<String> = Vec::new();
    let mut args: Vec<Value> = Vec::new();

    match filter.sign() {
        Some(SignFilter::Expense) => clauses.push("CAST(t.amount AS REAL) < 0".into()),
        Some(SignFilter::Income) => clauses.push("CAST(t.amount AS REAL) >= 0".into()),
        None => {}
    }

    if !filter.search.is_empty() {
        let like = format!("%{}%", escape_like(&filter.search));
        clauses.push(
            "(a.name LIKE ? ESCAPE '\\' OR c.name LIKE ? ESCAPE '\\' OR t.description LIKE ? ESCAPE '\\')"
                .into(),
        );
        for _ in 0..3 {
            args.push(Value::Text(like.clone()));
        }
    }

    push_date_range(&mut clauses, &mut args, "t.created_at", &filter.date_range);

    let mut sql = String::from(SELECT_TRANSACTIONS);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY t.created_at DESC, t.id DESC");

    if filter.page_size > 0 {
        let offset = filter
            .page
            .checked_mul(filter.page_size)
            .and_then(|o| i64::try_from(o).ok())
            .ok_or_else(|| {
                LedgerError::invalid_input(format!(
                    "page {} of size {} is out of range",
                    filter.page, filter.page_size
                ))
            })?;
        let limit = i64::try_from(filter.page_size).map_err(|_| {
            LedgerError::invalid_input(format!("page size {} is out of range", filter.page_size))
        })?;
        sql.push_str(" LIMIT ? OFFSET ?");
        args.push(Value::Integer(limit));
        args.push(Value::Integer(offset));
    }

    log::debug!("transactions query: {}", sql);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), TransactionRow::from_row)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?.into_transaction()?);
    }
    Ok(data)
}

/// Unfiltered total.
pub fn count_transactions(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))?)
}
