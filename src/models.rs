// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored timestamp layout, always written in UTC.
pub const DATETIME_DB_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%:z";
pub const DATE_INPUT_LAYOUT: &str = "%Y-%m-%d";
pub const DATETIME_INPUT_LAYOUT: &str = "%Y-%m-%d %H:%M";
pub const DATE_NICE_LAYOUT: &str = "%d-%m-%Y";

pub const DEFAULT_PAGE_SIZE: u64 = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub amount: Money, // current balance
    pub currency: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account: Account,
    pub amount: Money,
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub description: String,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.amount.is_expense()
    }
}

/// Half-open interval `[start, end)`. `None` leaves that side unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        DateRange {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn unbounded() -> Self {
        DateRange::default()
    }

    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| *at >= s) && self.end.is_none_or(|e| *at < e)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub page: u64,
    /// 0 disables paging and returns every matching row.
    pub page_size: u64,
    pub search: String,
    pub date_range: DateRange,
    pub expense_only: bool,
    pub income_only: bool,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        TransactionFilter {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            date_range: DateRange::unbounded(),
            expense_only: false,
            income_only: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignFilter {
    Expense,
    Income,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub value: CurrencyAmount, // magnitude
    pub positive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: Category,
    pub value: CurrencyAmount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySpend {
    pub currency: String,
    pub categories: Vec<CategorySpend>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub balance: Vec<CurrencyAmount>,
    pub cash_flow: Vec<CashFlow>,
    pub categories_spent: Vec<CurrencySpend>,
}
