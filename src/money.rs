// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Signed exact-decimal money.
//!
//! Positive amounts are income, negative amounts are expenses. Values are
//! persisted as their exact decimal string and never pass through `f64`.

use crate::error::{LedgerError, Result};
use rusqlite::types::{ToSql, ToSqlOutput, Value};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        let mut amount = amount;
        // "-0.00" must never reach storage
        if amount.is_zero() {
            amount.set_sign_positive(true);
        }
        Money(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_expense(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_income(&self) -> bool {
        !self.is_expense()
    }

    pub fn abs(&self) -> Money {
        Money::new(self.0.abs())
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money::new)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money::new)
    }

    /// Parses a value read back from storage. Anything that is not an exact
    /// decimal string is treated as corruption, not as bad user input.
    pub fn from_db(column: &'static str, raw: &str) -> Result<Money> {
        Decimal::from_str(raw)
            .map(Money::new)
            .map_err(|_| LedgerError::CorruptData {
                column,
                value: raw.to_string(),
            })
    }

    /// Rounded for display; storage keeps full precision.
    pub fn display_dp(&self, dp: u32) -> String {
        format!("{:.*}", dp as usize, self.0.round_dp(dp))
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::new(d)
    }
}

impl From<i64> for Money {
    fn from(v: i64) -> Self {
        Money::new(Decimal::from(v))
    }
}

impl FromStr for Money {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::invalid_input("empty amount"));
        }
        Decimal::from_str(trimmed)
            .map(Money::new)
            .map_err(|e| LedgerError::invalid_input(format!("Invalid amount '{}': {}", s, e)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::new(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money::new(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money::new(-self.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(Value::Text(self.0.to_string())))
    }
}
