// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, Result};
use crate::models::DateRange;
use crate::utils::start_of_day;
use chrono::{DateTime, Datelike, Days, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named ranges offered by the date filter picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateRangePreset {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "this_week")]
    ThisWeek,
    #[serde(rename = "this_month")]
    ThisMonth,
    #[serde(rename = "this_year")]
    ThisYear,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
    #[serde(rename = "custom")]
    Custom,
}

impl DateRangePreset {
    pub const ALL: [DateRangePreset; 7] = [
        DateRangePreset::Today,
        DateRangePreset::ThisWeek,
        DateRangePreset::ThisMonth,
        DateRangePreset::ThisYear,
        DateRangePreset::Last7Days,
        DateRangePreset::Last30Days,
        DateRangePreset::Custom,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DateRangePreset::Today => "today",
            DateRangePreset::ThisWeek => "this_week",
            DateRangePreset::ThisMonth => "this_month",
            DateRangePreset::ThisYear => "this_year",
            DateRangePreset::Last7Days => "last_7_days",
            DateRangePreset::Last30Days => "last_30_days",
            DateRangePreset::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateRangePreset::Today => "today",
            DateRangePreset::ThisWeek => "this week",
            DateRangePreset::ThisMonth => "this month",
            DateRangePreset::ThisYear => "this year",
            DateRangePreset::Last7Days => "last 7 days",
            DateRangePreset::Last30Days => "last 30 days",
            DateRangePreset::Custom => "custom",
        }
    }

    /// Only `Custom` lets the user type both ends.
    pub fn accepts_free_input(&self) -> bool {
        matches!(self, DateRangePreset::Custom)
    }

    /// Concrete range relative to `now`, in UTC. `Today` and `Custom` give
    /// the degenerate `(now, now)`; for `Custom` the caller replaces both ends.
    pub fn resolve(&self, now: DateTime<Utc>) -> DateRange {
        let days_back = |n: u64| now.checked_sub_days(Days::new(n)).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let start = match self {
            DateRangePreset::Today | DateRangePreset::Custom => now,
            DateRangePreset::Last7Days => days_back(6),
            DateRangePreset::ThisWeek => days_back(u64::from(now.weekday().num_days_from_monday())),
            DateRangePreset::Last30Days => days_back(29),
            DateRangePreset::ThisMonth => now
                .date_naive()
                .with_day(1)
                .map(start_of_day)
                .unwrap_or(now),
            DateRangePreset::ThisYear => now
                .date_naive()
                .with_ordinal(1)
                .map(start_of_day)
                .unwrap_or(now),
        };
        DateRange::new(start, now)
    }
}

impl FromStr for DateRangePreset {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        DateRangePreset::ALL
            .into_iter()
            .find(|p| p.key() == s.trim())
            .ok_or_else(|| LedgerError::InvalidPreset(s.to_string()))
    }
}

impl fmt::Display for DateRangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Resolves a preset by its wire key against the current time.
pub fn get_date_range(key: &str) -> Result<DateRange> {
    get_date_range_at(key, Utc::now())
}

pub fn get_date_range_at(key: &str, now: DateTime<Utc>) -> Result<DateRange> {
    Ok(key.parse::<DateRangePreset>()?.resolve(now))
}
