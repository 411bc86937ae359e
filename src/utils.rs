// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, Result};
use crate::models::{DATE_INPUT_LAYOUT, DATETIME_DB_LAYOUT, DATETIME_INPUT_LAYOUT, DateRange};
use crate::money::Money;
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;
use comfy_table::{Cell, Table, presets::UTF8_FULL};

pub fn format_db_timestamp(at: &DateTime<Utc>) -> String {
    at.format(DATETIME_DB_LAYOUT).to_string()
}

/// Drops the sub-second part; stored timestamps have whole-second precision.
pub fn truncate_to_second(at: &DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(0)
}

/// Smallest whole second at or after `at`. Against whole-second stored
/// values, `>= ceil(start)` and `< ceil(end)` match `>= start` and `< end`.
pub fn ceil_to_second(at: &DateTime<Utc>) -> DateTime<Utc> {
    let whole = truncate_to_second(at);
    if whole == *at {
        return whole;
    }
    whole.checked_add_signed(Duration::seconds(1)).unwrap_or(whole)
}

/// Exact-layout parse of a stored timestamp; no lenient fallbacks.
pub fn parse_db_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(raw, DATETIME_DB_LAYOUT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| LedgerError::CorruptData {
            column: "created_at",
            value: raw.to_string(),
        })
}

pub fn parse_amount(s: &str) -> Result<Money> {
    s.parse::<Money>()
}

pub fn parse_input_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_INPUT_LAYOUT).map_err(|_| {
        LedgerError::invalid_input(format!("Invalid date '{}', expected YYYY-MM-DD", s))
    })
}

/// Local wall-clock date and time in the named IANA zone, normalized to UTC.
pub fn parse_local_datetime(date: &str, time: &str, tz: &str) -> Result<DateTime<Utc>> {
    let zone: Tz = tz
        .trim()
        .parse()
        .map_err(|_| LedgerError::invalid_input(format!("Unknown timezone '{}'", tz)))?;
    let raw = format!("{} {}", date.trim(), time.trim());
    let naive = NaiveDateTime::parse_from_str(&raw, DATETIME_INPUT_LAYOUT).map_err(|_| {
        LedgerError::invalid_input(format!(
            "Invalid date/time '{}', expected YYYY-MM-DD HH:MM",
            raw
        ))
    })?;
    // DST gaps have no local instant; folds take the earlier one
    let local = zone.from_local_datetime(&naive).earliest().ok_or_else(|| {
        LedgerError::invalid_input(format!("'{}' does not exist in timezone {}", raw, tz))
    })?;
    Ok(local.with_timezone(&Utc))
}

/// Splits a composite `id;name` form value.
pub fn parse_id_name(s: &str) -> Result<(i64, String)> {
    let mut parts = s.splitn(2, ';');
    let (Some(id), Some(name)) = (parts.next(), parts.next()) else {
        return Err(LedgerError::invalid_input(format!(
            "Invalid value '{}', expected 'id;name'",
            s
        )));
    };
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| LedgerError::invalid_input(format!("Invalid id in '{}'", s)))?;
    Ok((id, name.to_string()))
}

impl DateRange {
    /// Builds a range from date-only inputs. The end date is inclusive for
    /// the user, so one day is added to get the exclusive bound.
    pub fn from_input_dates(start: Option<&str>, end: Option<&str>) -> Result<DateRange> {
        let start = match start.filter(|s| !s.trim().is_empty()) {
            Some(s) => Some(start_of_day(parse_input_date(s)?)),
            None => None,
        };
        let end = match end.filter(|s| !s.trim().is_empty()) {
            Some(s) => {
                let day = parse_input_date(s)?;
                let next = day.checked_add_days(Days::new(1)).ok_or_else(|| {
                    LedgerError::invalid_input(format!("End date '{}' out of range", s))
                })?;
                Some(start_of_day(next))
            }
            None => None,
        };
        Ok(DateRange { start, end })
    }
}

pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> anyhow::Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}
