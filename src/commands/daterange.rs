// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::daterange::DateRangePreset;
use crate::utils::{format_db_timestamp, pretty_table};
use anyhow::Result;
use chrono::Utc;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let preset: DateRangePreset = m.get_one::<String>("preset").unwrap().parse()?;
    let range = preset.resolve(Utc::now());
    let show = |at: Option<chrono::DateTime<Utc>>| {
        at.map(|t| format_db_timestamp(&t)).unwrap_or_else(|| "-".into())
    };
    let rows = vec![vec![
        preset.label().to_string(),
        show(range.start),
        show(range.end),
        if preset.accepts_free_input() { "yes" } else { "no" }.to_string(),
    ]];
    println!("{}", pretty_table(&["Preset", "Start", "End", "Free input"], rows));
    Ok(())
}
