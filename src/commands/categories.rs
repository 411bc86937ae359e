// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::categories;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let data = categories::list_categories(conn)?;
        if !maybe_print_json(sub.get_flag("json"), &data)? {
            let rows = data
                .iter()
                .map(|c| vec![c.id.to_string(), c.name.clone()])
                .collect();
            println!("{}", pretty_table(&["ID", "Category"], rows));
        }
    }
    Ok(())
}
