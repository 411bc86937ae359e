// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, Result};
use crate::models::Category;
use rusqlite::{Connection, OptionalExtension, params};

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

pub fn get_category(conn: &Connection, id: i64) -> Result<Category> {
    conn.query_row(
        "SELECT id, name FROM categories WHERE id=?1",
        params![id],
        |r| {
            Ok(Category {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| LedgerError::not_found("category", id))
}
