// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use anyhow::Context;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.supersolik", "Greed", "greed"));

/// How long a writer waits for the SQLite write lock before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_CATEGORIES: [&str; 4] = ["Groceries", "Salary", "Fun", "Taxes"];

/// Resolves the database file: explicit value (flag or `DB_URL`) first,
/// then the platform data directory.
pub fn db_path(explicit: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(raw) = explicit.filter(|s| !s.trim().is_empty()) {
        let trimmed = raw.trim();
        let path = trimmed.strip_prefix("file://").unwrap_or(trimmed);
        return Ok(PathBuf::from(path));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("greed.sqlite"))
}

pub fn open_or_init(explicit: Option<&str>) -> anyhow::Result<Connection> {
    let path = db_path(explicit)?;
    let conn = open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    Ok(conn)
}

/// Opens a file database, applies connection settings and ensures the schema.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |r| r.get(0))?;
    log::debug!("journal_mode={} for {}", mode, path.display());
    init_schema(&conn)?;
    log::info!("DB {} connected", path.display());
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        amount TEXT NOT NULL DEFAULT '0', -- exact decimal string
        currency TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        category_id INTEGER,
        created_at TEXT NOT NULL, -- UTC, %Y-%m-%dT%H:%M:%S+00:00
        description TEXT NOT NULL DEFAULT '',
        FOREIGN KEY(account_id) REFERENCES accounts(id),
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_created_at ON transactions(created_at);
    CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account_id);
    "#,
    )?;
    for name in DEFAULT_CATEGORIES {
        conn.execute(
            "INSERT OR IGNORE INTO categories(name) VALUES (?1)",
            [name],
        )?;
    }
    Ok(())
}
