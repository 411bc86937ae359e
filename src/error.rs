// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Every failure the ledger engine can surface.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A write touched an unexpected number of rows.
    #[error("{op} of {entity} {id} affected {rows} rows, expected exactly 1")]
    IntegrityViolation {
        entity: &'static str,
        id: i64,
        op: &'static str,
        rows: usize,
    },

    #[error("account {id} still has {count} transaction(s)")]
    AccountInUse { id: i64, count: i64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown date range preset '{0}'")]
    InvalidPreset(String),

    /// A stored value does not match the layout it was written with.
    #[error("Corrupt {column} value '{value}' in storage")]
    CorruptData { column: &'static str, value: String },

    /// The balance recalculation unit of work was rolled back.
    #[error("Balance recalculation failed during {op}: {source}")]
    Recalc {
        op: &'static str,
        source: Box<LedgerError>,
    },

    #[error("Storage error: {0}")]
    Persistence(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        LedgerError::NotFound { entity, id }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        LedgerError::InvalidInput(msg.into())
    }

    /// True for a missing row, including one reported from inside a rolled back recalculation.
    pub fn is_not_found(&self) -> bool {
        match self {
            LedgerError::NotFound { .. } => true,
            LedgerError::Recalc { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// The innermost error, unwrapping recalculation wrappers.
    pub fn root_cause(&self) -> &LedgerError {
        match self {
            LedgerError::Recalc { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
