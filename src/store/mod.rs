// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row-level persistence for accounts, categories and transactions.
//!
//! Functions take `&Connection` so they run equally against a plain
//! connection or inside an open `rusqlite::Transaction`. No cross-entity
//! invariant is enforced here; see [`crate::recalc`].

pub mod accounts;
pub mod categories;
pub mod transactions;

use crate::error::{LedgerError, Result};

/// Checks that a keyed write touched exactly one row.
pub(crate) fn expect_single_row(
    affected: usize,
    entity: &'static str,
    op: &'static str,
    id: i64,
) -> Result<usize> {
    match affected {
        0 => Err(LedgerError::not_found(entity, id)),
        1 => Ok(1),
        rows => Err(LedgerError::IntegrityViolation {
            entity,
            id,
            op,
            rows,
        }),
    }
}
