// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod daterange;
pub mod db;
pub mod error;
pub mod models;
pub mod money;
pub mod query;
pub mod recalc;
pub mod stats;
pub mod store;
pub mod utils;

pub use error::{LedgerError, Result};
pub use money::Money;
