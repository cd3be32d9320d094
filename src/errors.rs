// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Core error kinds. The command layer maps these onto exit reporting;
/// a service front end would map them onto 404/400/409/500.
#[derive(Debug, Error)]
pub enum Error {
    /// Referenced user, account, or charge is missing or inactive.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected before any mutation: malformed cycle label, non-positive
    /// amount, day of month outside 1-31.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Lost idempotency race or version mismatch. The whole apply pass is
    /// idempotent, so the caller may retry it.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage failure")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// A constraint violation on the (charge_id, cycle_label) unique index
    /// means another writer applied the charge first.
    pub fn from_sqlite_for_charge(e: rusqlite::Error, charge_name: &str) -> Error {
        if let rusqlite::Error::SqliteFailure(code, _) = &e {
            if code.code == rusqlite::ErrorCode::ConstraintViolation {
                return Error::Conflict(format!(
                    "Charge '{}' already applied for this cycle",
                    charge_name
                ));
            }
        }
        Error::Storage(e)
    }
}
