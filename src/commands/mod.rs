// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod ardoises;
pub mod categories;
pub mod config;
pub mod doctor;
pub mod exporter;
pub mod reports;
pub mod transactions;

use crate::errors::StoreResult;

/// Read helper for listing screens: a failed read is logged and shows as empty.
pub(crate) fn fetch_or_empty<T>(what: &str, res: StoreResult<Vec<T>>) -> Vec<T> {
    match res {
        Ok(v) => v,
        Err(err) => {
            tracing::error!(error = %err, "failed to load {}", what);
            Vec::new()
        }
    }
}
