// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Input problems caught before anything touches the store.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Amount must not be negative (got {0})")]
    NegativeAmount(Decimal),
    #[error("Amount {0} is above the limit of {max}", max = crate::models::MAX_AMOUNT)]
    AmountTooLarge(Decimal),
    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Unknown transaction type '{0}' (use expense|income)")]
    UnknownType(String),
    #[error("Unknown risk level '{0}'")]
    UnknownRisk(String),
}

/// Failures of the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },
    #[error("Invalid value '{value}' in {table}.{column}")]
    InvalidRow {
        table: &'static str,
        column: &'static str,
        value: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
