// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            other => Err(ValidationError::UnknownType(other.to_string())),
        }
    }
}

/// Risk attached to an ardoise, ordered from least to most risky.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RiskLevel {
    #[default]
    UltraSure,
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 6] = [
        RiskLevel::UltraSure,
        RiskLevel::VeryLow,
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::VeryHigh,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::UltraSure => "Ultra Sure",
            RiskLevel::VeryLow => "Very Low Risk",
            RiskLevel::Low => "Low Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::VeryHigh => "Very High Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskLevel {
    type Err = ValidationError;

    // Accepts the display label ("Moderate Risk") or a short slug ("moderate").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        let slug = needle.replace(['-', '_'], " ");
        let slug = slug.trim_end_matches(" risk");
        RiskLevel::ALL
            .into_iter()
            .find(|r| {
                let label = r.label().to_ascii_lowercase();
                label == needle || label.trim_end_matches(" risk") == slug
            })
            .ok_or_else(|| ValidationError::UnknownRisk(s.trim().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: Option<i64>,
    pub ardoise_id: Option<i64>,
    pub note: Option<String>,
}

/// Largest amount a single transaction may carry. Keeps balance sums far from
/// the `Decimal` range.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Insert/update payload for a transaction; everything but the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: Option<i64>,
    pub ardoise_id: Option<i64>,
    pub note: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount(self.amount));
        }
        if self.amount > Decimal::from(MAX_AMOUNT) {
            return Err(ValidationError::AmountTooLarge(self.amount));
        }
        Ok(())
    }
}

impl From<&Transaction> for NewTransaction {
    fn from(t: &Transaction) -> Self {
        NewTransaction {
            date: t.date,
            amount: t.amount,
            kind: t.kind,
            category_id: t.category_id,
            ardoise_id: t.ardoise_id,
            note: t.note.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub link: Option<String>,
    pub src: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ardoise {
    pub id: i64,
    pub name: String,
    pub risk: RiskLevel,
    pub amount: Decimal, // cached; see store::refresh_ardoise_amount
}
