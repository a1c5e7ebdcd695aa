// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure aggregation over already-fetched transactions.
//!
//! Nothing in here touches the database. Callers fetch rows through
//! [`crate::store`] and hand plain slices to these functions.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::models::{Category, Transaction, TransactionType};

pub const DEFAULT_MAX_BAR_HEIGHT: f64 = 140.0;

pub const WEEKDAY_LABELS: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Canonical `YYYY-MM-DD` key; string order is chronological order.
pub type DateKey = String;

pub fn date_key(date: NaiveDate) -> DateKey {
    date.format("%Y-%m-%d").to_string()
}

/// Groups transactions by day. Each group keeps the input order.
pub fn group_by_date(transactions: &[Transaction]) -> BTreeMap<DateKey, Vec<Transaction>> {
    let mut groups: BTreeMap<DateKey, Vec<Transaction>> = BTreeMap::new();
    for t in transactions {
        groups.entry(date_key(t.date)).or_default().push(t.clone());
    }
    groups
}

/// Group keys newest day first, the order groups are rendered in.
pub fn sorted_date_keys<V>(groups: &BTreeMap<DateKey, V>) -> Vec<&str> {
    let mut keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    keys.sort_by(|a, b| b.cmp(a));
    keys
}

/// Raw per-weekday sums, index 0 is Sunday.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyTotals {
    pub expense: [Decimal; 7],
    pub income: [Decimal; 7],
}

/// Per-weekday bar heights, each series scaled so its largest bar is the max height.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyStats {
    pub expense: [f64; 7],
    pub income: [f64; 7],
}

impl WeeklyStats {
    pub fn series(&self, kind: TransactionType) -> &[f64; 7] {
        match kind {
            TransactionType::Expense => &self.expense,
            TransactionType::Income => &self.income,
        }
    }
}

pub fn compute_weekly_totals(transactions: &[Transaction]) -> WeeklyTotals {
    let mut totals = WeeklyTotals::default();
    for t in transactions {
        let day = t.date.weekday().num_days_from_sunday() as usize;
        match t.kind {
            TransactionType::Income => {
                totals.income[day] = totals.income[day].saturating_add(t.amount)
            }
            TransactionType::Expense => {
                totals.expense[day] = totals.expense[day].saturating_add(t.amount)
            }
        }
    }
    totals
}

/// Day-of-week histogram across every supplied transaction, whatever week it is in.
///
/// `max_bar_height` defaults to [`DEFAULT_MAX_BAR_HEIGHT`]. A series with no
/// non-zero bucket comes back as all zeros.
pub fn compute_weekly_stats(transactions: &[Transaction], max_bar_height: Option<f64>) -> WeeklyStats {
    let height = max_bar_height.unwrap_or(DEFAULT_MAX_BAR_HEIGHT);
    let totals = compute_weekly_totals(transactions);
    WeeklyStats {
        expense: normalize(&totals.expense, height),
        income: normalize(&totals.income, height),
    }
}

fn normalize(series: &[Decimal; 7], height: f64) -> [f64; 7] {
    let max = series.iter().copied().max().unwrap_or(Decimal::ZERO);
    let mut out = [0.0; 7];
    if max <= Decimal::ZERO {
        return out;
    }
    let max = max.to_f64().unwrap_or(0.0);
    for (slot, value) in out.iter_mut().zip(series) {
        *slot = value.to_f64().unwrap_or(0.0) / max * height;
    }
    out
}

/// Balance of an ardoise: linked expenses add, linked income subtracts.
///
/// Sums saturate at the `Decimal` range instead of overflowing.
pub fn compute_ardoise_balance(ardoise_id: i64, transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.ardoise_id == Some(ardoise_id))
        .fold(Decimal::ZERO, |acc, t| match t.kind {
            TransactionType::Expense => acc.saturating_add(t.amount),
            TransactionType::Income => acc.saturating_sub(t.amount),
        })
}

/// What is left to spend: income minus expenses over every transaction.
pub fn compute_available_balance(transactions: &[Transaction]) -> Decimal {
    transactions.iter().fold(Decimal::ZERO, |acc, t| match t.kind {
        TransactionType::Income => acc.saturating_add(t.amount),
        TransactionType::Expense => acc.saturating_sub(t.amount),
    })
}

pub fn resolve_category_link(category_id: Option<i64>, categories: &[Category]) -> Option<&str> {
    let id = category_id?;
    categories
        .iter()
        .find(|c| c.id == id)
        .and_then(|c| c.link.as_deref())
}

/// Categories offered for a transaction of `kind`. Untyped categories fit both.
pub fn categories_for_kind(categories: &[Category], kind: TransactionType) -> Vec<&Category> {
    categories
        .iter()
        .filter(|c| c.kind.is_none_or(|k| k == kind))
        .collect()
}
