// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::fetch_or_empty;
use crate::engine::{
    WEEKDAY_LABELS, WeeklyStats, WeeklyTotals, compute_available_balance, compute_weekly_stats,
    compute_weekly_totals,
};
use crate::models::TransactionType;
use crate::store;
use crate::utils::{
    fmt_money, get_chart_height, get_currency_label, maybe_print_json, parse_chart_height,
    pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

const BAR_COLUMNS: f64 = 28.0;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("weekly", sub)) => weekly(conn, sub)?,
        Some(("available", sub)) => available(conn, sub)?,
        _ => {}
    }
    Ok(())
}

// `--height` wins over the stored setting.
fn chart_height(conn: &Connection, sub: &clap::ArgMatches) -> Result<f64> {
    match sub.get_one::<String>("height") {
        Some(h) => parse_chart_height(h),
        None => get_chart_height(conn),
    }
}

/// Weekly chart data over every stored transaction.
pub struct WeeklyReport {
    pub height: f64,
    pub stats: WeeklyStats,
    pub totals: WeeklyTotals,
    pub transaction_count: usize,
}

pub fn weekly_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<WeeklyReport> {
    let height = chart_height(conn, sub)?;
    let transactions = fetch_or_empty("transactions", store::list_transactions(conn));
    Ok(WeeklyReport {
        height,
        stats: compute_weekly_stats(&transactions, Some(height)),
        totals: compute_weekly_totals(&transactions),
        transaction_count: transactions.len(),
    })
}

fn weekly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let kind: TransactionType = sub
        .get_one::<String>("type")
        .map(String::as_str)
        .unwrap_or("expense")
        .parse()?;
    let WeeklyReport {
        height,
        stats,
        totals,
        transaction_count,
    } = weekly_report(conn, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &stats)? {
        return Ok(());
    }
    if transaction_count == 0 {
        println!("No transactions available");
        return Ok(());
    }
    let raw = match kind {
        TransactionType::Expense => &totals.expense,
        TransactionType::Income => &totals.income,
    };
    let label = get_currency_label(conn)?;
    let rows = WEEKDAY_LABELS
        .iter()
        .enumerate()
        .map(|(day, name)| {
            let value = stats.series(kind)[day];
            vec![
                name.to_string(),
                bar(value, height),
                format!("{:.1}", value),
                fmt_money(&raw[day], &label),
            ]
        })
        .collect();
    let title = match kind {
        TransactionType::Expense => "Expense",
        TransactionType::Income => "Income",
    };
    println!("{}", title);
    println!(
        "{}",
        pretty_table(&["Day", "", "Height", "Total"], rows)
    );
    Ok(())
}

fn bar(value: f64, height: f64) -> String {
    if height <= 0.0 {
        return String::new();
    }
    let width = (value / height * BAR_COLUMNS).round() as usize;
    "█".repeat(width)
}

fn available(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let transactions = fetch_or_empty("transactions", store::list_transactions(conn));
    let balance = compute_available_balance(&transactions);
    let label = get_currency_label(conn)?;
    let v = json!({ "available": balance.to_string(), "currency": label });
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &v)? {
        println!("Available: {}", fmt_money(&balance, &label));
    }
    Ok(())
}
