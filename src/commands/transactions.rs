// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::fetch_or_empty;
use crate::engine::{group_by_date, resolve_category_link, sorted_date_keys};
use crate::models::{NewTransaction, Transaction, TransactionType};
use crate::store;
use crate::utils::{
    confirm, fmt_money, get_currency_label, maybe_print_json, parse_amount, parse_date,
    pretty_table,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            add(conn, sub)?;
        }
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn resolve_category(conn: &Connection, name: &str) -> Result<i64> {
    store::category_id_by_name(conn, name)?
        .with_context(|| format!("Category '{}' not found", name.trim()))
}

fn resolve_ardoise(conn: &Connection, key: &str) -> Result<i64> {
    let a = store::find_ardoise(conn, key)?
        .with_context(|| format!("Ardoise '{}' not found", key.trim()))?;
    Ok(a.id)
}

fn note_arg(sub: &clap::ArgMatches) -> Option<String> {
    sub.get_one::<String>("note")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<i64> {
    let kind: TransactionType = sub
        .get_one::<String>("type")
        .map(String::as_str)
        .unwrap_or_default()
        .parse()?;
    let date = parse_date(sub.get_one::<String>("date").map(String::as_str).unwrap_or(""))?;
    let amount = parse_amount(sub.get_one::<String>("amount").map(String::as_str).unwrap_or(""))?;
    let category_id = match sub.get_one::<String>("category") {
        Some(name) => Some(resolve_category(conn, name)?),
        None => None,
    };
    let ardoise_id = match sub.get_one::<String>("ardoise") {
        Some(key) => Some(resolve_ardoise(conn, key)?),
        None => None,
    };

    let new = NewTransaction {
        date,
        amount,
        kind,
        category_id,
        ardoise_id,
        note: note_arg(sub),
    };
    let id = store::insert_transaction(conn, &new)?;
    println!(
        "Recorded {} {} on {} (id {})",
        kind,
        fmt_money(&amount, &get_currency_label(conn)?),
        date,
        id
    );
    Ok(id)
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("id missing")?;
    let current = store::get_transaction(conn, id)?;
    let mut new = NewTransaction::from(&current);

    if let Some(t) = sub.get_one::<String>("type") {
        new.kind = t.parse()?;
    }
    if let Some(d) = sub.get_one::<String>("date") {
        new.date = parse_date(d)?;
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        new.amount = parse_amount(a)?;
    }
    if sub.get_flag("no_category") {
        new.category_id = None;
    } else if let Some(name) = sub.get_one::<String>("category") {
        new.category_id = Some(resolve_category(conn, name)?);
    }
    if sub.get_flag("no_ardoise") {
        new.ardoise_id = None;
    } else if let Some(key) = sub.get_one::<String>("ardoise") {
        new.ardoise_id = Some(resolve_ardoise(conn, key)?);
    }
    if sub.contains_id("note") {
        new.note = note_arg(sub);
    }

    store::update_transaction(conn, id, &new)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn remove(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("id missing")?;
    let t = store::get_transaction(conn, id)?;
    let prompt = format!(
        "Delete {} of {} on {}?",
        t.kind,
        fmt_money(&t.amount, &get_currency_label(conn)?),
        t.date
    );
    if !confirm(sub, &prompt)? {
        println!("Cancelled");
        return Ok(());
    }
    store::delete_transaction(conn, id)
        .map_err(|e| anyhow!("Failed to delete transaction {}: {}", id, e))?;
    println!("Deleted transaction {}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct DayGroup {
    pub date: String,
    pub transactions: Vec<TransactionRow>,
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: String,
    pub category: String,
    pub ardoise: String,
    pub note: String,
}

/// Transactions grouped by day, newest day first.
pub fn query_groups(conn: &Connection) -> Result<Vec<DayGroup>> {
    let transactions = fetch_or_empty("transactions", store::list_transactions(conn));
    let categories = fetch_or_empty("categories", store::list_categories(conn));
    let ardoises = fetch_or_empty("ardoises", store::list_ardoises(conn));

    let groups = group_by_date(&transactions);
    let row = |t: &Transaction| {
        // Categories seeded without a display link fall back to their name.
        let category = resolve_category_link(t.category_id, &categories)
            .map(str::to_string)
            .or_else(|| {
                t.category_id
                    .and_then(|id| categories.iter().find(|c| c.id == id))
                    .map(|c| c.name.clone())
            })
            .unwrap_or_default();
        let ardoise = t
            .ardoise_id
            .and_then(|id| ardoises.iter().find(|a| a.id == id))
            .map(|a| a.name.clone())
            .unwrap_or_default();
        TransactionRow {
            id: t.id,
            kind: t.kind,
            amount: t.amount.to_string(),
            category,
            ardoise,
            note: t.note.clone().unwrap_or_default(),
        }
    };

    Ok(sorted_date_keys(&groups)
        .into_iter()
        .map(|key| DayGroup {
            date: key.to_string(),
            transactions: groups[key].iter().map(&row).collect(),
        })
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_groups(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let label = get_currency_label(conn)?;
        let mut rows: Vec<Vec<String>> = Vec::new();
        for group in &data {
            for (i, r) in group.transactions.iter().enumerate() {
                let sign = match r.kind {
                    TransactionType::Expense => "-",
                    TransactionType::Income => "+",
                };
                rows.push(vec![
                    if i == 0 { group.date.clone() } else { String::new() },
                    r.id.to_string(),
                    r.category.clone(),
                    format!("{}{} {}", sign, r.amount, label),
                    r.ardoise.clone(),
                    r.note.clone(),
                ]);
            }
        }
        println!(
            "{}",
            pretty_table(&["Date", "ID", "Category", "Amount", "Ardoise", "Note"], rows)
        );
    }
    Ok(())
}
