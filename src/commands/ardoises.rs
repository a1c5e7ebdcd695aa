// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::fetch_or_empty;
use crate::engine::{date_key, group_by_date, sorted_date_keys};
use crate::models::{Ardoise, RiskLevel, Transaction};
use crate::store;
use crate::utils::{
    confirm, fmt_money, get_currency_label, maybe_print_json, pretty_table, required_name,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required_name(sub.get_one::<String>("name"), "Name")?;
            let risk = match sub.get_one::<String>("risk") {
                Some(r) => r.parse::<RiskLevel>()?,
                None => RiskLevel::default(),
            };
            let id = store::insert_ardoise(conn, &name, risk)?;
            println!("Added ardoise '{}' ({}), id {}", name, risk, id);
        }
        Some(("edit", sub)) => {
            let current = lookup(conn, sub)?;
            let name = match sub.get_one::<String>("name") {
                Some(n) => required_name(Some(n), "Name")?,
                None => current.name.clone(),
            };
            let risk = match sub.get_one::<String>("risk") {
                Some(r) => r.parse::<RiskLevel>()?,
                None => current.risk,
            };
            store::update_ardoise(conn, current.id, &name, risk)?;
            println!("Updated ardoise {}", current.id);
        }
        Some(("rm", sub)) => {
            let current = lookup(conn, sub)?;
            let prompt = format!(
                "Delete ardoise '{}'? Linked transactions are kept but unlinked.",
                current.name
            );
            if !confirm(sub, &prompt)? {
                println!("Cancelled");
                return Ok(());
            }
            store::delete_ardoise(conn, current.id)
                .with_context(|| format!("Failed to delete ardoise '{}'", current.name))?;
            println!("Deleted ardoise '{}'", current.name);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn lookup(conn: &Connection, sub: &clap::ArgMatches) -> Result<Ardoise> {
    let key = sub.get_one::<String>("id").context("id missing")?;
    store::find_ardoise(conn, key)?.with_context(|| format!("Ardoise '{}' not found", key))
}

fn list(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let ardoises = fetch_or_empty("ardoises", store::refresh_all_ardoise_amounts(conn));
    if !maybe_print_json(json_flag, jsonl_flag, &ardoises)? {
        let label = get_currency_label(conn)?;
        let rows = ardoises
            .iter()
            .map(|a| {
                vec![
                    a.id.to_string(),
                    a.name.clone(),
                    fmt_money(&a.amount, &label),
                    a.risk.to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["ID", "Name", "Amount", "Risk"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
pub struct ArdoiseDetail {
    #[serde(flatten)]
    pub ardoise: Ardoise,
    pub transactions: Vec<Transaction>,
}

/// An ardoise with its linked transactions; the cached amount is refreshed first.
pub fn detail(conn: &Connection, key: &str) -> Result<ArdoiseDetail> {
    let found = store::find_ardoise(conn, key)?
        .with_context(|| format!("Ardoise '{}' not found", key))?;
    store::refresh_ardoise_amount(conn, found.id)?;
    let ardoise = store::get_ardoise(conn, found.id)?;
    let transactions = store::transactions_for_ardoise(conn, found.id)?;
    Ok(ArdoiseDetail {
        ardoise,
        transactions,
    })
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("id").context("id missing")?;
    let d = detail(conn, key)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &d)? {
        return Ok(());
    }
    let label = get_currency_label(conn)?;
    println!(
        "{} [{}]: {}",
        d.ardoise.name,
        d.ardoise.risk,
        fmt_money(&d.ardoise.amount, &label)
    );
    if d.transactions.is_empty() {
        println!("No transactions found");
        return Ok(());
    }
    let groups = group_by_date(&d.transactions);
    let mut rows = Vec::new();
    for key in sorted_date_keys(&groups) {
        for t in &groups[key] {
            rows.push(vec![
                date_key(t.date),
                t.id.to_string(),
                t.kind.to_string(),
                fmt_money(&t.amount, &label),
                t.note.clone().unwrap_or_default(),
            ]);
        }
    }
    println!(
        "{}",
        pretty_table(&["Date", "ID", "Type", "Amount", "Note"], rows)
    );
    Ok(())
}
