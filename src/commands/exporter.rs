// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{date_key, resolve_category_link};
use crate::store;
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .context("format missing")?
        .to_lowercase();
    let out = sub.get_one::<String>("out").context("out missing")?;

    let transactions = store::list_transactions(conn)?;
    let categories = store::list_categories(conn)?;
    let ardoises = store::list_ardoises(conn)?;

    let rows = transactions.iter().map(|t| {
        let category = t
            .category_id
            .and_then(|id| categories.iter().find(|c| c.id == id))
            .map(|c| c.name.clone());
        let link = resolve_category_link(t.category_id, &categories).map(str::to_string);
        let ardoise = t
            .ardoise_id
            .and_then(|id| ardoises.iter().find(|a| a.id == id))
            .map(|a| a.name.clone());
        (t, category, link, ardoise)
    });

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out))?;
            wtr.write_record(["id", "date", "type", "amount", "category", "ardoise", "note"])?;
            for (t, category, _, ardoise) in rows {
                wtr.write_record([
                    t.id.to_string(),
                    date_key(t.date),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    category.unwrap_or_default(),
                    ardoise.unwrap_or_default(),
                    t.note.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .map(|(t, category, link, ardoise)| {
                    json!({
                        "id": t.id,
                        "date": date_key(t.date),
                        "type": t.kind,
                        "amount": t.amount.to_string(),
                        "category": category,
                        "link": link,
                        "ardoise": ardoise,
                        "note": t.note,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
    tracing::info!(count = transactions.len(), out = %out, "transactions exported");
    println!("Exported {} transactions to {}", transactions.len(), out);
    Ok(())
}
