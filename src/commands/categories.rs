// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::fetch_or_empty;
use crate::engine::categories_for_kind;
use crate::models::TransactionType;
use crate::store;
use crate::utils::{confirm, pretty_table, required_name};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required_name(sub.get_one::<String>("name"), "Name")?;
            let kind: TransactionType = sub
                .get_one::<String>("type")
                .map(String::as_str)
                .unwrap_or_default()
                .parse()?;
            let link = sub
                .get_one::<String>("link")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty());
            store::insert_category(conn, &name, kind, link)
                .with_context(|| format!("Add category '{}'", name))?;
            println!("Added {} category '{}'", kind, name);
        }
        Some(("list", sub)) => {
            let all = fetch_or_empty("categories", store::list_categories(conn));
            let shown = match sub.get_one::<String>("type") {
                Some(t) => categories_for_kind(&all, t.parse()?),
                None => all.iter().collect(),
            };
            let data = shown
                .into_iter()
                .map(|c| {
                    vec![
                        c.id.to_string(),
                        c.name.clone(),
                        c.kind.map(|k| k.to_string()).unwrap_or_default(),
                        c.link.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["ID", "Category", "Type", "Link"], data));
        }
        Some(("rm", sub)) => {
            let name = required_name(sub.get_one::<String>("name"), "Name")?;
            let id = store::category_id_by_name(conn, &name)?
                .with_context(|| format!("Category '{}' not found", name))?;
            if !confirm(sub, &format!("Delete category '{}'? Its transactions become uncategorized.", name))? {
                println!("Cancelled");
                return Ok(());
            }
            store::delete_category(conn, id)?;
            println!("Removed category '{}'", name);
        }
        Some(("reset-defaults", sub)) => {
            if !confirm(sub, "Replace every category with the default set?")? {
                println!("Cancelled");
                return Ok(());
            }
            let n = store::reset_default_categories(conn)?;
            println!("Restored {} default categories", n);
        }
        _ => {}
    }
    Ok(())
}
