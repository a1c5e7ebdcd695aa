// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    SETTING_CHART_HEIGHT, SETTING_CURRENCY_LABEL, SETTING_KEYS, get_chart_height,
    get_currency_label, pretty_table, set_setting,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").context("key missing")?;
            println!("{}", effective_value(conn, key.trim())?);
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").context("key missing")?;
            let value = sub.get_one::<String>("value").context("value missing")?;
            set_setting(conn, key.trim(), value)?;
            println!("{} = {}", key.trim(), value.trim());
        }
        Some(("list", _)) => {
            let mut rows = Vec::new();
            for key in SETTING_KEYS {
                rows.push(vec![key.to_string(), effective_value(conn, key)?]);
            }
            println!("{}", pretty_table(&["Key", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}

/// Stored value, or the default when the key was never set.
pub fn effective_value(conn: &Connection, key: &str) -> Result<String> {
    match key {
        SETTING_CHART_HEIGHT => Ok(get_chart_height(conn)?.to_string()),
        SETTING_CURRENCY_LABEL => get_currency_label(conn),
        other => Err(anyhow!("Unknown setting '{}'", other)),
    }
}
