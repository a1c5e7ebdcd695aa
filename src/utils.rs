// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use dialoguer::Confirm;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::engine::DEFAULT_MAX_BAR_HEIGHT;
use crate::errors::ValidationError;
use crate::models::MAX_AMOUNT;

const UA: &str = concat!("ardoise/", env!("CARGO_PKG_VERSION"));

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ValidationError::Missing("Date"));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(s.into()))
}

pub fn parse_amount(s: &str) -> Result<Decimal, ValidationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ValidationError::Missing("Amount"));
    }
    let d = s
        .parse::<Decimal>()
        .map_err(|_| ValidationError::InvalidAmount(s.into()))?;
    if d < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount(d));
    }
    if d > Decimal::from(MAX_AMOUNT) {
        return Err(ValidationError::AmountTooLarge(d));
    }
    Ok(d)
}

pub fn required_name(s: Option<&String>, field: &'static str) -> Result<String, ValidationError> {
    s.map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ValidationError::Missing(field))
}

pub fn fmt_money(d: &Decimal, label: &str) -> String {
    format!("{} {}", d.round_dp(2).normalize(), label)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Asks before a destructive operation unless `--yes` was given.
pub fn confirm(sub: &clap::ArgMatches, prompt: &str) -> Result<bool> {
    if sub.get_flag("yes") {
        return Ok(true);
    }
    let ok = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Confirmation prompt failed (pass --yes to skip it)")?;
    Ok(ok)
}

// Settings

pub const SETTING_CHART_HEIGHT: &str = "chart_height";
pub const SETTING_CURRENCY_LABEL: &str = "currency_label";
pub const SETTING_KEYS: [&str; 2] = [SETTING_CHART_HEIGHT, SETTING_CURRENCY_LABEL];

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        SETTING_CHART_HEIGHT => {
            parse_chart_height(value)?;
        }
        SETTING_CURRENCY_LABEL => {
            if value.is_empty() {
                return Err(anyhow!("currency_label must not be empty"));
            }
        }
        other => return Err(anyhow!("Unknown setting '{}'", other)),
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    tracing::info!(key, value, "setting updated");
    Ok(())
}

pub fn parse_chart_height(s: &str) -> Result<f64> {
    let h: f64 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid chart height '{}'", s))?;
    if !h.is_finite() || h <= 0.0 {
        return Err(anyhow!("Chart height must be a positive number (got {})", s));
    }
    Ok(h)
}

pub fn get_chart_height(conn: &Connection) -> Result<f64> {
    match get_setting(conn, SETTING_CHART_HEIGHT)? {
        Some(v) => parse_chart_height(&v),
        None => Ok(DEFAULT_MAX_BAR_HEIGHT),
    }
}

pub fn get_currency_label(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, SETTING_CURRENCY_LABEL)?.unwrap_or_else(|| "FCFA".to_string()))
}
