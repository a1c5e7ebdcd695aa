// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed access to the three record tables.
//!
//! Rows are turned into [`Transaction`], [`Category`] and [`Ardoise`] here and
//! nowhere else. Seed snapshots store dates as ISO timestamps or epoch
//! milliseconds and amounts as integers, so the mapping is lenient on read and
//! strict on write.

use chrono::{DateTime, NaiveDate};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::engine;
use crate::errors::{StoreError, StoreResult, ValidationError};
use crate::models::{Ardoise, Category, NewTransaction, RiskLevel, Transaction, TransactionType};

pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 10] = [
    "Tuition and Fees",
    "School Supplies",
    "Books and Textbooks",
    "Transportation",
    "Lunch and Snacks",
    "Extracurricular Activities",
    "Clothing",
    "Technology",
    "Personal Care",
    "Entertainment",
];

pub const DEFAULT_INCOME_CATEGORIES: [&str; 7] = [
    "Allowance",
    "Part-Time Job",
    "Tutoring",
    "Gifts/Monetary Gifts",
    "Selling Crafts or Products",
    "Scholarships or Grants",
    "Freelance Work",
];

const TX_COLUMNS: &str = "id, date, amount, category_ID, note, type, ardoise_ID";

struct RawTransaction {
    id: i64,
    date: Value,
    amount: Value,
    category_id: Option<i64>,
    note: Option<String>,
    kind: Option<String>,
    ardoise_id: Option<i64>,
}

fn raw_transaction(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok(RawTransaction {
        id: r.get(0)?,
        date: r.get(1)?,
        amount: r.get(2)?,
        category_id: r.get(3)?,
        note: r.get(4)?,
        kind: r.get(5)?,
        ardoise_id: r.get(6)?,
    })
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = StoreError;

    fn try_from(raw: RawTransaction) -> StoreResult<Self> {
        let date = date_from_value(&raw.date).ok_or_else(|| StoreError::InvalidRow {
            table: "transactions",
            column: "date",
            value: value_text(&raw.date),
        })?;
        let amount = decimal_from_value(&raw.amount).ok_or_else(|| StoreError::InvalidRow {
            table: "transactions",
            column: "amount",
            value: value_text(&raw.amount),
        })?;
        let kind = match raw.kind.as_deref().map(str::parse::<TransactionType>) {
            Some(Ok(k)) => k,
            _ => {
                tracing::warn!(id = raw.id, kind = ?raw.kind, "transaction type unreadable, treating as expense");
                TransactionType::Expense
            }
        };
        Ok(Transaction {
            id: raw.id,
            date,
            amount: amount.abs(),
            kind,
            category_id: raw.category_id,
            ardoise_id: raw.ardoise_id,
            note: raw.note.filter(|n| !n.is_empty()),
        })
    }
}

/// Day of a stored date: `YYYY-MM-DD`, anything starting with it, compact
/// `YYYYMMDD`, or epoch millis.
pub fn date_from_value(v: &Value) -> Option<NaiveDate> {
    match v {
        Value::Text(s) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                return match s.len() {
                    8 => NaiveDate::parse_from_str(s, "%Y%m%d").ok(),
                    // TEXT affinity turns stored epoch millis into digit strings
                    n if n > 10 => s
                        .parse::<i64>()
                        .ok()
                        .and_then(DateTime::from_timestamp_millis)
                        .map(|d| d.date_naive()),
                    _ => None,
                };
            }
            NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok()
        }
        Value::Integer(ms) => DateTime::from_timestamp_millis(*ms).map(|d| d.date_naive()),
        Value::Real(ms) => DateTime::from_timestamp_millis(*ms as i64).map(|d| d.date_naive()),
        _ => None,
    }
}

pub fn decimal_from_value(v: &Value) -> Option<Decimal> {
    match v {
        Value::Null => Some(Decimal::ZERO),
        Value::Integer(i) => Some(Decimal::from(*i)),
        Value::Real(f) => Decimal::try_from(*f).ok(),
        Value::Text(s) => s.trim().parse::<Decimal>().ok(),
        Value::Blob(_) => None,
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::Null => "NULL".into(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

fn query_transactions(
    conn: &Connection,
    filter: &str,
    params: &[&dyn rusqlite::ToSql],
) -> StoreResult<Vec<Transaction>> {
    let sql = format!("SELECT {} FROM transactions {} ORDER BY id", TX_COLUMNS, filter);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, raw_transaction)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(Transaction::try_from(row?)?);
    }
    Ok(out)
}

// Transactions

pub fn list_transactions(conn: &Connection) -> StoreResult<Vec<Transaction>> {
    let out = query_transactions(conn, "", params![])?;
    tracing::debug!(count = out.len(), "listed transactions");
    Ok(out)
}

pub fn get_transaction(conn: &Connection, id: i64) -> StoreResult<Transaction> {
    query_transactions(conn, "WHERE id=?1", params![id])?
        .pop()
        .ok_or(StoreError::NotFound { kind: "Transaction", id })
}

pub fn transactions_for_ardoise(conn: &Connection, ardoise_id: i64) -> StoreResult<Vec<Transaction>> {
    query_transactions(conn, "WHERE ardoise_ID=?1", params![ardoise_id])
}

fn check_references(conn: &Connection, t: &NewTransaction) -> StoreResult<()> {
    if let Some(id) = t.category_id {
        if !exists(conn, "Categories", id)? {
            return Err(StoreError::NotFound { kind: "Category", id });
        }
    }
    if let Some(id) = t.ardoise_id {
        if !exists(conn, "Ardoise", id)? {
            return Err(StoreError::NotFound { kind: "Ardoise", id });
        }
    }
    Ok(())
}

fn exists(conn: &Connection, table: &str, id: i64) -> StoreResult<bool> {
    let sql = format!("SELECT 1 FROM {} WHERE id=?1", table);
    let hit: Option<i64> = conn.query_row(&sql, params![id], |r| r.get(0)).optional()?;
    Ok(hit.is_some())
}

/// Inserts a transaction and refreshes the cached amount of its ardoise.
pub fn insert_transaction(conn: &mut Connection, t: &NewTransaction) -> StoreResult<i64> {
    t.validate()?;
    let tx = conn.transaction()?;
    check_references(&tx, t)?;
    tx.execute(
        "INSERT INTO transactions(date, amount, category_ID, note, type, ardoise_ID)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            engine::date_key(t.date),
            t.amount.to_string(),
            t.category_id,
            t.note,
            t.kind.as_str(),
            t.ardoise_id
        ],
    )?;
    let id = tx.last_insert_rowid();
    refresh_linked(&tx, &[t.ardoise_id])?;
    tx.commit()?;
    tracing::info!(id, kind = %t.kind, amount = %t.amount, "transaction inserted");
    Ok(id)
}

/// Replaces every field of transaction `id`. Both the previous and the new
/// ardoise get their cached amount refreshed.
pub fn update_transaction(conn: &mut Connection, id: i64, t: &NewTransaction) -> StoreResult<()> {
    t.validate()?;
    let tx = conn.transaction()?;
    let before = get_transaction(&tx, id)?;
    check_references(&tx, t)?;
    tx.execute(
        "UPDATE transactions SET date=?1, amount=?2, category_ID=?3, note=?4, type=?5, ardoise_ID=?6
         WHERE id=?7",
        params![
            engine::date_key(t.date),
            t.amount.to_string(),
            t.category_id,
            t.note,
            t.kind.as_str(),
            t.ardoise_id,
            id
        ],
    )?;
    refresh_linked(&tx, &[before.ardoise_id, t.ardoise_id])?;
    tx.commit()?;
    tracing::info!(id, "transaction updated");
    Ok(())
}

pub fn delete_transaction(conn: &mut Connection, id: i64) -> StoreResult<()> {
    let tx = conn.transaction()?;
    let before = get_transaction(&tx, id)?;
    tx.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    refresh_linked(&tx, &[before.ardoise_id])?;
    tx.commit()?;
    tracing::info!(id, "transaction deleted");
    Ok(())
}

pub fn delete_all_transactions(conn: &mut Connection) -> StoreResult<usize> {
    let tx = conn.transaction()?;
    let n = tx.execute("DELETE FROM transactions", [])?;
    tx.execute("UPDATE Ardoise SET amount='0'", [])?;
    tx.commit()?;
    tracing::info!(count = n, "all transactions deleted");
    Ok(n)
}

// Categories

pub fn list_categories(conn: &Connection) -> StoreResult<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name, type, link, src FROM Categories ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, kind, link, src) = row?;
        out.push(Category {
            id,
            name: name.unwrap_or_default(),
            kind: kind.and_then(|k| k.parse().ok()),
            link,
            src,
        });
    }
    tracing::debug!(count = out.len(), "listed categories");
    Ok(out)
}

pub fn category_id_by_name(conn: &Connection, name: &str) -> StoreResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM Categories WHERE name=?1",
            params![name.trim()],
            |r| r.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn insert_category(
    conn: &Connection,
    name: &str,
    kind: TransactionType,
    link: Option<&str>,
) -> StoreResult<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Missing("Name").into());
    }
    conn.execute(
        "INSERT INTO Categories(name, link, src, type) VALUES (?1, ?2, NULL, ?3)",
        params![name, link, kind.as_str()],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, name, "category added");
    Ok(id)
}

/// Deletes a category; transactions that pointed at it become uncategorized.
pub fn delete_category(conn: &mut Connection, id: i64) -> StoreResult<()> {
    let tx = conn.transaction()?;
    if !exists(&tx, "Categories", id)? {
        return Err(StoreError::NotFound { kind: "Category", id });
    }
    let orphaned = tx.execute(
        "UPDATE transactions SET category_ID=NULL WHERE category_ID=?1",
        params![id],
    )?;
    tx.execute("DELETE FROM Categories WHERE id=?1", params![id])?;
    tx.commit()?;
    tracing::info!(id, orphaned, "category deleted");
    Ok(())
}

fn insert_defaults(conn: &Connection) -> StoreResult<usize> {
    let mut stmt =
        conn.prepare("INSERT INTO Categories(name, link, src, type) VALUES (?1, NULL, NULL, ?2)")?;
    let mut n = 0;
    for (kind, names) in [
        (TransactionType::Expense, &DEFAULT_EXPENSE_CATEGORIES[..]),
        (TransactionType::Income, &DEFAULT_INCOME_CATEGORIES[..]),
    ] {
        for name in names {
            n += stmt.execute(params![name, kind.as_str()])?;
        }
    }
    Ok(n)
}

pub fn insert_default_categories_if_empty(conn: &Connection) -> StoreResult<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM Categories", [], |r| r.get(0))?;
    if count > 0 {
        return Ok(0);
    }
    insert_defaults(conn)
}

/// Drops every category and re-inserts the default set.
pub fn reset_default_categories(conn: &mut Connection) -> StoreResult<usize> {
    let tx = conn.transaction()?;
    tx.execute("UPDATE transactions SET category_ID=NULL", [])?;
    tx.execute("DELETE FROM Categories", [])?;
    let n = insert_defaults(&tx)?;
    tx.commit()?;
    tracing::info!(count = n, "default categories restored");
    Ok(n)
}

// Ardoises

fn ardoise_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, Option<String>, Value, Option<String>)> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
}

fn to_ardoise(
    (id, name, amount, risk): (i64, Option<String>, Value, Option<String>),
) -> StoreResult<Ardoise> {
    let amount = decimal_from_value(&amount).ok_or_else(|| StoreError::InvalidRow {
        table: "Ardoise",
        column: "amount",
        value: value_text(&amount),
    })?;
    let risk = match risk.as_deref().map(str::parse::<RiskLevel>) {
        Some(Ok(r)) => r,
        _ => {
            tracing::warn!(id, risk = ?risk, "unknown risk level, using the lowest");
            RiskLevel::default()
        }
    };
    Ok(Ardoise {
        id,
        name: name.unwrap_or_default(),
        risk,
        amount,
    })
}

pub fn list_ardoises(conn: &Connection) -> StoreResult<Vec<Ardoise>> {
    let mut stmt = conn.prepare("SELECT id, name, amount, risk FROM Ardoise ORDER BY id")?;
    let rows = stmt.query_map([], ardoise_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(to_ardoise(row?)?);
    }
    tracing::debug!(count = out.len(), "listed ardoises");
    Ok(out)
}

pub fn get_ardoise(conn: &Connection, id: i64) -> StoreResult<Ardoise> {
    let row = conn
        .query_row(
            "SELECT id, name, amount, risk FROM Ardoise WHERE id=?1",
            params![id],
            ardoise_from_row,
        )
        .optional()?
        .ok_or(StoreError::NotFound { kind: "Ardoise", id })?;
    to_ardoise(row)
}

/// Looks an ardoise up by numeric id or, failing that, by exact name.
pub fn find_ardoise(conn: &Connection, key: &str) -> StoreResult<Option<Ardoise>> {
    let key = key.trim();
    if let Ok(id) = key.parse::<i64>() {
        match get_ardoise(conn, id) {
            Ok(a) => return Ok(Some(a)),
            Err(StoreError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    let id: Option<i64> = conn
        .query_row("SELECT id FROM Ardoise WHERE name=?1", params![key], |r| r.get(0))
        .optional()?;
    id.map(|id| get_ardoise(conn, id)).transpose()
}

pub fn insert_ardoise(conn: &Connection, name: &str, risk: RiskLevel) -> StoreResult<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Missing("Name").into());
    }
    conn.execute(
        "INSERT INTO Ardoise(name, amount, risk) VALUES (?1, '0', ?2)",
        params![name, risk.label()],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, name, risk = %risk, "ardoise added");
    Ok(id)
}

/// Renames or re-rates an ardoise. The amount is never written here.
pub fn update_ardoise(conn: &Connection, id: i64, name: &str, risk: RiskLevel) -> StoreResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Missing("Name").into());
    }
    let n = conn.execute(
        "UPDATE Ardoise SET name=?1, risk=?2 WHERE id=?3",
        params![name, risk.label(), id],
    )?;
    if n == 0 {
        return Err(StoreError::NotFound { kind: "Ardoise", id });
    }
    tracing::info!(id, name, risk = %risk, "ardoise updated");
    Ok(())
}

/// Deletes an ardoise; its transactions are kept and unlinked.
pub fn delete_ardoise(conn: &mut Connection, id: i64) -> StoreResult<()> {
    let tx = conn.transaction()?;
    if !exists(&tx, "Ardoise", id)? {
        return Err(StoreError::NotFound { kind: "Ardoise", id });
    }
    let unlinked = tx.execute(
        "UPDATE transactions SET ardoise_ID=NULL WHERE ardoise_ID=?1",
        params![id],
    )?;
    tx.execute("DELETE FROM Ardoise WHERE id=?1", params![id])?;
    tx.commit()?;
    tracing::info!(id, unlinked, "ardoise deleted");
    Ok(())
}

/// Recomputes the balance of ardoise `id` and writes it back onto the row.
pub fn refresh_ardoise_amount(conn: &Connection, id: i64) -> StoreResult<Decimal> {
    let linked = transactions_for_ardoise(conn, id)?;
    let balance = engine::compute_ardoise_balance(id, &linked);
    let n = conn.execute(
        "UPDATE Ardoise SET amount=?1 WHERE id=?2",
        params![balance.to_string(), id],
    )?;
    if n == 0 {
        return Err(StoreError::NotFound { kind: "Ardoise", id });
    }
    tracing::debug!(id, balance = %balance, "ardoise amount refreshed");
    Ok(balance)
}

/// Refreshes every ardoise and returns them with up-to-date amounts.
pub fn refresh_all_ardoise_amounts(conn: &mut Connection) -> StoreResult<Vec<Ardoise>> {
    let tx = conn.transaction()?;
    let transactions = list_transactions(&tx)?;
    let mut ardoises = list_ardoises(&tx)?;
    for a in ardoises.iter_mut() {
        let balance = engine::compute_ardoise_balance(a.id, &transactions);
        if balance != a.amount {
            tx.execute(
                "UPDATE Ardoise SET amount=?1 WHERE id=?2",
                params![balance.to_string(), a.id],
            )?;
            tracing::info!(id = a.id, stale = %a.amount, balance = %balance, "stale ardoise amount corrected");
            a.amount = balance;
        }
    }
    tx.commit()?;
    Ok(ardoises)
}

fn refresh_linked(conn: &Connection, ids: &[Option<i64>]) -> StoreResult<()> {
    let mut seen: Vec<i64> = Vec::new();
    for id in ids.iter().flatten() {
        if seen.contains(id) {
            continue;
        }
        seen.push(*id);
        match refresh_ardoise_amount(conn, *id) {
            Ok(_) => {}
            Err(StoreError::NotFound { .. }) => {
                tracing::warn!(id, "transaction pointed at a missing ardoise");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
