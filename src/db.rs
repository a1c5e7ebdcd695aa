// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use crate::store;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.ardoise", "Ardoise", "ardoise"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("ardoise.sqlite"))
}

pub fn open_or_init(path: Option<&Path>) -> Result<Connection> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => db_path()?,
    };
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

/// Copies the seed snapshot to `target` when the target is missing or empty.
///
/// `source` is a local path or an `http(s)://` URL. Returns whether a copy
/// happened; an existing non-empty database is left alone.
pub fn ensure_seed(target: &Path, source: &str) -> Result<bool> {
    let needs_copy = match fs::metadata(target) {
        Ok(meta) => meta.len() == 0,
        Err(_) => true,
    };
    if !needs_copy {
        tracing::info!(target = %target.display(), "database file already exists, seed skipped");
        return Ok(false);
    }
    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        let resp = crate::utils::http_client()?
            .get(source)
            .send()
            .with_context(|| format!("Download seed database from {}", source))?
            .error_for_status()?;
        resp.bytes()?.to_vec()
    } else {
        fs::read(source).with_context(|| format!("Read seed database {}", source))?
    };
    if bytes.is_empty() {
        anyhow::bail!("Seed database {} is empty", source);
    }
    fs::write(target, &bytes)
        .with_context(|| format!("Write seed database to {}", target.display()))?;
    tracing::info!(source, target = %target.display(), bytes = bytes.len(), "seed database copied");
    Ok(true)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS Categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT UNIQUE,
        link TEXT,
        src TEXT,
        type TEXT CHECK(type IN ('expense', 'income'))
    );

    CREATE TABLE IF NOT EXISTS Ardoise(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        amount TEXT NOT NULL DEFAULT '0',
        risk TEXT
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        category_ID INTEGER,
        note TEXT,
        type TEXT,
        ardoise_ID INTEGER,
        FOREIGN KEY(category_ID) REFERENCES Categories(id) ON DELETE SET NULL,
        FOREIGN KEY(ardoise_ID) REFERENCES Ardoise(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    "#,
    )?;
    migrate(conn)?;

    let tx = conn.transaction()?;
    let seeded = store::insert_default_categories_if_empty(&tx)?;
    tx.commit()?;
    if seeded > 0 {
        tracing::info!(count = seeded, "default categories inserted");
    }
    Ok(())
}

// Seed snapshots predate the ardoise link column.
fn migrate(conn: &Connection) -> Result<()> {
    if !has_column(conn, "transactions", "ardoise_ID")? {
        conn.execute_batch("ALTER TABLE transactions ADD COLUMN ardoise_ID INTEGER")?;
        tracing::info!("added transactions.ardoise_ID column");
    }
    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_transactions_ardoise ON transactions(ardoise_ID)")?;
    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |r| r.get::<_, String>(1))?;
    for name in names {
        if name?.eq_ignore_ascii_case(column) {
            return Ok(true);
        }
    }
    Ok(false)
}
