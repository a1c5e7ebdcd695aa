// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::compute_ardoise_balance;
use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = find_issues(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn find_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Transactions pointing at deleted categories (older snapshots have no FK)
    let mut stmt = conn.prepare(
        "SELECT t.id, t.category_ID FROM transactions t
         WHERE t.category_ID IS NOT NULL
           AND NOT EXISTS (SELECT 1 FROM Categories c WHERE c.id=t.category_ID)
         ORDER BY t.id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let cat: i64 = r.get(1)?;
        rows.push(vec![
            "dangling_category".into(),
            format!("transaction {} -> category {}", id, cat),
        ]);
    }

    // 2) Same for ardoises
    let mut stmt2 = conn.prepare(
        "SELECT t.id, t.ardoise_ID FROM transactions t
         WHERE t.ardoise_ID IS NOT NULL
           AND NOT EXISTS (SELECT 1 FROM Ardoise a WHERE a.id=t.ardoise_ID)
         ORDER BY t.id",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let ard: i64 = r.get(1)?;
        rows.push(vec![
            "dangling_ardoise".into(),
            format!("transaction {} -> ardoise {}", id, ard),
        ]);
    }

    // 3) Cached ardoise amounts that no longer match their transactions
    let transactions = store::list_transactions(conn)?;
    for a in store::list_ardoises(conn)? {
        let balance = compute_ardoise_balance(a.id, &transactions);
        if balance != a.amount {
            rows.push(vec![
                "stale_ardoise_amount".into(),
                format!("{} ({}): cached {}, actual {}", a.name, a.id, a.amount, balance),
            ]);
        }
    }

    Ok(rows)
}
