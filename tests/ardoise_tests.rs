// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ardoise::commands::{ardoises, transactions};
use ardoise::models::RiskLevel;
use ardoise::{cli, db, store};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["ardoise"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("ardoise", m)) => ardoises::handle(conn, m),
        Some(("tx", m)) => transactions::handle(conn, m),
        _ => panic!("unexpected subcommand"),
    }
}

#[test]
fn add_defaults_to_ultra_sure_and_accepts_labels() {
    let mut conn = setup();
    run(&mut conn, &["ardoise", "add", "--name", "Savings"]).unwrap();
    run(&mut conn, &["ardoise", "add", "--name", "Crypto", "--risk", "Very High Risk"]).unwrap();
    let all = store::list_ardoises(&conn).unwrap();
    assert_eq!(all[0].risk, RiskLevel::UltraSure);
    assert_eq!(all[0].amount, Decimal::ZERO);
    assert_eq!(all[1].risk, RiskLevel::VeryHigh);

    assert!(run(&mut conn, &["ardoise", "add", "--name", "X", "--risk", "reckless"]).is_err());
    assert!(run(&mut conn, &["ardoise", "add", "--name", "   "]).is_err());
    assert_eq!(store::list_ardoises(&conn).unwrap().len(), 2);
}

#[test]
fn edit_by_name_keeps_untouched_fields() {
    let mut conn = setup();
    run(&mut conn, &["ardoise", "add", "--name", "Loan", "--risk", "high"]).unwrap();
    run(&mut conn, &["ardoise", "edit", "Loan", "--name", "Car loan"]).unwrap();
    let a = store::get_ardoise(&conn, 1).unwrap();
    assert_eq!(a.name, "Car loan");
    assert_eq!(a.risk, RiskLevel::High);
    assert!(run(&mut conn, &["ardoise", "edit", "Loan", "--name", "x"]).is_err());
}

#[test]
fn detail_lists_linked_transactions_and_refreshes_amount() {
    let mut conn = setup();
    run(&mut conn, &["ardoise", "add", "--name", "Tontine"]).unwrap();
    run(&mut conn, &["tx", "add", "--type", "expense", "--date", "2024-07-01", "--amount", "100", "--ardoise", "Tontine"]).unwrap();
    run(&mut conn, &["tx", "add", "--type", "income", "--date", "2024-07-02", "--amount", "40", "--ardoise", "Tontine"]).unwrap();
    run(&mut conn, &["tx", "add", "--type", "expense", "--date", "2024-07-02", "--amount", "9"]).unwrap();
    conn.execute("UPDATE Ardoise SET amount='0' WHERE id=?1", params![1])
        .unwrap();

    let d = ardoises::detail(&conn, "1").unwrap();
    assert_eq!(d.ardoise.amount, Decimal::from(60));
    assert_eq!(d.transactions.len(), 2);
    assert_eq!(store::get_ardoise(&conn, 1).unwrap().amount, Decimal::from(60));

    let v = serde_json::to_value(&d).unwrap();
    assert_eq!(v["name"], "Tontine");
    assert_eq!(v["transactions"].as_array().unwrap().len(), 2);

    assert!(ardoises::detail(&conn, "missing").is_err());
}

#[test]
fn list_corrects_stale_amounts() {
    let mut conn = setup();
    run(&mut conn, &["ardoise", "add", "--name", "Tontine"]).unwrap();
    run(&mut conn, &["tx", "add", "--type", "expense", "--date", "2024-07-01", "--amount", "25", "--ardoise", "1"]).unwrap();
    conn.execute("UPDATE Ardoise SET amount='999' WHERE id=1", [])
        .unwrap();
    run(&mut conn, &["ardoise", "list", "--json"]).unwrap();
    assert_eq!(store::get_ardoise(&conn, 1).unwrap().amount, Decimal::from(25));
}

#[test]
fn rm_with_yes_unlinks_transactions() {
    let mut conn = setup();
    run(&mut conn, &["ardoise", "add", "--name", "Tontine"]).unwrap();
    run(&mut conn, &["tx", "add", "--type", "expense", "--date", "2024-07-01", "--amount", "25", "--ardoise", "1"]).unwrap();
    run(&mut conn, &["ardoise", "rm", "Tontine", "--yes"]).unwrap();
    assert!(store::list_ardoises(&conn).unwrap().is_empty());
    assert_eq!(store::get_transaction(&conn, 1).unwrap().ardoise_id, None);
}
