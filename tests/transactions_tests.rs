// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ardoise::{cli, commands::transactions, db, store};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    store::insert_ardoise(&conn, "Tontine", Default::default()).unwrap();
    conn
}

fn run(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["ardoise", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", tx_m)) => transactions::handle(conn, tx_m),
        _ => panic!("no tx subcommand"),
    }
}

#[test]
fn add_then_list_groups_newest_day_first() {
    let mut conn = setup();
    run(&mut conn, &["add", "--type", "expense", "--date", "2024-07-01", "--amount", "100", "--category", "Transportation"]).unwrap();
    run(&mut conn, &["add", "--type", "income", "--date", "2024-07-03", "--amount", "250", "--note", "stipend"]).unwrap();
    run(&mut conn, &["add", "--type", "expense", "--date", "2024-07-01", "--amount", "12.50"]).unwrap();

    let groups = transactions::query_groups(&conn).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].date, "2024-07-03");
    assert_eq!(groups[1].date, "2024-07-01");
    assert_eq!(groups[1].transactions.len(), 2);
    // no display link on defaults, so the name is shown
    assert_eq!(groups[1].transactions[0].category, "Transportation");
    assert_eq!(groups[1].transactions[1].amount, "12.50");
    assert_eq!(groups[0].transactions[0].note, "stipend");
}

#[test]
fn add_links_ardoise_by_name_and_updates_cache() {
    let mut conn = setup();
    run(&mut conn, &["add", "--type", "expense", "--date", "2024-07-01", "--amount", "100", "--ardoise", "Tontine"]).unwrap();
    run(&mut conn, &["add", "--type", "income", "--date", "2024-07-01", "--amount", "40", "--ardoise", "1"]).unwrap();
    assert_eq!(store::get_ardoise(&conn, 1).unwrap().amount, Decimal::from(60));
}

#[test]
fn add_rejects_bad_input_without_writing() {
    let mut conn = setup();
    assert!(run(&mut conn, &["add", "--type", "expense", "--date", "07/01/2024", "--amount", "1"]).is_err());
    assert!(run(&mut conn, &["add", "--type", "expense", "--date", "2024-07-01", "--amount", "-3"]).is_err());
    assert!(run(&mut conn, &["add", "--type", "expense", "--date", "2024-07-01", "--amount", "3", "--category", "Nope"]).is_err());
    assert!(store::list_transactions(&conn).unwrap().is_empty());
}

#[test]
fn edit_changes_only_given_fields() {
    let mut conn = setup();
    run(&mut conn, &["add", "--type", "expense", "--date", "2024-07-01", "--amount", "100", "--ardoise", "Tontine", "--note", "first"]).unwrap();
    run(&mut conn, &["edit", "1", "--amount", "70"]).unwrap();
    let t = store::get_transaction(&conn, 1).unwrap();
    assert_eq!(t.amount, Decimal::from(70));
    assert_eq!(t.note.as_deref(), Some("first"));
    assert_eq!(store::get_ardoise(&conn, 1).unwrap().amount, Decimal::from(70));

    run(&mut conn, &["edit", "1", "--no-ardoise", "--type", "income"]).unwrap();
    let t = store::get_transaction(&conn, 1).unwrap();
    assert_eq!(t.ardoise_id, None);
    assert_eq!(t.kind.as_str(), "income");
    assert_eq!(store::get_ardoise(&conn, 1).unwrap().amount, Decimal::ZERO);
}

#[test]
fn rm_with_yes_deletes() {
    let mut conn = setup();
    run(&mut conn, &["add", "--type", "expense", "--date", "2024-07-01", "--amount", "5"]).unwrap();
    run(&mut conn, &["rm", "1", "--yes"]).unwrap();
    assert!(store::list_transactions(&conn).unwrap().is_empty());
    assert!(run(&mut conn, &["rm", "1", "--yes"]).is_err());
}

#[test]
fn add_returns_the_new_id() {
    let mut conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "ardoise", "tx", "add", "--type", "income", "--date", "2024-07-01", "--amount", "10",
    ]);
    let tx_m = matches.subcommand_matches("tx").unwrap();
    let add_m = tx_m.subcommand_matches("add").unwrap();
    let id = transactions::add(&mut conn, add_m).unwrap();
    assert_eq!(store::get_transaction(&conn, id).unwrap().amount, Decimal::from(10));
}

#[test]
fn add_rejects_amount_above_limit() {
    let mut conn = setup();
    let huge = "50000000000000000000000000000";
    assert!(run(&mut conn, &["add", "--type", "expense", "--date", "2024-07-01", "--amount", huge, "--ardoise", "Tontine"]).is_err());
    assert!(store::list_transactions(&conn).unwrap().is_empty());
    assert_eq!(store::get_ardoise(&conn, 1).unwrap().amount, Decimal::ZERO);
}
