// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;

use ardoise::{cli, commands, db, logging};

fn main() -> Result<()> {
    logging::init_tracing();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let path = match matches.get_one::<PathBuf>("db") {
        Some(p) => p.clone(),
        None => db::db_path()?,
    };
    if let Some(("init", sub)) = matches.subcommand() {
        if let Some(seed) = sub.get_one::<String>("seed") {
            if db::ensure_seed(&path, seed)? {
                println!("Seed database copied from {}", seed);
            }
        }
    }

    let mut conn = db::open_or_init(Some(&path))?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", path.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut conn, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut conn, sub)?,
        Some(("ardoise", sub)) => commands::ardoises::handle(&mut conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
