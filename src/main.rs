// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use khata::{cli, commands, db, store};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;
    let user = matches.get_one::<String>("user").expect("has default");

    match matches.subcommand() {
        Some(("init", _)) => {
            store::users::resolve(&conn, user)?;
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("tx", sub)) => {
            let user_id = store::users::resolve(&conn, user)?;
            commands::transactions::handle(&mut conn, user_id, sub)?;
        }
        Some(("wallet", sub)) => {
            let user_id = store::users::resolve(&conn, user)?;
            commands::wallets::handle(&conn, user_id, sub)?;
        }
        Some(("summary", sub)) => {
            let user_id = store::users::resolve(&conn, user)?;
            commands::summary::handle(&conn, user_id, sub)?;
        }
        Some(("doctor", _)) => {
            let user_id = store::users::resolve(&conn, user)?;
            commands::doctor::handle(&conn, user_id)?;
        }
        Some(("export", sub)) => {
            let user_id = store::users::resolve(&conn, user)?;
            commands::exporter::handle(&conn, user_id, sub)?;
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
