// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::store;

pub fn handle(conn: &Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, user_id, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut txns = store::transactions::list(conn, user_id)?;
    // chronological for exports, oldest first
    txns.sort_by_key(|t| (t.english_date, t.id));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "english_date",
                "nepali_date",
                "day",
                "kind",
                "amount",
                "reason",
                "payment_type",
                "notes",
                "created_at",
            ])?;
            for t in &txns {
                wtr.write_record([
                    t.id.to_string(),
                    t.english_date.to_string(),
                    t.nepali_date.clone(),
                    t.day.to_string(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    t.reason.to_string(),
                    t.payment_type.to_string(),
                    t.notes.clone().unwrap_or_default(),
                    t.created_at.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&txns)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} transactions to {}", txns.len(), out);
    Ok(())
}
