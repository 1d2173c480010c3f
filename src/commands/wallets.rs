// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::errors::{Error, FieldIssue};
use crate::models::{PaymentMethod, PaymentType};
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, user_id, sub)?,
        Some(("get", sub)) => get(conn, user_id, sub)?,
        Some(("set-balance", sub)) => set_balance(conn, user_id, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let data = store::wallets::list(conn, user_id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!(
            "{}",
            pretty_table(
                &["Wallet", "Balance", "Updated"],
                data.iter().map(table_row).collect()
            )
        );
    }
    Ok(())
}

fn get(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let name = parse_name(sub.get_one::<String>("name").unwrap())?;
    let method = store::wallets::get_by_name(conn, user_id, name)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &method)? {
        println!(
            "{}",
            pretty_table(&["Wallet", "Balance", "Updated"], vec![table_row(&method)])
        );
    }
    Ok(())
}

fn set_balance(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let name = parse_name(sub.get_one::<String>("name").unwrap())?;
    let balance = sub
        .get_one::<String>("balance")
        .unwrap()
        .trim()
        .parse()
        .map_err(|_| {
            Error::Validation(vec![FieldIssue::new("balance", "must be a decimal number")])
        })?;
    let updated = store::wallets::set_balance(conn, user_id, name, balance)?;
    println!("Set {} balance to {}", updated.name, updated.balance);
    Ok(())
}

/// A name outside the fixed wallet set is a validation failure, not a
/// missing row.
fn parse_name(raw: &str) -> Result<PaymentType, Error> {
    raw.parse::<PaymentType>()
        .map_err(|e| Error::Validation(vec![FieldIssue::new("name", e.to_string())]))
}

fn table_row(m: &PaymentMethod) -> Vec<String> {
    vec![
        m.name.to_string(),
        m.balance.to_string(),
        m.updated_at.clone(),
    ]
}
