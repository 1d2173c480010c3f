// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use anyhow::Result;
use rusqlite::Connection;

use crate::errors::{Error, FieldIssue};
use crate::models::{
    Day, NewTransaction, Reason, Transaction, TransactionPatch, TxnKind, UnknownVariant,
};
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &mut Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user_id, sub)?,
        Some(("list", sub)) => list(conn, user_id, sub)?,
        Some(("get", sub)) => get(conn, user_id, sub)?,
        Some(("update", sub)) => update(conn, user_id, sub)?,
        Some(("rm", sub)) => rm(conn, user_id, sub)?,
        Some(("reasons", _)) => reasons(),
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let mut issues = Vec::new();
    let kind = parse_enum::<TxnKind>(&mut issues, "kind", sub.get_one::<String>("kind").unwrap());
    let reason =
        parse_enum::<Reason>(&mut issues, "reason", sub.get_one::<String>("reason").unwrap());
    let payment = parse_enum::<crate::models::PaymentType>(
        &mut issues,
        "payment_type",
        sub.get_one::<String>("payment").unwrap(),
    );
    let amount = parse_amount(&mut issues, sub.get_one::<String>("amount").unwrap());
    let date = parse_english_date(&mut issues, sub.get_one::<String>("date").unwrap());
    let day = match sub.get_one::<String>("day") {
        Some(raw) => parse_enum::<Day>(&mut issues, "day", raw),
        None => date.map(Day::from_date),
    };
    if !issues.is_empty() {
        return Err(Error::Validation(issues).into());
    }

    let new = NewTransaction {
        day: day.unwrap(),
        nepali_date: sub.get_one::<String>("nepali-date").unwrap().clone(),
        english_date: date.unwrap(),
        kind: kind.unwrap(),
        amount: amount.unwrap(),
        reason: reason.unwrap(),
        payment_type: payment.unwrap(),
        notes: sub.get_one::<String>("notes").cloned(),
    };
    let created = store::transactions::create(conn, user_id, &new)?;
    println!(
        "Recorded {} {} for {} via {} (id: {})",
        created.kind, created.amount, created.reason, created.payment_type, created.id
    );
    Ok(())
}

fn list(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = list_rows(conn, user_id, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(COLUMNS, data.iter().map(table_row).collect()));
    }
    Ok(())
}

/// Rows for `tx list`, honoring `--limit`. Split out so tests can drive it
/// through the parsed CLI.
pub fn list_rows(
    conn: &Connection,
    user_id: i64,
    sub: &clap::ArgMatches,
) -> Result<Vec<Transaction>> {
    let mut data = store::transactions::list(conn, user_id)?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}

fn get(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let txn = store::transactions::get(conn, user_id, id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &txn)? {
        println!("{}", pretty_table(COLUMNS, vec![table_row(&txn)]));
    }
    Ok(())
}

fn update(conn: &mut Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;

    let mut issues = Vec::new();
    let patch = TransactionPatch {
        day: sub
            .get_one::<String>("day")
            .and_then(|raw| parse_enum(&mut issues, "day", raw)),
        nepali_date: sub.get_one::<String>("nepali-date").cloned(),
        english_date: sub
            .get_one::<String>("date")
            .and_then(|raw| parse_english_date(&mut issues, raw)),
        kind: sub
            .get_one::<String>("kind")
            .and_then(|raw| parse_enum(&mut issues, "kind", raw)),
        amount: sub
            .get_one::<String>("amount")
            .and_then(|raw| parse_amount(&mut issues, raw)),
        reason: sub
            .get_one::<String>("reason")
            .and_then(|raw| parse_enum(&mut issues, "reason", raw)),
        payment_type: sub
            .get_one::<String>("payment")
            .and_then(|raw| parse_enum(&mut issues, "payment_type", raw)),
        notes: sub.get_one::<String>("notes").cloned(),
    };
    if !issues.is_empty() {
        return Err(Error::Validation(issues).into());
    }

    let updated = store::transactions::update(conn, user_id, id, &patch)?;
    println!(
        "Updated transaction {} ({} {} via {})",
        updated.id, updated.kind, updated.amount, updated.payment_type
    );
    Ok(())
}

fn rm(conn: &mut Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    store::transactions::delete(conn, user_id, id)?;
    println!("Removed transaction {}", id);
    Ok(())
}

fn reasons() {
    for reason in Reason::ALL {
        println!("{}", reason);
    }
}

const COLUMNS: &[&str] = &[
    "ID", "Date", "Nepali", "Day", "Kind", "Amount", "Reason", "Wallet", "Notes",
];

fn table_row(t: &Transaction) -> Vec<String> {
    vec![
        t.id.to_string(),
        t.english_date.to_string(),
        t.nepali_date.clone(),
        t.day.to_string(),
        t.kind.to_string(),
        t.amount.to_string(),
        t.reason.to_string(),
        t.payment_type.to_string(),
        t.notes.clone().unwrap_or_default(),
    ]
}

fn parse_id(raw: &str) -> Result<i64, Error> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::Validation(vec![FieldIssue::new("id", "must be an integer")]))
}

fn parse_enum<T: FromStr<Err = UnknownVariant>>(
    issues: &mut Vec<FieldIssue>,
    field: &'static str,
    raw: &str,
) -> Option<T> {
    match raw.parse() {
        Ok(v) => Some(v),
        Err(e) => {
            issues.push(FieldIssue::new(field, e.to_string()));
            None
        }
    }
}

fn parse_amount(issues: &mut Vec<FieldIssue>, raw: &str) -> Option<rust_decimal::Decimal> {
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            issues.push(FieldIssue::new("amount", "must be a decimal number"));
            None
        }
    }
}

fn parse_english_date(issues: &mut Vec<FieldIssue>, raw: &str) -> Option<chrono::NaiveDate> {
    match chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            issues.push(FieldIssue::new("english_date", "expected YYYY-MM-DD"));
            None
        }
    }
}
