// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction CRUD. Every mutation persists the row and feeds the balance
//! ledger inside one SQLite transaction, so the two writes land together.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::errors::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionPatch};
use crate::store::ledger::{apply_delta, signed_delta};

const SELECT_COLS: &str = "id, user_id, day, nepali_date, english_date, kind, amount, \
                           reason, payment_type, notes, created_at";

/// All transactions for the owner, most recent Gregorian date first;
/// equal dates keep insertion order.
pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLS} FROM transactions WHERE user_id=?1 \
         ORDER BY english_date DESC, id ASC"
    ))?;
    let mut rows = stmt.query(params![user_id])?;
    let mut txns = Vec::new();
    while let Some(r) = rows.next()? {
        txns.push(read_txn(r)?);
    }
    Ok(txns)
}

pub fn get(conn: &Connection, user_id: i64, id: i64) -> Result<Transaction> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLS} FROM transactions WHERE user_id=?1 AND id=?2"
    ))?;
    let found = stmt
        .query_row(params![user_id, id], |r| raw_parts(r))
        .optional()?;
    match found {
        Some(parts) => txn_from_parts(parts),
        None => Err(Error::not_found("transaction", id)),
    }
}

/// Validate, persist and apply the create-path ledger delta. Returns the
/// persisted entity with its server-assigned id and timestamp.
pub fn create(conn: &mut Connection, user_id: i64, new: &NewTransaction) -> Result<Transaction> {
    new.validate()?;
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO transactions(user_id, day, nepali_date, english_date, kind, amount, \
                                  reason, payment_type, notes) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            user_id,
            new.day.as_str(),
            new.nepali_date,
            new.english_date.to_string(),
            new.kind.as_str(),
            new.amount.to_string(),
            new.reason.as_str(),
            new.payment_type.as_str(),
            new.notes,
        ],
    )?;
    let id = tx.last_insert_rowid();
    apply_delta(
        &tx,
        user_id,
        new.payment_type,
        signed_delta(new.kind, new.amount),
    )?;
    let created = get(&tx, user_id, id)?;
    tx.commit()?;
    debug!(id, kind = %created.kind, amount = %created.amount, "recorded transaction");
    Ok(created)
}

/// Merge a partial payload over the stored row. The ledger only runs when
/// one of {payment_type, amount, kind} is present in the patch: the old
/// row's effect is reverted and the merged row's effect applied, possibly
/// against two different wallets.
pub fn update(
    conn: &mut Connection,
    user_id: i64,
    id: i64,
    patch: &TransactionPatch,
) -> Result<Transaction> {
    patch.validate()?;
    let tx = conn.transaction()?;
    let existing = get(&tx, user_id, id)?;
    let merged = patch.merged_over(&existing);

    if patch.touches_ledger() {
        apply_delta(
            &tx,
            user_id,
            existing.payment_type,
            -signed_delta(existing.kind, existing.amount),
        )?;
        apply_delta(
            &tx,
            user_id,
            merged.payment_type,
            signed_delta(merged.kind, merged.amount),
        )?;
    }

    tx.execute(
        "UPDATE transactions SET day=?3, nepali_date=?4, english_date=?5, kind=?6, \
         amount=?7, reason=?8, payment_type=?9, notes=?10 \
         WHERE user_id=?1 AND id=?2",
        params![
            user_id,
            id,
            merged.day.as_str(),
            merged.nepali_date,
            merged.english_date.to_string(),
            merged.kind.as_str(),
            merged.amount.to_string(),
            merged.reason.as_str(),
            merged.payment_type.as_str(),
            merged.notes,
        ],
    )?;
    tx.commit()?;
    debug!(id, "updated transaction");
    Ok(merged)
}

/// Remove the row after reverting its effect on the wallet balance.
pub fn delete(conn: &mut Connection, user_id: i64, id: i64) -> Result<()> {
    let tx = conn.transaction()?;
    let existing = get(&tx, user_id, id)?;
    apply_delta(
        &tx,
        user_id,
        existing.payment_type,
        -signed_delta(existing.kind, existing.amount),
    )?;
    tx.execute(
        "DELETE FROM transactions WHERE user_id=?1 AND id=?2",
        params![user_id, id],
    )?;
    tx.commit()?;
    debug!(id, "deleted transaction");
    Ok(())
}

type RawParts = (
    i64,
    i64,
    String,
    String,
    chrono::NaiveDate,
    String,
    String,
    String,
    String,
    Option<String>,
    String,
);

fn raw_parts(r: &Row<'_>) -> rusqlite::Result<RawParts> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
        r.get(8)?,
        r.get(9)?,
        r.get(10)?,
    ))
}

fn read_txn(r: &Row<'_>) -> Result<Transaction> {
    txn_from_parts(raw_parts(r)?)
}

fn txn_from_parts(parts: RawParts) -> Result<Transaction> {
    let (id, user_id, day, nepali_date, english_date, kind, amount, reason, payment, notes, created_at) =
        parts;
    let corrupt = |e: crate::models::UnknownVariant| Error::Unexpected(e.to_string());
    Ok(Transaction {
        id,
        user_id,
        day: day.parse().map_err(corrupt)?,
        nepali_date,
        english_date,
        kind: kind.parse().map_err(corrupt)?,
        amount: amount
            .parse()
            .map_err(|_| Error::Unexpected(format!("invalid amount '{amount}' on row {id}")))?,
        reason: reason.parse().map_err(corrupt)?,
        payment_type: payment.parse().map_err(corrupt)?,
        notes,
        created_at,
    })
}
