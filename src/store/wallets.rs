// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Payment-method rows: lookup, provisioning, manual balance override.

use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::models::{PaymentMethod, PaymentType};
use crate::store::ledger::parse_balance;

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<PaymentMethod>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, balance, updated_at FROM payment_methods \
         WHERE user_id=?1 ORDER BY name",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut methods = Vec::new();
    while let Some(r) = rows.next()? {
        methods.push(read_method(r)?);
    }
    Ok(methods)
}

pub fn get_by_name(conn: &Connection, user_id: i64, name: PaymentType) -> Result<PaymentMethod> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, balance, updated_at FROM payment_methods \
         WHERE user_id=?1 AND name=?2",
    )?;
    let method = stmt
        .query_row(params![user_id, name.as_str()], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, i64>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
            ))
        })
        .optional()?;
    match method {
        Some(parts) => method_from_parts(parts),
        None => Err(Error::not_found("payment method", name)),
    }
}

/// Create a zero-balance row for every fixed payment type this owner does
/// not have yet. Idempotent: the unique index on (user_id, name) turns a
/// concurrent duplicate creation into a skipped insert instead of an error.
pub fn ensure_provisioned(conn: &Connection, user_id: i64) -> Result<()> {
    for method in PaymentType::ALL {
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO payment_methods(user_id, name) VALUES (?1, ?2)",
            params![user_id, method.as_str()],
        )?;
        if inserted > 0 {
            debug!(wallet = %method, user_id, "provisioned wallet");
        }
    }
    Ok(())
}

/// Direct balance override, independent of transaction-derived deltas.
/// Using this can legitimately diverge `total_balance` from the
/// transaction history; `khata doctor` reports such drift.
pub fn set_balance(
    conn: &Connection,
    user_id: i64,
    name: PaymentType,
    balance: Decimal,
) -> Result<PaymentMethod> {
    let updated = conn.execute(
        "UPDATE payment_methods SET balance=?3, updated_at=datetime('now') \
         WHERE user_id=?1 AND name=?2",
        params![user_id, name.as_str(), balance.to_string()],
    )?;
    if updated == 0 {
        return Err(Error::not_found("payment method", name));
    }
    get_by_name(conn, user_id, name)
}

fn read_method(r: &rusqlite::Row<'_>) -> Result<PaymentMethod> {
    method_from_parts((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
}

fn method_from_parts(
    (id, user_id, name, balance, updated_at): (i64, i64, String, String, String),
) -> Result<PaymentMethod> {
    let name: PaymentType = name
        .parse()
        .map_err(|e: crate::models::UnknownVariant| Error::Unexpected(e.to_string()))?;
    let balance = parse_balance(&balance, name)?;
    Ok(PaymentMethod {
        id,
        user_id,
        name,
        balance,
        updated_at,
    })
}
