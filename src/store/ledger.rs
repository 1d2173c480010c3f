// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance bookkeeping for payment methods.
//!
//! Balances are maintained incrementally: every transaction mutation feeds
//! one or two signed deltas through [`apply_delta`] instead of rescanning
//! the transaction set. The callers in `store::transactions` run each
//! mutation and its deltas inside a single SQLite transaction, so the row
//! write and the balance write commit (or roll back) together, and SQLite's
//! write lock serializes concurrent adjustments to the same wallet.

use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::errors::{Error, Result};
use crate::models::{PaymentType, TxnKind};

/// The signed effect of a transaction on its wallet: Income adds the
/// amount, Expense subtracts it. Amounts themselves are always positive.
pub fn signed_delta(kind: TxnKind, amount: Decimal) -> Decimal {
    match kind {
        TxnKind::Income => amount,
        TxnKind::Expense => -amount,
    }
}

/// Add `delta` to the cached balance of `(user_id, method)` and refresh its
/// updated timestamp. A negative resulting balance is a valid state.
///
/// If the wallet row is missing (a skipped seed, or a provisioning race)
/// it is created with `delta` as its starting balance rather than failing
/// the transaction mutation that triggered the adjustment.
pub fn apply_delta(
    conn: &Connection,
    user_id: i64,
    method: PaymentType,
    delta: Decimal,
) -> Result<()> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT balance FROM payment_methods WHERE user_id=?1 AND name=?2",
            params![user_id, method.as_str()],
            |r| r.get(0),
        )
        .optional()?;

    match existing {
        Some(raw) => {
            let balance = parse_balance(&raw, method)?;
            write_balance(conn, user_id, method, balance + delta)?;
            debug!(wallet = %method, %delta, "adjusted balance");
        }
        None => {
            warn!(wallet = %method, "wallet missing at adjustment time; creating");
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO payment_methods(user_id, name, balance) \
                 VALUES (?1, ?2, ?3)",
                params![user_id, method.as_str(), delta.to_string()],
            )?;
            if inserted == 0 {
                // Lost a creation race; the row exists now, so fold the
                // delta into it instead of surfacing a conflict.
                let raw: String = conn.query_row(
                    "SELECT balance FROM payment_methods WHERE user_id=?1 AND name=?2",
                    params![user_id, method.as_str()],
                    |r| r.get(0),
                )?;
                let balance = parse_balance(&raw, method)?;
                write_balance(conn, user_id, method, balance + delta)?;
            }
        }
    }
    Ok(())
}

fn write_balance(
    conn: &Connection,
    user_id: i64,
    method: PaymentType,
    balance: Decimal,
) -> Result<()> {
    conn.execute(
        "UPDATE payment_methods SET balance=?3, updated_at=datetime('now') \
         WHERE user_id=?1 AND name=?2",
        params![user_id, method.as_str(), balance.to_string()],
    )?;
    Ok(())
}

pub(crate) fn parse_balance(raw: &str, method: PaymentType) -> Result<Decimal> {
    raw.parse::<Decimal>().map_err(|_| {
        tracing::error!(wallet = %method, balance = raw, "corrupt balance value");
        Error::Unexpected(format!("invalid balance '{raw}' for wallet {method}"))
    })
}
