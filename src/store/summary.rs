// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only aggregates, recomputed by full rescan on every call.

use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use crate::errors::{Error, Result};
use crate::models::{PaymentType, Summary, TxnKind};
use crate::store::wallets;

pub fn summarize(conn: &Connection, user_id: i64) -> Result<Summary> {
    let mut stmt =
        conn.prepare("SELECT kind, amount FROM transactions WHERE user_id=?1")?;
    let mut rows = stmt.query(params![user_id])?;

    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let kind: String = r.get(0)?;
        let amount: String = r.get(1)?;
        let kind: TxnKind = kind
            .parse()
            .map_err(|e: crate::models::UnknownVariant| Error::Unexpected(e.to_string()))?;
        let amount: Decimal = amount
            .parse()
            .map_err(|_| Error::Unexpected(format!("invalid amount '{amount}'")))?;
        match kind {
            TxnKind::Income => total_income += amount,
            TxnKind::Expense => total_expense += amount,
        }
    }

    // total_balance sums the cached wallet balances, not income - expense:
    // a manual override is allowed to move them apart.
    let mut total_balance = Decimal::ZERO;
    for method in wallets::list(conn, user_id)? {
        total_balance += method.balance;
    }

    Ok(Summary {
        total_income,
        total_expense,
        total_balance,
        last_updated: chrono::Utc::now().to_rfc3339(),
    })
}

/// Cached balance next to the signed transaction sum, per wallet. Drift is
/// expected after a manual override; anything else points at a missed
/// ledger adjustment. Used by `khata doctor`.
pub fn balance_drift(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<(PaymentType, Decimal, Decimal)>> {
    let mut drift = Vec::new();
    for method in wallets::list(conn, user_id)? {
        let expected = expected_balance(conn, user_id, method.name)?;
        drift.push((method.name, method.balance, expected));
    }
    Ok(drift)
}

// The recompute walks the rows in Decimal; a REAL-typed SUM in SQL loses
// long decimal tails.
fn expected_balance(conn: &Connection, user_id: i64, method: PaymentType) -> Result<Decimal> {
    let mut stmt = conn.prepare(
        "SELECT kind, amount FROM transactions WHERE user_id=?1 AND payment_type=?2",
    )?;
    let mut rows = stmt.query(params![user_id, method.as_str()])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let kind: String = r.get(0)?;
        let amount: String = r.get(1)?;
        let amount: Decimal = amount
            .parse()
            .map_err(|_| Error::Unexpected(format!("invalid amount '{amount}'")))?;
        if kind == TxnKind::Income.as_str() {
            total += amount;
        } else {
            total -= amount;
        }
    }
    Ok(total)
}
