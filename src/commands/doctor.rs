// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::store;
use crate::utils::pretty_table;

/// Report wallets whose cached balance no longer matches the signed sum of
/// their transactions. Drift after `wallet set-balance` is expected; drift
/// without one points at a missed ledger adjustment.
pub fn handle(conn: &Connection, user_id: i64) -> Result<()> {
    let mut rows = Vec::new();
    for (wallet, cached, expected) in store::summary::balance_drift(conn, user_id)? {
        if cached != expected {
            rows.push(vec![
                wallet.to_string(),
                cached.to_string(),
                expected.to_string(),
                (cached - expected).to_string(),
            ]);
        }
    }

    if rows.is_empty() {
        println!("doctor: all wallet balances match transaction history");
    } else {
        println!(
            "{}",
            pretty_table(&["Wallet", "Cached", "Recomputed", "Drift"], rows)
        );
    }
    Ok(())
}
