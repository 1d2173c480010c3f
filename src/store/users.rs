// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Owner scope. Every transaction and wallet row is partitioned by a user
//! id; resolving a user also provisions their fixed wallet set.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::errors::Result;
use crate::store::wallets;

/// Look up the named owner, creating it (and its seven zero-balance
/// wallets) on first use.
pub fn resolve(conn: &Connection, name: &str) -> Result<i64> {
    let existing: Option<i64> = conn
        .query_row("SELECT id FROM users WHERE name=?1", params![name], |r| {
            r.get(0)
        })
        .optional()?;
    let id = match existing {
        Some(id) => id,
        None => {
            conn.execute("INSERT OR IGNORE INTO users(name) VALUES (?1)", params![name])?;
            let id = conn.query_row("SELECT id FROM users WHERE name=?1", params![name], |r| {
                r.get(0)
            })?;
            debug!(user = name, id, "created user");
            id
        }
    };
    wallets::ensure_provisioned(conn, id)?;
    Ok(id)
}
