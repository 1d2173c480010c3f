// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    let summary = store::summary::summarize(conn, user_id)?;
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &summary)? {
        println!(
            "{}",
            pretty_table(
                &["Total Income", "Total Expense", "Total Balance", "As Of"],
                vec![vec![
                    summary.total_income.to_string(),
                    summary.total_expense.to_string(),
                    summary.total_balance.to_string(),
                    summary.last_updated.clone(),
                ]]
            )
        );
    }
    Ok(())
}
