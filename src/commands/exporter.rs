// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{posting, users};
use crate::models::UserId;
use anyhow::{bail, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;

    let entries = posting::transactions_for_user(
        conn,
        UserId(user.id),
        &posting::TransactionFilter::default(),
    )?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date", "account", "category", "type", "amount", "currency", "note",
            ])?;
            for e in &entries {
                wtr.write_record([
                    e.date.to_string(),
                    e.account.clone(),
                    e.category.clone().unwrap_or_default(),
                    e.kind.as_str().to_string(),
                    e.amount.to_string(),
                    e.currency.clone(),
                    e.description.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for e in &entries {
                items.push(json!({
                    "date": e.date, "account": e.account, "category": e.category,
                    "type": e.kind, "amount": e.amount, "currency": e.currency,
                    "note": e.description
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} transaction(s) to {}", entries.len(), out);
    Ok(())
}
