// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::fx;
use crate::utils::{http_client, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let from = sub.get_one::<String>("from").unwrap().to_uppercase();
            let to = sub.get_one::<String>("to").unwrap().to_uppercase();
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
            fx::set_rate(conn, &from, &to, rate)?;
            println!("Rate set: 1 {} = {} {}", from, rate, to);
        }
        Some(("list", _)) => list_rates(conn)?,
        Some(("fetch", _)) => fetch_rates(conn)?,
        Some(("convert", sub)) => convert_amount(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn list_rates(conn: &Connection) -> Result<()> {
    let mut data = Vec::new();
    for r in fx::list_rates(conn)? {
        data.push(vec![
            r.from_currency,
            r.to_currency,
            r.rate.to_string(),
            r.last_updated,
        ]);
    }
    println!("{}", pretty_table(&["From", "To", "Rate", "Updated"], data));
    Ok(())
}

/// Currencies the ledger actually uses: account denominations plus every
/// user's main currency.
fn currencies_in_use(conn: &Connection) -> Result<Vec<String>> {
    let mut out = Vec::<String>::new();
    for sql in [
        "SELECT DISTINCT currency FROM accounts",
        "SELECT DISTINCT main_currency FROM users",
    ] {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        for row in rows {
            let c: String = row?;
            if !c.is_empty() && !out.contains(&c) {
                out.push(c);
            }
        }
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
struct Latest {
    rates: std::collections::HashMap<String, f64>,
    #[serde(rename = "base")]
    _base: String,
}

/// Pulls current quotes via Frankfurter (ECB), one request per base so each
/// direction is stored as its own independently sourced row.
fn fetch_rates(conn: &Connection) -> Result<()> {
    let ccy_list = currencies_in_use(conn)?;
    if ccy_list.len() < 2 {
        println!("Fewer than two currencies in use; nothing to fetch.");
        return Ok(());
    }
    let client = http_client()?;
    let mut stored = 0usize;
    for base in &ccy_list {
        let targets: Vec<String> = ccy_list.iter().filter(|c| *c != base).cloned().collect();
        let url = format!(
            "https://api.frankfurter.dev/latest?from={}&to={}",
            base,
            targets.join(",")
        );
        let resp = client.get(url).send()?.error_for_status()?;
        let s: Latest = resp.json()?;
        for (quote, rate) in s.rates {
            let rate = Decimal::try_from(rate)
                .with_context(|| format!("Invalid rate '{}' for {}/{}", rate, base, quote))?;
            fx::set_rate(conn, base, &quote, rate)?;
            stored += 1;
        }
    }
    println!("Stored {} directional rate(s) via Frankfurter (ECB).", stored);
    Ok(())
}

fn convert_amount(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from = sub.get_one::<String>("from").unwrap().to_uppercase();
    let to = sub.get_one::<String>("to").unwrap().to_uppercase();
    let res = fx::convert(conn, amount, &from, &to)?;
    println!("{} {} -> {:.4} {}", amount, from, res, to);
    Ok(())
}
