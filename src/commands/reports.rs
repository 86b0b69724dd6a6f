// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{posting, users};
use crate::models::{TransactionType, UserId};
use crate::utils::{maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use chrono::{Months, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("overview", sub)) => overview(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn window_totals(
    conn: &Connection,
    user: UserId,
    start: NaiveDate,
    end: NaiveDate,
    kind: TransactionType,
) -> Result<(Decimal, usize)> {
    let filter = posting::TransactionFilter {
        start_date: Some(start),
        end_date: Some(end),
        kind: Some(kind),
        ..Default::default()
    };
    let entries = posting::transactions_for_user(conn, user, &filter)?;
    let total: Decimal = entries.iter().map(|e| e.amount).sum();
    Ok((total, entries.len()))
}

#[derive(Serialize)]
struct Overview {
    total: Decimal,
    daily_average: Decimal,
    count: usize,
    change_pct: Option<Decimal>,
    count_change: i64,
}

/// Window totals with deltas against the same window one month earlier.
fn overview(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
    let start = parse_date(sub.get_one::<String>("from").unwrap())?;
    let end = parse_date(sub.get_one::<String>("to").unwrap())?;
    let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let uid = UserId(user.id);

    let (total, count) = window_totals(conn, uid, start, end, kind)?;
    let (prev_total, prev_count) = window_totals(
        conn,
        uid,
        start - Months::new(1),
        end - Months::new(1),
        kind,
    )?;

    let change_pct = if prev_total.is_zero() {
        None
    } else {
        Some(((total / prev_total) * Decimal::from(100)).round_dp(1) - Decimal::from(100))
    };
    let report = Overview {
        total: total.round_dp(2),
        daily_average: (total / Decimal::from(30)).round_dp(2),
        count,
        change_pct,
        count_change: count as i64 - prev_count as i64,
    };

    if !maybe_print_json(json_flag, jsonl_flag, &report)? {
        let rows = vec![vec![
            report.total.to_string(),
            report.daily_average.to_string(),
            report.count.to_string(),
            report
                .change_pct
                .map(|p| format!("{}%", p))
                .unwrap_or_else(|| "n/a".to_string()),
            report.count_change.to_string(),
        ]];
        println!(
            "{}",
            pretty_table(
                &["Total", "Daily avg", "Count", "vs prev month", "Count delta"],
                rows
            )
        );
    }
    Ok(())
}

/// Per-category totals, counts, and share of the window's transactions.
fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
    let start = parse_date(sub.get_one::<String>("from").unwrap())?;
    let end = parse_date(sub.get_one::<String>("to").unwrap())?;
    let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;

    let filter = posting::TransactionFilter {
        start_date: Some(start),
        end_date: Some(end),
        kind: Some(kind),
        ..Default::default()
    };
    let entries = posting::transactions_for_user(conn, UserId(user.id), &filter)?;
    let all = entries.len();

    use std::collections::BTreeMap;
    let mut agg: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
    for e in &entries {
        let cat = e.category.clone().unwrap_or_else(|| "(uncategorized)".into());
        let entry = agg.entry(cat).or_insert((Decimal::ZERO, 0));
        entry.0 += e.amount;
        entry.1 += 1;
    }

    let mut rows = Vec::new();
    for (cat, (total, count)) in agg {
        let share = if all == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(count as i64) / Decimal::from(all as i64) * Decimal::from(100))
                .round_dp(1)
        };
        rows.push(vec![
            cat,
            format!("{:.2}", total),
            count.to_string(),
            format!("{}%", share),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        println!(
            "{}",
            pretty_table(&["Category", "Total", "Count", "Share"], rows)
        );
    }
    Ok(())
}
