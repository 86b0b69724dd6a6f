// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{recurring, users};
use crate::models::{PeriodType, TransactionType, UserId};
use crate::utils::{
    id_for_account, id_for_category, maybe_print_json, parse_date, parse_decimal, pretty_table,
};
use anyhow::{bail, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("toggle", sub)) => toggle(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("run", sub)) => run(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
    let account_id = id_for_account(conn, user.id, sub.get_one::<String>("account").unwrap())?;
    let category_id = id_for_category(conn, user.id, sub.get_one::<String>("category").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount <= rust_decimal::Decimal::ZERO {
        bail!("Amount must be positive; the sign comes from --type");
    }
    let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let period: PeriodType = sub.get_one::<String>("period").unwrap().parse()?;
    let start = sub
        .get_one::<String>("start")
        .map(|s| parse_date(s))
        .transpose()?;

    let template = recurring::create(
        conn,
        UserId(user.id),
        &recurring::NewRecurring {
            account_id,
            category_id,
            amount,
            kind,
            period,
            start,
            description: sub.get_one::<String>("note").cloned(),
        },
        crate::utils::today(),
    )?;
    println!(
        "Added {} template {} (next: {}, active: {})",
        template.period.as_str(),
        template.id,
        template.next_date,
        template.active
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TransactionType>())
        .transpose()?;

    let data = recurring::list(conn, UserId(user.id), kind)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.period.as_str().to_string(),
                    t.next_date.to_string(),
                    t.amount.to_string(),
                    t.kind.as_str().to_string(),
                    if t.active { "yes" } else { "no" }.to_string(),
                    t.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Period", "Next", "Amount", "Type", "Active", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = recurring::RecurringPatch {
        account_id: sub
            .get_one::<String>("account")
            .map(|s| s.parse::<i64>())
            .transpose()?,
        category_id: sub
            .get_one::<String>("category")
            .map(|s| s.parse::<i64>())
            .transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        description: sub.get_one::<String>("note").cloned(),
        next_date: sub
            .get_one::<String>("next")
            .map(|s| parse_date(s))
            .transpose()?,
        period: sub
            .get_one::<String>("period")
            .map(|s| s.parse::<PeriodType>())
            .transpose()?,
    };
    let updated = recurring::edit(conn, id, &patch)?;
    println!(
        "Updated template {} (next: {})",
        updated.id, updated.next_date
    );
    Ok(())
}

fn toggle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let active = recurring::toggle_active(conn, id)?;
    println!(
        "Template {} is now {}",
        id,
        if active { "active" } else { "inactive" }
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    recurring::delete(conn, id)?;
    println!("Removed template {}", id);
    Ok(())
}

fn run(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => crate::utils::today(),
    };
    let summary = recurring::run_due(conn, today)?;
    println!(
        "Generated {} transaction(s), {} failure(s), {} not due",
        summary.generated.len(),
        summary.failures.len(),
        summary.skipped
    );
    if !summary.failures.is_empty() {
        let rows: Vec<Vec<String>> = summary
            .failures
            .iter()
            .map(|f| vec![f.template_id.to_string(), f.error.to_string()])
            .collect();
        println!("{}", pretty_table(&["Template", "Error"], rows));
    }
    Ok(())
}
