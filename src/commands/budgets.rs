// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{budgets, categories, users};
use crate::models::{BudgetPeriod, BudgetStatus, UserId};
use crate::utils::{id_for_category, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("report", sub)) => report(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("close", sub)) => close(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
    let cat = sub.get_one::<String>("category").unwrap();
    let category_id = id_for_category(conn, user.id, cat)?;
    let limit = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let period: BudgetPeriod = sub.get_one::<String>("period").unwrap().parse()?;
    let start = sub
        .get_one::<String>("start")
        .map(|s| parse_date(s))
        .transpose()?;

    let budget = budgets::create(
        conn,
        UserId(user.id),
        &budgets::NewBudget {
            category_id,
            limit,
            period,
            start,
        },
        crate::utils::today(),
    )?;
    println!(
        "Budget set for '{}': {} from {} to {}",
        cat, budget.limit_amount, budget.start_date, budget.end_date
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
    let data = budgets::list(conn, UserId(user.id))?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let mut rows = Vec::new();
        for b in &data {
            let category = categories::get(conn, b.category_id)?;
            rows.push(vec![
                b.id.to_string(),
                category.name,
                b.period.as_str().to_string(),
                b.start_date.to_string(),
                b.end_date.to_string(),
                format!("{:.2}", b.limit_amount),
                format!("{:.2}", b.spent),
                b.status.as_str().to_string(),
            ]);
        }
        println!(
            "{}",
            pretty_table(
                &["Id", "Category", "Period", "Start", "End", "Limit", "Spent", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

fn report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;

    let mut rows = Vec::new();
    for b in budgets::list(conn, UserId(user.id))? {
        if b.status != BudgetStatus::Open {
            continue;
        }
        let category = categories::get(conn, b.category_id)?;
        rows.push(vec![
            category.name,
            format!("{:.2}", b.limit_amount),
            format!("{:.2}", b.spent),
            format!("{:.2}", b.limit_amount - b.spent),
            if b.is_exceeded() { "yes" } else { "no" }.to_string(),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        println!(
            "{}",
            pretty_table(
                &["Category", "Limit", "Spent", "Remaining", "Exceeded"],
                rows
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let limit = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let budget = budgets::update_limit(conn, id, limit)?;
    println!("Budget {} limit is now {}", budget.id, budget.limit_amount);
    Ok(())
}

fn close(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
    let today = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => crate::utils::today(),
    };
    let n = budgets::close_expired(conn, UserId(user.id), today)?;
    println!("Closed {} budget(s)", n);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    budgets::delete(conn, id)?;
    println!("Removed budget {}", id);
    Ok(())
}
