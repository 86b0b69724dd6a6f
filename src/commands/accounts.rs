// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{accounts, users};
use crate::models::UserId;
use crate::utils::{fmt_money, id_for_account, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("archive", sub)) => archive(conn, sub)?,
        Some(("stats", sub)) => stats(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("balance", sub)) => balance(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn resolve(conn: &Connection, sub: &clap::ArgMatches) -> Result<(UserId, i64)> {
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
    let account_id = id_for_account(conn, user.id, sub.get_one::<String>("account").unwrap())?;
    Ok((UserId(user.id), account_id))
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
    let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
    let req = accounts::NewAccount {
        name: sub.get_one::<String>("name").unwrap().clone(),
        description: sub.get_one::<String>("description").cloned(),
        currency: sub.get_one::<String>("currency").unwrap().to_uppercase(),
        balance,
        color: sub.get_one::<String>("color").cloned(),
    };
    let account = accounts::create(conn, UserId(user.id), &req)?;
    println!(
        "Added account '{}' ({}, {})",
        account.name,
        account.currency,
        fmt_money(&account.balance, &account.currency)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
    let data = accounts::list(conn, UserId(user.id))?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|a| {
                vec![
                    a.id.to_string(),
                    a.name.clone(),
                    a.currency.clone(),
                    format!("{:.2}", a.rounded_balance()),
                    if a.archived { "yes" } else { "no" }.to_string(),
                    if a.include_in_stats { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "CCY", "Balance", "Archived", "In stats"],
                rows
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user, account_id) = resolve(conn, sub)?;
    let patch = accounts::AccountPatch {
        name: sub.get_one::<String>("name").cloned(),
        description: sub.get_one::<String>("description").cloned(),
        color: sub.get_one::<String>("color").cloned(),
        ..Default::default()
    };
    let account = accounts::update(conn, user, account_id, &patch)?;
    println!("Updated account '{}'", account.name);
    Ok(())
}

fn archive(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user, account_id) = resolve(conn, sub)?;
    let archived = accounts::toggle_archived(conn, user, account_id)?;
    println!(
        "Account {}",
        if archived { "archived" } else { "unarchived" }
    );
    Ok(())
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user, account_id) = resolve(conn, sub)?;
    let included = accounts::toggle_include_in_stats(conn, user, account_id)?;
    println!(
        "Account {} aggregate stats",
        if included { "included in" } else { "excluded from" }
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user, account_id) = resolve(conn, sub)?;
    accounts::delete(conn, user, account_id)?;
    println!("Removed account and its history");
    Ok(())
}

fn balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;
    let total = accounts::total_balance(conn, UserId(user.id))?;
    println!("{}", fmt_money(&total, &user.main_currency));
    Ok(())
}
