// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{posting, users};
use crate::models::{TransactionType, UserId};
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
        Some(("rm", sub)) => rm(conn, sub)?,
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
    let date = sub
        .get_one::<String>("date")
        .map(|s| parse_date(s))
        .transpose()?;

    let posted = posting::post_transaction(
        conn,
        UserId(user.id),
        &posting::NewTransaction {
            account_id,
            category_id,
            amount,
            kind,
            date,
            description: sub.get_one::<String>("note").cloned(),
        },
    )?;
    println!(
        "Recorded {} {} on {} (tx {})",
        posted.amount,
        posted.kind.as_str(),
        posted.date,
        posted.id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = users::find_by_name(conn, sub.get_one::<String>("user").unwrap())?;

    let filter = posting::TransactionFilter {
        category: sub.get_one::<String>("category").cloned(),
        account: sub.get_one::<String>("account").cloned(),
        kind: sub
            .get_one::<String>("type")
            .map(|s| s.parse::<TransactionType>())
            .transpose()?,
        start_date: sub
            .get_one::<String>("from")
            .map(|s| parse_date(s))
            .transpose()?,
        end_date: sub
            .get_one::<String>("to")
            .map(|s| parse_date(s))
            .transpose()?,
        min_amount: sub
            .get_one::<String>("min")
            .map(|s| parse_decimal(s))
            .transpose()?,
        max_amount: sub
            .get_one::<String>("max")
            .map(|s| parse_decimal(s))
            .transpose()?,
    };

    let data = posting::transactions_for_user(conn, UserId(user.id), &filter)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.date.to_string(),
                    e.account.clone(),
                    e.category.clone().unwrap_or_default(),
                    e.amount.to_string(),
                    e.currency.clone(),
                    e.kind.as_str().to_string(),
                    e.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Account", "Category", "Amount", "CCY", "Type", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = posting::TransactionPatch {
        category_id: sub
            .get_one::<String>("category")
            .map(|s| s.parse::<i64>())
            .transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        description: sub.get_one::<String>("note").cloned(),
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
    };
    let updated = posting::edit_transaction(conn, id, &patch)?;
    println!("Updated tx {} ({} on {})", updated.id, updated.amount, updated.date);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    posting::delete_transaction(conn, id)?;
    println!("Removed tx {} (balances are left as posted)", id);
    Ok(())
}
