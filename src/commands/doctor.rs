// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{accounts, budgets, fx, posting, users};
use crate::models::{BudgetStatus, TransactionType, UserId};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user = users::find_by_name(conn, m.get_one::<String>("user").unwrap())?;
    let uid = UserId(user.id);
    let mut rows = Vec::new();

    // 1) Accounts whose balance cannot be folded into the main currency
    for account in accounts::list(conn, uid)? {
        if !account.include_in_stats || account.currency == user.main_currency {
            continue;
        }
        if fx::rate(conn, &account.currency, &user.main_currency).is_err() {
            rows.push(vec![
                "missing_fx".into(),
                format!("{} -> {}", account.currency, user.main_currency),
            ]);
        }
    }

    // 2) Open budgets past their period end
    let today = crate::utils::today();
    for budget in budgets::list(conn, uid)? {
        if budget.status == BudgetStatus::Open && budget.end_date < today {
            rows.push(vec![
                "expired_open_budget".into(),
                format!("budget {} ended {}", budget.id, budget.end_date),
            ]);
        }
    }

    // 3) Journal rows whose sign disagrees with their type
    let entries =
        posting::transactions_for_user(conn, uid, &posting::TransactionFilter::default())?;
    for e in entries {
        let bad = match e.kind {
            TransactionType::Expense => e.amount > Decimal::ZERO,
            TransactionType::Income => e.amount < Decimal::ZERO,
        };
        if bad {
            rows.push(vec![
                "sign_mismatch".into(),
                format!("tx {} is {} {}", e.id, e.kind.as_str(), e.amount),
            ]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
