// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget tracker: one OPEN budget per (user, category) at a time, with a
//! spent accumulator fed by expense postings. All creation goes through
//! [`create`] so the one-open invariant is enforced in a single path.

use chrono::{Duration, Months, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{categories, decimal_col, parsed_col};
use crate::models::{Budget, BudgetPeriod, BudgetStatus, UserId};

#[derive(Debug, Clone)]
pub struct NewBudget {
    pub category_id: i64,
    pub limit: Decimal,
    pub period: BudgetPeriod,
    pub start: Option<NaiveDate>,
}

/// Inclusive end of a period starting at `start`.
pub fn period_end(start: NaiveDate, period: BudgetPeriod) -> NaiveDate {
    match period {
        BudgetPeriod::Weekly => start + Duration::days(6),
        BudgetPeriod::Monthly => start + Months::new(1) - Duration::days(1),
        BudgetPeriod::Yearly => start + Months::new(12) - Duration::days(1),
    }
}

const COLS: &str =
    "id, user_id, category_id, period, start_date, end_date, limit_amount, spent, status";

fn read_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: r.get(0)?,
        user_id: r.get(1)?,
        category_id: r.get(2)?,
        period: parsed_col(r, 3)?,
        start_date: r.get(4)?,
        end_date: r.get(5)?,
        limit_amount: decimal_col(r, 6)?,
        spent: decimal_col(r, 7)?,
        status: parsed_col(r, 8)?,
    })
}

pub fn create(
    conn: &Connection,
    user: UserId,
    req: &NewBudget,
    today: NaiveDate,
) -> LedgerResult<Budget> {
    let category = categories::get(conn, req.category_id)?;
    if category.user_id != user.0 {
        return Err(LedgerError::AccessDenied(category.id));
    }
    if find_open(conn, user, category.id)?.is_some() {
        return Err(LedgerError::IllegalOperation(
            "An open budget already exists for this category".to_string(),
        ));
    }
    let start = req.start.unwrap_or(today);
    let end = period_end(start, req.period);
    conn.execute(
        "INSERT INTO budgets(user_id, category_id, period, start_date, end_date, limit_amount, spent, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, '0', 'open')",
        params![
            user.0,
            category.id,
            req.period.as_str(),
            start.to_string(),
            end.to_string(),
            req.limit.to_string()
        ],
    )?;
    Ok(Budget {
        id: conn.last_insert_rowid(),
        user_id: user.0,
        category_id: category.id,
        period: req.period,
        start_date: start,
        end_date: end,
        limit_amount: req.limit,
        spent: Decimal::ZERO,
        status: BudgetStatus::Open,
    })
}

pub fn find_open(
    conn: &Connection,
    user: UserId,
    category_id: i64,
) -> LedgerResult<Option<Budget>> {
    let budget = conn
        .query_row(
            &format!(
                "SELECT {} FROM budgets WHERE user_id=?1 AND category_id=?2 AND status='open'",
                COLS
            ),
            params![user.0, category_id],
            read_row,
        )
        .optional()?;
    Ok(budget)
}

/// Accumulates an expense into the open budget for its category, creating
/// the zero-limit fallback when none is open so the spend is never dropped.
/// Expenses dated outside the open period leave `spent` untouched.
pub(crate) fn record_expense(
    conn: &Connection,
    user: UserId,
    category_id: i64,
    amount: Decimal,
    date: NaiveDate,
) -> LedgerResult<()> {
    let budget = match find_open(conn, user, category_id)? {
        Some(b) => b,
        None => create(
            conn,
            user,
            &NewBudget {
                category_id,
                limit: Decimal::ZERO,
                period: BudgetPeriod::Monthly,
                start: Some(date),
            },
            date,
        )?,
    };
    if date >= budget.start_date && date <= budget.end_date {
        let spent = budget.spent + amount;
        conn.execute(
            "UPDATE budgets SET spent=?1 WHERE id=?2",
            params![spent.to_string(), budget.id],
        )?;
    }
    Ok(())
}

pub fn get(conn: &Connection, id: i64) -> LedgerResult<Budget> {
    conn.query_row(
        &format!("SELECT {} FROM budgets WHERE id=?1", COLS),
        params![id],
        read_row,
    )
    .optional()?
    .ok_or(LedgerError::BudgetNotFound(id))
}

pub fn list(conn: &Connection, user: UserId) -> LedgerResult<Vec<Budget>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM budgets WHERE user_id=?1 ORDER BY start_date, id",
        COLS
    ))?;
    let rows = stmt.query_map(params![user.0], read_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn update_limit(conn: &Connection, id: i64, limit: Decimal) -> LedgerResult<Budget> {
    let mut budget = get(conn, id)?;
    if limit != budget.limit_amount {
        conn.execute(
            "UPDATE budgets SET limit_amount=?1 WHERE id=?2",
            params![limit.to_string(), id],
        )?;
        budget.limit_amount = limit;
    }
    Ok(budget)
}

pub fn delete(conn: &Connection, id: i64) -> LedgerResult<()> {
    get(conn, id)?;
    conn.execute("DELETE FROM budgets WHERE id=?1", params![id])?;
    Ok(())
}

/// Closes open budgets whose period ended before `today`. Rollover into the
/// next period is a deliberately disabled extension.
pub fn close_expired(conn: &Connection, user: UserId, today: NaiveDate) -> LedgerResult<usize> {
    let n = conn.execute(
        "UPDATE budgets SET status='closed'
         WHERE user_id=?1 AND status='open' AND end_date<?2",
        params![user.0, today.to_string()],
    )?;
    Ok(n)
}
