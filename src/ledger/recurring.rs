// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Recurring schedule engine. Each run sweeps every active template and
//! materializes at most one occurrence per template, so an overdue template
//! catches up one period per run rather than backfilling. Templates are
//! processed in isolation: one failure is logged and skipped, the rest of
//! the batch proceeds.

use chrono::{Duration, Months, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use tracing::warn;

use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{categories, decimal_col, owned_account, parsed_col, posting};
use crate::models::{PeriodType, RecurringTransaction, TransactionType, UserId};

#[derive(Debug, Clone)]
pub struct NewRecurring {
    pub account_id: i64,
    pub category_id: i64,
    /// Magnitude; the stored amount is signed by `kind`.
    pub amount: Decimal,
    pub kind: TransactionType,
    pub period: PeriodType,
    /// Anchor date; defaults to today. An anchor not in the future is
    /// materialized immediately on creation.
    pub start: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecurringPatch {
    pub account_id: Option<i64>,
    pub category_id: Option<i64>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub next_date: Option<NaiveDate>,
    pub period: Option<PeriodType>,
}

#[derive(Debug)]
pub struct RunFailure {
    pub template_id: i64,
    pub error: LedgerError,
}

/// Tagged outcome of one engine sweep.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Ids of the journal entries created this run.
    pub generated: Vec<i64>,
    pub failures: Vec<RunFailure>,
    /// Active templates that were not yet due.
    pub skipped: usize,
}

/// One period forward. ONCE and NONE do not advance.
pub fn advance(date: NaiveDate, period: PeriodType) -> NaiveDate {
    match period {
        PeriodType::Daily => date + Duration::days(1),
        PeriodType::Weekly => date + Duration::days(7),
        PeriodType::Monthly => date + Months::new(1),
        PeriodType::Yearly => date + Months::new(12),
        PeriodType::Once | PeriodType::None => date,
    }
}

const COLS: &str =
    "id, user_id, account_id, category_id, amount, type, description, period, next_date, active";

fn read_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<RecurringTransaction> {
    Ok(RecurringTransaction {
        id: r.get(0)?,
        user_id: r.get(1)?,
        account_id: r.get(2)?,
        category_id: r.get(3)?,
        amount: decimal_col(r, 4)?,
        kind: parsed_col(r, 5)?,
        description: r.get(6)?,
        period: parsed_col(r, 7)?,
        next_date: r.get(8)?,
        active: r.get(9)?,
    })
}

pub fn create(
    conn: &mut Connection,
    user: UserId,
    req: &NewRecurring,
    today: NaiveDate,
) -> LedgerResult<RecurringTransaction> {
    if req.period == PeriodType::None {
        return Err(LedgerError::InvalidInput(
            "Period type must be specified for recurring transactions".to_string(),
        ));
    }
    if req.amount.is_zero() {
        return Err(LedgerError::InvalidInput(
            "Recurring amount must be non-zero".to_string(),
        ));
    }

    let tx = conn.transaction()?;
    let account = owned_account(&tx, req.account_id, user)?;
    let category = categories::get(&tx, req.category_id)?;
    let signed = req.kind.signed(req.amount);
    let anchor = req.start.unwrap_or(today);

    // An anchor on or before today posts its first occurrence right away;
    // the stored template then points at the following period. A ONCE
    // template fulfilled at creation is stored deactivated.
    let (next_date, active) = if anchor <= today {
        posting::post_in_tx(
            &tx,
            user,
            &posting::NewTransaction {
                account_id: account.id,
                category_id: category.id,
                amount: req.amount,
                kind: req.kind,
                date: Some(anchor),
                description: req.description.clone(),
            },
            today,
        )?;
        (advance(anchor, req.period), req.period != PeriodType::Once)
    } else {
        (anchor, true)
    };

    tx.execute(
        "INSERT INTO recurring_transactions(user_id, account_id, category_id, amount, type, description, period, next_date, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            user.0,
            account.id,
            category.id,
            signed.to_string(),
            req.kind.as_str(),
            req.description,
            req.period.as_str(),
            next_date.to_string(),
            active
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok(RecurringTransaction {
        id,
        user_id: user.0,
        account_id: account.id,
        category_id: Some(category.id),
        amount: signed,
        kind: req.kind,
        description: req.description.clone(),
        period: req.period,
        next_date,
        active,
    })
}

pub fn get(conn: &Connection, id: i64) -> LedgerResult<RecurringTransaction> {
    conn.query_row(
        &format!("SELECT {} FROM recurring_transactions WHERE id=?1", COLS),
        params![id],
        read_row,
    )
    .optional()?
    .ok_or(LedgerError::RecurringNotFound(id))
}

pub fn list(
    conn: &Connection,
    user: UserId,
    kind: Option<TransactionType>,
) -> LedgerResult<Vec<RecurringTransaction>> {
    let mut out = Vec::new();
    match kind {
        Some(k) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM recurring_transactions WHERE user_id=?1 AND type=?2 ORDER BY next_date, id",
                COLS
            ))?;
            let rows = stmt.query_map(params![user.0, k.as_str()], read_row)?;
            for row in rows {
                out.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM recurring_transactions WHERE user_id=?1 ORDER BY next_date, id",
                COLS
            ))?;
            let rows = stmt.query_map(params![user.0], read_row)?;
            for row in rows {
                out.push(row?);
            }
        }
    }
    Ok(out)
}

/// Balance-neutral template edit. Materialized history is untouched.
pub fn edit(
    conn: &Connection,
    id: i64,
    patch: &RecurringPatch,
) -> LedgerResult<RecurringTransaction> {
    let mut existing = get(conn, id)?;

    if let Some(category_id) = patch.category_id {
        let category = categories::get(conn, category_id)?;
        conn.execute(
            "UPDATE recurring_transactions SET category_id=?1 WHERE id=?2",
            params![category.id, id],
        )?;
        existing.category_id = Some(category.id);
    }
    if let Some(account_id) = patch.account_id {
        let account = owned_account(conn, account_id, UserId(existing.user_id))?;
        conn.execute(
            "UPDATE recurring_transactions SET account_id=?1 WHERE id=?2",
            params![account.id, id],
        )?;
        existing.account_id = account.id;
    }
    if let Some(amount) = patch.amount {
        let signed = existing.kind.signed(amount);
        if signed != existing.amount {
            conn.execute(
                "UPDATE recurring_transactions SET amount=?1 WHERE id=?2",
                params![signed.to_string(), id],
            )?;
            existing.amount = signed;
        }
    }
    if let Some(ref description) = patch.description {
        conn.execute(
            "UPDATE recurring_transactions SET description=?1 WHERE id=?2",
            params![description, id],
        )?;
        existing.description = Some(description.clone());
    }
    if let Some(next_date) = patch.next_date {
        conn.execute(
            "UPDATE recurring_transactions SET next_date=?1 WHERE id=?2",
            params![next_date.to_string(), id],
        )?;
        existing.next_date = next_date;
    }
    if let Some(period) = patch.period {
        if period != PeriodType::None && period != existing.period {
            conn.execute(
                "UPDATE recurring_transactions SET period=?1 WHERE id=?2",
                params![period.as_str(), id],
            )?;
            existing.period = period;
        }
    }
    Ok(existing)
}

/// Flips the active flag; inactive templates are never materialized.
pub fn toggle_active(conn: &Connection, id: i64) -> LedgerResult<bool> {
    let existing = get(conn, id)?;
    let next = !existing.active;
    conn.execute(
        "UPDATE recurring_transactions SET active=?1 WHERE id=?2",
        params![next, id],
    )?;
    Ok(next)
}

pub fn delete(conn: &Connection, id: i64) -> LedgerResult<()> {
    get(conn, id)?;
    conn.execute(
        "DELETE FROM recurring_transactions WHERE id=?1",
        params![id],
    )?;
    Ok(())
}

/// Engine sweep over all active templates as of `today`.
pub fn run_due(conn: &mut Connection, today: NaiveDate) -> LedgerResult<RunSummary> {
    let templates = {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM recurring_transactions WHERE active=1 ORDER BY id",
            COLS
        ))?;
        let rows = stmt.query_map([], read_row)?;
        let mut all = Vec::new();
        for row in rows {
            all.push(row?);
        }
        all
    };

    let mut summary = RunSummary::default();
    for template in templates {
        if template.next_date > today {
            summary.skipped += 1;
            continue;
        }
        match materialize_one(conn, &template, today) {
            Ok(txn_id) => summary.generated.push(txn_id),
            Err(error) => {
                warn!(
                    template_id = template.id,
                    %error,
                    "recurring generation failed, skipping template"
                );
                summary.failures.push(RunFailure {
                    template_id: template.id,
                    error,
                });
            }
        }
    }
    Ok(summary)
}

/// One template, one unit of work: journal posting plus the template's
/// advance (or deactivation for ONCE) commit together.
fn materialize_one(
    conn: &mut Connection,
    template: &RecurringTransaction,
    today: NaiveDate,
) -> LedgerResult<i64> {
    let category_id = template.category_id.ok_or_else(|| {
        LedgerError::InvalidInput(format!(
            "Recurring transaction {} has no category",
            template.id
        ))
    })?;

    let tx = conn.transaction()?;
    let posted = posting::post_in_tx(
        &tx,
        UserId(template.user_id),
        &posting::NewTransaction {
            account_id: template.account_id,
            category_id,
            amount: template.amount.abs(),
            kind: template.kind,
            date: Some(template.next_date),
            description: template.description.clone(),
        },
        today,
    )?;
    if template.period == PeriodType::Once {
        tx.execute(
            "UPDATE recurring_transactions SET active=0 WHERE id=?1",
            params![template.id],
        )?;
    } else {
        tx.execute(
            "UPDATE recurring_transactions SET next_date=?1 WHERE id=?2",
            params![advance(template.next_date, template.period).to_string(), template.id],
        )?;
    }
    tx.commit()?;
    Ok(posted.id)
}
