// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Posting service and transaction journal. Every balance delta, journal
//! insert, and budget accumulation for a single posting commits as one
//! SQLite transaction: either all of it lands or none of it does.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{accounts, budgets, categories, decimal_col, owned_account, parsed_col, users};
use crate::models::{Transaction, TransactionType, UserId};

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: i64,
    pub category_id: i64,
    /// Magnitude; the sign is derived from `kind`, whatever the caller sent.
    pub amount: Decimal,
    pub kind: TransactionType,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub category_id: Option<i64>,
    /// New magnitude; re-signed by the stored type. Type itself is
    /// immutable post-creation.
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Conjunctive filters for journal retrieval; absent filters are no-ops.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub category: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub kind: Option<TransactionType>,
    pub account: Option<String>,
}

/// Journal row joined with its account for display and export.
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub account: String,
    pub category: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub kind: TransactionType,
    pub description: Option<String>,
}

pub fn post_transaction(
    conn: &mut Connection,
    user: UserId,
    req: &NewTransaction,
) -> LedgerResult<Transaction> {
    let today = Utc::now().date_naive();
    let tx = conn.transaction()?;
    let posted = post_in_tx(&tx, user, req, today)?;
    tx.commit()?;
    Ok(posted)
}

/// Posting body, callable from an already-open transaction (the recurring
/// engine runs one per template).
pub(crate) fn post_in_tx(
    conn: &Connection,
    user: UserId,
    req: &NewTransaction,
    today: NaiveDate,
) -> LedgerResult<Transaction> {
    if req.amount.is_zero() {
        return Err(LedgerError::InvalidInput(
            "Transaction amount must be non-zero".to_string(),
        ));
    }
    let account = owned_account(conn, req.account_id, user)?;
    let category = categories::get(conn, req.category_id)?;
    let signed = req.kind.signed(req.amount);
    let date = req.date.unwrap_or(today);

    accounts::change_balance(conn, account.id, signed, user)?;
    conn.execute(
        "INSERT INTO transactions(user_id, account_id, category_id, amount, type, description, date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.0,
            account.id,
            category.id,
            signed.to_string(),
            req.kind.as_str(),
            req.description,
            date.to_string()
        ],
    )?;
    let id = conn.last_insert_rowid();
    if req.kind == TransactionType::Expense {
        budgets::record_expense(conn, user, category.id, signed.abs(), date)?;
    }
    Ok(Transaction {
        id,
        user_id: user.0,
        account_id: account.id,
        category_id: Some(category.id),
        amount: signed,
        kind: req.kind,
        description: req.description.clone(),
        date,
    })
}

fn read_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        user_id: r.get(1)?,
        account_id: r.get(2)?,
        category_id: r.get(3)?,
        amount: decimal_col(r, 4)?,
        kind: parsed_col(r, 5)?,
        description: r.get(6)?,
        date: r.get(7)?,
    })
}

pub fn get(conn: &Connection, id: i64) -> LedgerResult<Transaction> {
    conn.query_row(
        "SELECT id, user_id, account_id, category_id, amount, type, description, date
         FROM transactions WHERE id=?1",
        params![id],
        read_row,
    )
    .optional()?
    .ok_or(LedgerError::TransactionNotFound(id))
}

/// Edits a journal entry in place. A changed magnitude forwards only the
/// difference against the stored signed amount to the balance primitive, so
/// the account moves by the increment rather than the new value.
pub fn edit_transaction(
    conn: &mut Connection,
    id: i64,
    patch: &TransactionPatch,
) -> LedgerResult<Transaction> {
    let tx = conn.transaction()?;
    let mut existing = get(&tx, id)?;

    if let Some(category_id) = patch.category_id {
        let category = categories::get(&tx, category_id)?;
        if existing.category_id != Some(category.id) {
            tx.execute(
                "UPDATE transactions SET category_id=?1 WHERE id=?2",
                params![category.id, id],
            )?;
            existing.category_id = Some(category.id);
        }
    }
    if let Some(amount) = patch.amount {
        let new_signed = existing.kind.signed(amount);
        if new_signed != existing.amount {
            let delta = new_signed - existing.amount;
            accounts::change_balance(&tx, existing.account_id, delta, UserId(existing.user_id))?;
            tx.execute(
                "UPDATE transactions SET amount=?1 WHERE id=?2",
                params![new_signed.to_string(), id],
            )?;
            existing.amount = new_signed;
        }
    }
    if let Some(ref description) = patch.description {
        tx.execute(
            "UPDATE transactions SET description=?1 WHERE id=?2",
            params![description, id],
        )?;
        existing.description = Some(description.clone());
    }
    if let Some(date) = patch.date {
        tx.execute(
            "UPDATE transactions SET date=?1 WHERE id=?2",
            params![date.to_string(), id],
        )?;
        existing.date = date;
    }
    tx.commit()?;
    Ok(existing)
}

/// Removes the journal row only. Posted history is financially immutable:
/// the account balance and any budget accumulation stay as they are, and
/// corrections are posted as offsetting transactions.
pub fn delete_transaction(conn: &Connection, id: i64) -> LedgerResult<()> {
    get(conn, id)?;
    conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    Ok(())
}

pub fn transactions_for_user(
    conn: &Connection,
    user: UserId,
    filter: &TransactionFilter,
) -> LedgerResult<Vec<JournalEntry>> {
    users::get(conn, user.0)?;

    let mut sql = String::from(
        "SELECT t.id, t.date, a.name, c.name, t.amount, a.currency, t.type, t.description
         FROM transactions t
         JOIN accounts a ON t.account_id=a.id
         LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user.0.to_string()];

    if let Some(ref category) = filter.category {
        sql.push_str(" AND c.name=?");
        params_vec.push(category.clone());
    }
    if let Some(ref account) = filter.account {
        sql.push_str(" AND a.name=?");
        params_vec.push(account.clone());
    }
    if let Some(kind) = filter.kind {
        sql.push_str(" AND t.type=?");
        params_vec.push(kind.as_str().to_string());
    }
    if let Some(start) = filter.start_date {
        sql.push_str(" AND t.date>=?");
        params_vec.push(start.to_string());
    }
    if let Some(end) = filter.end_date {
        sql.push_str(" AND t.date<=?");
        params_vec.push(end.to_string());
    }
    sql.push_str(" ORDER BY t.id");

    let mut stmt = conn.prepare(&sql)?;
    let binds: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(binds))?;

    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let entry = JournalEntry {
            id: r.get(0)?,
            date: r.get(1)?,
            account: r.get(2)?,
            category: r.get(3)?,
            amount: decimal_col(r, 4)?,
            currency: r.get(5)?,
            kind: parsed_col(r, 6)?,
            description: r.get(7)?,
        };
        // Amount bounds compare the signed amount, in decimal, not SQL text.
        if let Some(min) = filter.min_amount {
            if entry.amount < min {
                continue;
            }
        }
        if let Some(max) = filter.max_amount {
            if entry.amount > max {
                continue;
            }
        }
        out.push(entry);
    }
    Ok(out)
}
