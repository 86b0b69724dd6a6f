// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account store. `balance` is mutated only through [`change_balance`];
//! update requests that try to move it (or switch the currency) are
//! rejected so every delta flows through the posting and transfer paths.

use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{decimal_col, fx, owned_account, users};
use crate::models::{Account, UserId};

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub description: Option<String>,
    pub currency: String,
    pub balance: Decimal,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub balance: Option<Decimal>,
    pub currency: Option<String>,
}

fn read_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        description: r.get(3)?,
        currency: r.get(4)?,
        balance: decimal_col(r, 5)?,
        color: r.get(6)?,
        include_in_stats: r.get(7)?,
        archived: r.get(8)?,
    })
}

const COLS: &str =
    "id, user_id, name, description, currency, balance, color, include_in_stats, archived";

pub(crate) fn find(conn: &Connection, id: i64) -> LedgerResult<Option<Account>> {
    let account = conn
        .query_row(
            &format!("SELECT {} FROM accounts WHERE id=?1", COLS),
            params![id],
            read_row,
        )
        .optional()?;
    Ok(account)
}

pub fn create(conn: &Connection, user: UserId, req: &NewAccount) -> LedgerResult<Account> {
    let currency = fx::get_currency(conn, &req.currency)?;
    conn.execute(
        "INSERT INTO accounts(user_id, name, description, currency, balance, color, include_in_stats, archived)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, 0)",
        params![
            user.0,
            req.name,
            req.description,
            currency.code,
            req.balance.to_string(),
            req.color
        ],
    )?;
    Ok(Account {
        id: conn.last_insert_rowid(),
        user_id: user.0,
        name: req.name.clone(),
        description: req.description.clone(),
        currency: currency.code,
        balance: req.balance,
        color: req.color.clone(),
        include_in_stats: true,
        archived: false,
    })
}

pub fn get(conn: &Connection, user: UserId, id: i64) -> LedgerResult<Account> {
    owned_account(conn, id, user)
}

pub fn list(conn: &Connection, user: UserId) -> LedgerResult<Vec<Account>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM accounts WHERE user_id=?1 ORDER BY name",
        COLS
    ))?;
    let rows = stmt.query_map(params![user.0], read_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Updates display metadata. A patch carrying a different balance or
/// currency is an attempt to bypass the ledger and is rejected.
pub fn update(
    conn: &Connection,
    user: UserId,
    id: i64,
    patch: &AccountPatch,
) -> LedgerResult<Account> {
    let mut account = owned_account(conn, id, user)?;
    if let Some(balance) = patch.balance {
        if balance != account.balance {
            return Err(LedgerError::IllegalOperation(
                "Balance cannot be changed directly".to_string(),
            ));
        }
    }
    if let Some(ref currency) = patch.currency {
        if !currency.eq_ignore_ascii_case(&account.currency) {
            return Err(LedgerError::IllegalOperation(
                "Currency cannot be changed".to_string(),
            ));
        }
    }
    if let Some(ref name) = patch.name {
        account.name = name.clone();
    }
    if let Some(ref description) = patch.description {
        account.description = Some(description.clone());
    }
    if let Some(ref color) = patch.color {
        account.color = Some(color.clone());
    }
    conn.execute(
        "UPDATE accounts SET name=?1, description=?2, color=?3 WHERE id=?4",
        params![account.name, account.description, account.color, id],
    )?;
    Ok(account)
}

/// Soft delete: flips `archived`, balance retained.
pub fn toggle_archived(conn: &Connection, user: UserId, id: i64) -> LedgerResult<bool> {
    let account = owned_account(conn, id, user)?;
    let next = !account.archived;
    conn.execute(
        "UPDATE accounts SET archived=?1 WHERE id=?2",
        params![next, id],
    )?;
    Ok(next)
}

pub fn toggle_include_in_stats(conn: &Connection, user: UserId, id: i64) -> LedgerResult<bool> {
    let account = owned_account(conn, id, user)?;
    let next = !account.include_in_stats;
    conn.execute(
        "UPDATE accounts SET include_in_stats=?1 WHERE id=?2",
        params![next, id],
    )?;
    Ok(next)
}

/// Hard delete. Journal entries and recurring templates on the account go
/// with it; archiving is the safe alternative when history must survive.
pub fn delete(conn: &Connection, user: UserId, id: i64) -> LedgerResult<()> {
    owned_account(conn, id, user)?;
    conn.execute("DELETE FROM accounts WHERE id=?1", params![id])?;
    Ok(())
}

/// The single balance-delta primitive. Ownership is checked here as well so
/// internal callers cannot cross user boundaries by mistake. Deliberately
/// not exposed: every external mutation goes through posting or transfer.
pub(crate) fn change_balance(
    conn: &Connection,
    account_id: i64,
    delta: Decimal,
    user: UserId,
) -> LedgerResult<()> {
    let account = owned_account(conn, account_id, user)?;
    let new_balance = account.balance + delta;
    conn.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![new_balance.to_string(), account_id],
    )?;
    Ok(())
}

/// Total across `include_in_stats` accounts, converted into the user's main
/// currency through directional rates. A missing direction fails hard.
pub fn total_balance(conn: &Connection, user: UserId) -> LedgerResult<Decimal> {
    let owner = users::get(conn, user.0)?;
    let mut total = Decimal::ZERO;
    let mut stmt = conn.prepare(
        "SELECT balance, currency FROM accounts WHERE user_id=?1 AND include_in_stats=1",
    )?;
    let rows = stmt.query_map(params![user.0], |r| {
        Ok((decimal_col(r, 0)?, r.get::<_, String>(1)?))
    })?;
    for row in rows {
        let (balance, currency) = row?;
        total += fx::convert(conn, balance, &currency, &owner.main_currency)?;
    }
    Ok(total.round_dp(2))
}
