// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger core: account store, posting/transfer service, transaction
//! journal, recurring schedule engine, and budget tracker. Everything here
//! returns [`crate::errors::LedgerError`] so callers can branch on the
//! domain taxonomy; the CLI layer sits on top and converts at the boundary.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod fx;
pub mod posting;
pub mod recurring;
pub mod transfers;
pub mod users;

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::errors::{LedgerError, LedgerResult};
use crate::models::{Account, UserId};

/// Resolves an account and checks ownership in one place: absent rows are
/// `AccountNotFound`, rows owned by someone else are `AccessDenied`.
pub(crate) fn owned_account(
    conn: &Connection,
    account_id: i64,
    user: UserId,
) -> LedgerResult<Account> {
    let account =
        accounts::find(conn, account_id)?.ok_or(LedgerError::AccountNotFound(account_id))?;
    if account.user_id != user.0 {
        return Err(LedgerError::AccessDenied(account_id));
    }
    Ok(account)
}

/// Reads a TEXT column holding a decimal. Parse failures surface as
/// conversion errors so they stay on the storage side of the taxonomy.
pub(crate) fn decimal_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    s.parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Reads a TEXT column holding one of the model enums.
pub(crate) fn parsed_col<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = LedgerError>,
{
    let s: String = row.get(idx)?;
    s.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
