// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Domain errors surfaced by the ledger core. Callers can branch on every
/// variant except `Storage`, which carries unexpected store failures and is
/// deliberately kept outside the domain taxonomy.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Account not found with id: {0}")]
    AccountNotFound(i64),

    #[error("Category not found with id: {0}")]
    CategoryNotFound(i64),

    #[error("Transaction not found with id: {0}")]
    TransactionNotFound(i64),

    #[error("Recurring transaction not found with id: {0}")]
    RecurringNotFound(i64),

    #[error("Budget not found with id: {0}")]
    BudgetNotFound(i64),

    #[error("Currency not found: {0}")]
    CurrencyNotFound(String),

    #[error("Exchange rate not found: {from}->{to}")]
    RateNotFound { from: String, to: String },

    #[error("Entity {0} does not belong to the requesting user")]
    AccessDenied(i64),

    #[error("{0}")]
    IllegalOperation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}
