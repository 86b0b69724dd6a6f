// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transfers move value between two of a user's accounts, converting
//! through the directional rate when the currencies differ. A transfer is
//! balance-only: nothing is written to the journal, by contract.

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{accounts, fx, owned_account};
use crate::models::UserId;

pub fn transfer(
    conn: &mut Connection,
    user: UserId,
    from_account_id: i64,
    to_account_id: i64,
    amount: Decimal,
) -> LedgerResult<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidInput(
            "Transfer amount must be positive".to_string(),
        ));
    }
    if from_account_id == to_account_id {
        return Err(LedgerError::IllegalOperation(
            "Cannot transfer to the same account".to_string(),
        ));
    }

    let tx = conn.transaction()?;
    let from = owned_account(&tx, from_account_id, user)?;
    let to = owned_account(&tx, to_account_id, user)?;

    // Sufficiency is judged in the source currency, before conversion.
    if from.balance < amount {
        return Err(LedgerError::IllegalOperation(
            "Insufficient funds in source account".to_string(),
        ));
    }

    let converted = if from.currency != to.currency {
        amount * fx::rate(&tx, &from.currency, &to.currency)?
    } else {
        amount
    };

    accounts::change_balance(&tx, from.id, -amount, user)?;
    accounts::change_balance(&tx, to.id, converted, user)?;
    tx.commit()?;
    Ok(())
}
