// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Currencies and directional exchange rates. A rate row converts one unit
//! of `from_currency` into `to_currency`; the reverse direction is its own
//! independently sourced row and is never derived as a reciprocal. Any
//! operation that needs a missing direction fails hard.

use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::decimal_col;
use crate::models::{Currency, ExchangeRate};

pub fn add_currency(
    conn: &Connection,
    code: &str,
    name: &str,
    symbol: &str,
) -> LedgerResult<Currency> {
    let code = code.to_uppercase();
    conn.execute(
        "INSERT INTO currencies(code, name, symbol) VALUES (?1, ?2, ?3)
         ON CONFLICT(code) DO UPDATE SET name=excluded.name, symbol=excluded.symbol",
        params![code, name, symbol],
    )?;
    Ok(Currency {
        code,
        name: name.to_string(),
        symbol: symbol.to_string(),
    })
}

pub fn get_currency(conn: &Connection, code: &str) -> LedgerResult<Currency> {
    let code = code.to_uppercase();
    conn.query_row(
        "SELECT code, name, symbol FROM currencies WHERE code=?1",
        params![code],
        |r| {
            Ok(Currency {
                code: r.get(0)?,
                name: r.get(1)?,
                symbol: r.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or(LedgerError::CurrencyNotFound(code))
}

pub fn list_currencies(conn: &Connection) -> LedgerResult<Vec<Currency>> {
    let mut stmt = conn.prepare("SELECT code, name, symbol FROM currencies ORDER BY code")?;
    let rows = stmt.query_map([], |r| {
        Ok(Currency {
            code: r.get(0)?,
            name: r.get(1)?,
            symbol: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Upserts one direction. Refreshing a quote bumps `last_updated`; the
/// reverse direction is left untouched.
pub fn set_rate(conn: &Connection, from: &str, to: &str, rate: Decimal) -> LedgerResult<()> {
    let from = get_currency(conn, from)?;
    let to = get_currency(conn, to)?;
    conn.execute(
        "INSERT INTO exchange_rates(from_currency, to_currency, rate) VALUES (?1, ?2, ?3)
         ON CONFLICT(from_currency, to_currency)
         DO UPDATE SET rate=excluded.rate, last_updated=datetime('now')",
        params![from.code, to.code, rate.to_string()],
    )?;
    Ok(())
}

/// Exact directional lookup. No reciprocal or hub fallback.
pub fn rate(conn: &Connection, from: &str, to: &str) -> LedgerResult<Decimal> {
    let from = from.to_uppercase();
    let to = to.to_uppercase();
    let found: Option<Decimal> = conn
        .query_row(
            "SELECT rate FROM exchange_rates WHERE from_currency=?1 AND to_currency=?2",
            params![from, to],
            |r| decimal_col(r, 0),
        )
        .optional()?;
    found.ok_or(LedgerError::RateNotFound { from, to })
}

pub fn convert(conn: &Connection, amount: Decimal, from: &str, to: &str) -> LedgerResult<Decimal> {
    if from.eq_ignore_ascii_case(to) {
        return Ok(amount);
    }
    Ok(amount * rate(conn, from, to)?)
}

pub fn list_rates(conn: &Connection) -> LedgerResult<Vec<ExchangeRate>> {
    let mut stmt = conn.prepare(
        "SELECT from_currency, to_currency, rate, last_updated
         FROM exchange_rates ORDER BY from_currency, to_currency",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(ExchangeRate {
            from_currency: r.get(0)?,
            to_currency: r.get(1)?,
            rate: decimal_col(r, 2)?,
            last_updated: r.get(3)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
