// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::fx;
use crate::models::User;

pub fn create(conn: &Connection, name: &str, main_currency: &str) -> LedgerResult<User> {
    let currency = fx::get_currency(conn, main_currency)?;
    conn.execute(
        "INSERT INTO users(name, main_currency) VALUES (?1, ?2)",
        params![name, currency.code],
    )?;
    Ok(User {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        main_currency: currency.code,
    })
}

pub fn get(conn: &Connection, id: i64) -> LedgerResult<User> {
    conn.query_row(
        "SELECT id, name, main_currency FROM users WHERE id=?1",
        params![id],
        |r| {
            Ok(User {
                id: r.get(0)?,
                name: r.get(1)?,
                main_currency: r.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| LedgerError::UserNotFound(id.to_string()))
}

pub fn find_by_name(conn: &Connection, name: &str) -> LedgerResult<User> {
    conn.query_row(
        "SELECT id, name, main_currency FROM users WHERE name=?1",
        params![name],
        |r| {
            Ok(User {
                id: r.get(0)?,
                name: r.get(1)?,
                main_currency: r.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| LedgerError::UserNotFound(name.to_string()))
}

pub fn list(conn: &Connection) -> LedgerResult<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name, main_currency FROM users ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(User {
            id: r.get(0)?,
            name: r.get(1)?,
            main_currency: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
