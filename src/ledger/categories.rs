// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Minimal category surface. Categories are a collaborator the ledger core
//! consumes as `(id, name, group)` references; posting and budgets resolve
//! them through [`get`].

use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{LedgerError, LedgerResult};
use crate::models::{Category, UserId};

fn read_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        group: r.get(3)?,
    })
}

pub fn create(
    conn: &Connection,
    user: UserId,
    name: &str,
    group: Option<&str>,
) -> LedgerResult<Category> {
    conn.execute(
        "INSERT INTO categories(user_id, name, group_name) VALUES (?1, ?2, ?3)",
        params![user.0, name, group],
    )?;
    Ok(Category {
        id: conn.last_insert_rowid(),
        user_id: user.0,
        name: name.to_string(),
        group: group.map(|g| g.to_string()),
    })
}

pub fn get(conn: &Connection, id: i64) -> LedgerResult<Category> {
    conn.query_row(
        "SELECT id, user_id, name, group_name FROM categories WHERE id=?1",
        params![id],
        read_row,
    )
    .optional()?
    .ok_or(LedgerError::CategoryNotFound(id))
}

pub fn list(conn: &Connection, user: UserId) -> LedgerResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, group_name FROM categories WHERE user_id=?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![user.0], read_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn delete(conn: &Connection, user: UserId, id: i64) -> LedgerResult<()> {
    let category = get(conn, id)?;
    if category.user_id != user.0 {
        return Err(LedgerError::AccessDenied(id));
    }
    conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    Ok(())
}
