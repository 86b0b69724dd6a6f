// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Billfold", "billfold"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("billfold.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    open_at(&path)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// In-memory database with the full schema applied. Used by the test suite.
pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory().context("Open in-memory DB")?;
    init_schema(&mut conn)?;
    Ok(conn)
}

fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS currencies(
        code TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        symbol TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        main_currency TEXT NOT NULL REFERENCES currencies(code),
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    -- Directional quotes: A->B and B->A are independent rows.
    CREATE TABLE IF NOT EXISTS exchange_rates(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        from_currency TEXT NOT NULL REFERENCES currencies(code),
        to_currency TEXT NOT NULL REFERENCES currencies(code),
        rate TEXT NOT NULL,
        last_updated TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(from_currency, to_currency)
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        description TEXT,
        currency TEXT NOT NULL REFERENCES currencies(code),
        balance TEXT NOT NULL,
        color TEXT,
        include_in_stats INTEGER NOT NULL DEFAULT 1,
        archived INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, name)
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        group_name TEXT,
        UNIQUE(user_id, name)
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
        category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
        amount TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('expense','income')),
        description TEXT,
        date TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);

    CREATE TABLE IF NOT EXISTS recurring_transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
        category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
        amount TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('expense','income')),
        description TEXT,
        period TEXT NOT NULL CHECK(period IN ('daily','weekly','monthly','yearly','once')),
        next_date TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1
    );
    CREATE INDEX IF NOT EXISTS idx_recurring_next ON recurring_transactions(next_date);

    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
        period TEXT NOT NULL CHECK(period IN ('weekly','monthly','yearly')),
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        limit_amount TEXT NOT NULL,
        spent TEXT NOT NULL DEFAULT '0',
        status TEXT NOT NULL DEFAULT 'open' CHECK(status IN ('open','closed'))
    );
    CREATE INDEX IF NOT EXISTS idx_budgets_category ON budgets(category_id, status);

    INSERT OR IGNORE INTO currencies(code, name, symbol) VALUES
        ('USD', 'United States Dollar', '$'),
        ('EUR', 'Euro', '€'),
        ('GBP', 'Pound Sterling', '£'),
        ('PLN', 'Polish Złoty', 'zł'),
        ('JPY', 'Japanese Yen', '¥'),
        ('CHF', 'Swiss Franc', 'Fr');
    "#,
    )?;
    Ok(())
}
