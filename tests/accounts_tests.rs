// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::db;
use billfold::errors::LedgerError;
use billfold::ledger::{accounts, users};
use billfold::models::UserId;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> (Connection, UserId) {
    let conn = db::open_in_memory().unwrap();
    let user = users::create(&conn, "alice", "USD").unwrap();
    (conn, UserId(user.id))
}

fn new_account(name: &str, balance: &str) -> accounts::NewAccount {
    accounts::NewAccount {
        name: name.to_string(),
        description: None,
        currency: "USD".to_string(),
        balance: dec(balance),
        color: None,
    }
}

#[test]
fn creation_applies_the_documented_defaults() {
    let (conn, user) = setup();
    let account = accounts::create(&conn, user, &new_account("Checking", "25.50")).unwrap();

    assert_eq!(account.balance, dec("25.50"));
    assert!(account.include_in_stats);
    assert!(!account.archived);

    let reloaded = accounts::get(&conn, user, account.id).unwrap();
    assert_eq!(reloaded.balance, dec("25.50"));
    assert_eq!(reloaded.currency, "USD");
}

#[test]
fn unknown_currency_is_rejected_at_creation() {
    let (conn, user) = setup();
    let mut req = new_account("Checking", "0");
    req.currency = "ZZZ".to_string();
    let err = accounts::create(&conn, user, &req).unwrap_err();
    assert!(matches!(err, LedgerError::CurrencyNotFound(_)));
}

#[test]
fn update_rejects_a_balance_change() {
    let (conn, user) = setup();
    let account = accounts::create(&conn, user, &new_account("Checking", "100")).unwrap();

    let err = accounts::update(
        &conn,
        user,
        account.id,
        &accounts::AccountPatch {
            balance: Some(dec("999")),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::IllegalOperation(_)));
    assert_eq!(accounts::get(&conn, user, account.id).unwrap().balance, dec("100"));
}

#[test]
fn update_rejects_a_currency_change() {
    let (conn, user) = setup();
    let account = accounts::create(&conn, user, &new_account("Checking", "100")).unwrap();

    let err = accounts::update(
        &conn,
        user,
        account.id,
        &accounts::AccountPatch {
            currency: Some("EUR".to_string()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::IllegalOperation(_)));
}

#[test]
fn update_accepts_the_stored_balance_and_metadata() {
    let (conn, user) = setup();
    let account = accounts::create(&conn, user, &new_account("Checking", "100")).unwrap();

    let updated = accounts::update(
        &conn,
        user,
        account.id,
        &accounts::AccountPatch {
            name: Some("Daily".to_string()),
            description: Some("spending money".to_string()),
            color: Some("#00AA00".to_string()),
            balance: Some(dec("100")),
            currency: Some("usd".to_string()),
        },
    )
    .unwrap();

    assert_eq!(updated.name, "Daily");
    assert_eq!(updated.description.as_deref(), Some("spending money"));
    assert_eq!(updated.color.as_deref(), Some("#00AA00"));
}

#[test]
fn archive_and_stats_flags_toggle() {
    let (conn, user) = setup();
    let account = accounts::create(&conn, user, &new_account("Checking", "100")).unwrap();

    assert!(accounts::toggle_archived(&conn, user, account.id).unwrap());
    assert!(!accounts::toggle_archived(&conn, user, account.id).unwrap());

    assert!(!accounts::toggle_include_in_stats(&conn, user, account.id).unwrap());
    assert!(accounts::toggle_include_in_stats(&conn, user, account.id).unwrap());

    // Archiving is a soft delete: the balance survives.
    accounts::toggle_archived(&conn, user, account.id).unwrap();
    assert_eq!(accounts::get(&conn, user, account.id).unwrap().balance, dec("100"));
}

#[test]
fn foreign_accounts_are_denied_not_hidden() {
    let (conn, user) = setup();
    let bob = UserId(users::create(&conn, "bob", "USD").unwrap().id);
    let account = accounts::create(&conn, user, &new_account("Checking", "100")).unwrap();

    let err = accounts::get(&conn, bob, account.id).unwrap_err();
    assert!(matches!(err, LedgerError::AccessDenied(_)));

    let err = accounts::get(&conn, user, 4242).unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(4242)));
}

#[test]
fn reported_balance_rounds_to_cents() {
    let (conn, user) = setup();
    let account = accounts::create(&conn, user, &new_account("Checking", "10.0049")).unwrap();
    let reloaded = accounts::get(&conn, user, account.id).unwrap();

    // Stored value stays exact; only the reported figure rounds.
    assert_eq!(reloaded.balance, dec("10.0049"));
    assert_eq!(reloaded.rounded_balance(), dec("10.00"));
}

#[test]
fn delete_removes_the_account() {
    let (conn, user) = setup();
    let account = accounts::create(&conn, user, &new_account("Checking", "100")).unwrap();
    accounts::delete(&conn, user, account.id).unwrap();
    assert!(matches!(
        accounts::get(&conn, user, account.id).unwrap_err(),
        LedgerError::AccountNotFound(_)
    ));
}
