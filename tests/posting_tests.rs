// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::db;
use billfold::errors::LedgerError;
use billfold::ledger::{accounts, categories, posting, users};
use billfold::models::{TransactionType, UserId};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> (Connection, UserId, i64, i64) {
    let conn = db::open_in_memory().unwrap();
    let user = users::create(&conn, "alice", "USD").unwrap();
    let uid = UserId(user.id);
    let account = accounts::create(
        &conn,
        uid,
        &accounts::NewAccount {
            name: "Checking".to_string(),
            description: None,
            currency: "USD".to_string(),
            balance: dec("100"),
            color: None,
        },
    )
    .unwrap();
    let category = categories::create(&conn, uid, "Dining", None).unwrap();
    (conn, uid, account.id, category.id)
}

fn new_tx(
    account_id: i64,
    category_id: i64,
    amount: &str,
    kind: TransactionType,
    date: Option<NaiveDate>,
) -> posting::NewTransaction {
    posting::NewTransaction {
        account_id,
        category_id,
        amount: dec(amount),
        kind,
        date,
        description: None,
    }
}

#[test]
fn expense_is_stored_negative_and_reduces_balance() {
    let (mut conn, user, account_id, category_id) = setup();
    let posted = posting::post_transaction(
        &mut conn,
        user,
        &new_tx(account_id, category_id, "30", TransactionType::Expense, None),
    )
    .unwrap();

    assert_eq!(posted.amount, dec("-30"));
    assert_eq!(
        accounts::get(&conn, user, account_id).unwrap().balance,
        dec("70")
    );
}

#[test]
fn income_is_stored_positive_and_raises_balance() {
    let (mut conn, user, account_id, category_id) = setup();
    let posted = posting::post_transaction(
        &mut conn,
        user,
        &new_tx(account_id, category_id, "30", TransactionType::Income, None),
    )
    .unwrap();

    assert_eq!(posted.amount, dec("30"));
    assert_eq!(
        accounts::get(&conn, user, account_id).unwrap().balance,
        dec("130")
    );
}

#[test]
fn caller_supplied_sign_is_ignored() {
    let (mut conn, user, account_id, category_id) = setup();
    // A negative magnitude still posts as a negative expense, once.
    let posted = posting::post_transaction(
        &mut conn,
        user,
        &new_tx(account_id, category_id, "-30", TransactionType::Expense, None),
    )
    .unwrap();
    assert_eq!(posted.amount, dec("-30"));
}

#[test]
fn date_defaults_to_today() {
    let (mut conn, user, account_id, category_id) = setup();
    let posted = posting::post_transaction(
        &mut conn,
        user,
        &new_tx(account_id, category_id, "5", TransactionType::Expense, None),
    )
    .unwrap();
    assert_eq!(posted.date, chrono::Utc::now().date_naive());
}

#[test]
fn unknown_account_is_not_found() {
    let (mut conn, user, _account_id, category_id) = setup();
    let err = posting::post_transaction(
        &mut conn,
        user,
        &new_tx(9999, category_id, "5", TransactionType::Expense, None),
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(9999)));
}

#[test]
fn unknown_category_fails_without_touching_the_balance() {
    let (mut conn, user, account_id, _category_id) = setup();
    let err = posting::post_transaction(
        &mut conn,
        user,
        &new_tx(account_id, 9999, "5", TransactionType::Expense, None),
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::CategoryNotFound(9999)));
    assert_eq!(
        accounts::get(&conn, user, account_id).unwrap().balance,
        dec("100")
    );
}

#[test]
fn posting_to_another_users_account_is_denied() {
    let (mut conn, _user, account_id, category_id) = setup();
    let bob = UserId(users::create(&conn, "bob", "USD").unwrap().id);
    let err = posting::post_transaction(
        &mut conn,
        bob,
        &new_tx(account_id, category_id, "5", TransactionType::Expense, None),
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::AccessDenied(_)));
}

#[test]
fn zero_amount_is_invalid() {
    let (mut conn, user, account_id, category_id) = setup();
    let err = posting::post_transaction(
        &mut conn,
        user,
        &new_tx(account_id, category_id, "0", TransactionType::Expense, None),
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
}

#[test]
fn filters_compose_conjunctively() {
    let (mut conn, user, account_id, category_id) = setup();
    let groceries = categories::create(&conn, user, "Groceries", None).unwrap();
    let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();

    for (cat, amount, kind, date) in [
        (category_id, "10", TransactionType::Expense, "2025-01-05"),
        (groceries.id, "20", TransactionType::Expense, "2025-01-10"),
        (category_id, "300", TransactionType::Income, "2025-01-15"),
        (category_id, "40", TransactionType::Expense, "2025-02-01"),
    ] {
        posting::post_transaction(
            &mut conn,
            user,
            &new_tx(account_id, cat, amount, kind, Some(d(date))),
        )
        .unwrap();
    }

    let filter = posting::TransactionFilter {
        category: Some("Dining".to_string()),
        kind: Some(TransactionType::Expense),
        start_date: Some(d("2025-01-01")),
        end_date: Some(d("2025-01-31")),
        ..Default::default()
    };
    let entries = posting::transactions_for_user(&conn, user, &filter).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, dec("-10"));

    // Amount bounds are inclusive and apply to the signed amount.
    let filter = posting::TransactionFilter {
        min_amount: Some(dec("-20")),
        max_amount: Some(dec("-10")),
        ..Default::default()
    };
    let entries = posting::transactions_for_user(&conn, user, &filter).unwrap();
    assert_eq!(entries.len(), 2);
}

#[test]
fn query_for_unknown_user_fails() {
    let (conn, _user, _account_id, _category_id) = setup();
    let err = posting::transactions_for_user(
        &conn,
        UserId(777),
        &posting::TransactionFilter::default(),
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::UserNotFound(_)));
}
