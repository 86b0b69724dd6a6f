// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::db;
use billfold::errors::LedgerError;
use billfold::ledger::{accounts, budgets, categories, posting, users};
use billfold::models::{Transaction, TransactionType, UserId};
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

fn post(
    conn: &mut Connection,
    user: UserId,
    account_id: i64,
    category_id: i64,
    amount: &str,
    kind: TransactionType,
) -> Transaction {
    posting::post_transaction(
        conn,
        user,
        &posting::NewTransaction {
            account_id,
            category_id,
            amount: dec(amount),
            kind,
            date: None,
            description: None,
        },
    )
    .unwrap()
}

#[test]
fn shrinking_an_expense_credits_only_the_difference() {
    let (mut conn, user, account_id, category_id) = setup();
    let tx = post(&mut conn, user, account_id, category_id, "40", TransactionType::Expense);
    assert_eq!(accounts::get(&conn, user, account_id).unwrap().balance, dec("60"));

    let updated = posting::edit_transaction(
        &mut conn,
        tx.id,
        &posting::TransactionPatch {
            amount: Some(dec("25")),
            ..Default::default()
        },
    )
    .unwrap();

    // -25 - (-40) = +15
    assert_eq!(updated.amount, dec("-25"));
    assert_eq!(accounts::get(&conn, user, account_id).unwrap().balance, dec("75"));
}

#[test]
fn growing_an_income_credits_only_the_difference() {
    let (mut conn, user, account_id, category_id) = setup();
    let tx = post(&mut conn, user, account_id, category_id, "40", TransactionType::Income);
    assert_eq!(accounts::get(&conn, user, account_id).unwrap().balance, dec("140"));

    let updated = posting::edit_transaction(
        &mut conn,
        tx.id,
        &posting::TransactionPatch {
            amount: Some(dec("55")),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(updated.amount, dec("55"));
    assert_eq!(accounts::get(&conn, user, account_id).unwrap().balance, dec("155"));
}

#[test]
fn unchanged_magnitude_is_a_noop_for_the_balance() {
    let (mut conn, user, account_id, category_id) = setup();
    let tx = post(&mut conn, user, account_id, category_id, "40", TransactionType::Expense);

    posting::edit_transaction(
        &mut conn,
        tx.id,
        &posting::TransactionPatch {
            amount: Some(dec("40")),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(accounts::get(&conn, user, account_id).unwrap().balance, dec("60"));
}

#[test]
fn metadata_edits_leave_the_balance_alone() {
    let (mut conn, user, account_id, category_id) = setup();
    let groceries = categories::create(&conn, user, "Groceries", None).unwrap();
    let tx = post(&mut conn, user, account_id, category_id, "40", TransactionType::Expense);

    let new_date = NaiveDate::parse_from_str("2025-03-01", "%Y-%m-%d").unwrap();
    let updated = posting::edit_transaction(
        &mut conn,
        tx.id,
        &posting::TransactionPatch {
            category_id: Some(groceries.id),
            description: Some("team lunch".to_string()),
            date: Some(new_date),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(updated.category_id, Some(groceries.id));
    assert_eq!(updated.description.as_deref(), Some("team lunch"));
    assert_eq!(updated.date, new_date);
    assert_eq!(updated.amount, dec("-40"));
    assert_eq!(accounts::get(&conn, user, account_id).unwrap().balance, dec("60"));
}

#[test]
fn editing_a_missing_transaction_fails() {
    let (mut conn, _user, _account_id, _category_id) = setup();
    let err = posting::edit_transaction(
        &mut conn,
        424242,
        &posting::TransactionPatch::default(),
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::TransactionNotFound(424242)));
}

#[test]
fn deletion_keeps_the_posted_balance_and_budget_spend() {
    let (mut conn, user, account_id, category_id) = setup();
    let tx = post(&mut conn, user, account_id, category_id, "40", TransactionType::Expense);
    let spent_before = budgets::find_open(&conn, user, category_id)
        .unwrap()
        .unwrap()
        .spent;

    posting::delete_transaction(&conn, tx.id).unwrap();

    assert!(matches!(
        posting::get(&conn, tx.id).unwrap_err(),
        LedgerError::TransactionNotFound(_)
    ));
    // History is immutable once posted: no reversal on either aggregate.
    assert_eq!(accounts::get(&conn, user, account_id).unwrap().balance, dec("60"));
    let spent_after = budgets::find_open(&conn, user, category_id)
        .unwrap()
        .unwrap()
        .spent;
    assert_eq!(spent_before, spent_after);
}
