// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::db;
use billfold::errors::LedgerError;
use billfold::ledger::{accounts, categories, posting, recurring, users};
use billfold::models::{PeriodType, TransactionType, UserId};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
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
            balance: dec("1000"),
            color: None,
        },
    )
    .unwrap();
    let category = categories::create(&conn, uid, "Rent", None).unwrap();
    (conn, uid, account.id, category.id)
}

fn template(
    account_id: i64,
    category_id: i64,
    amount: &str,
    period: PeriodType,
    start: &str,
) -> recurring::NewRecurring {
    recurring::NewRecurring {
        account_id,
        category_id,
        amount: dec(amount),
        kind: TransactionType::Expense,
        period,
        start: Some(d(start)),
        description: None,
    }
}

fn journal(conn: &Connection, user: UserId) -> Vec<posting::JournalEntry> {
    posting::transactions_for_user(conn, user, &posting::TransactionFilter::default()).unwrap()
}

#[test]
fn overdue_template_advances_one_period_per_run() {
    let (mut conn, user, account_id, category_id) = setup();
    // Anchor in the future relative to creation day, so nothing posts yet.
    let tpl = recurring::create(
        &mut conn,
        user,
        &template(account_id, category_id, "50", PeriodType::Monthly, "2024-01-01"),
        d("2023-12-15"),
    )
    .unwrap();
    assert_eq!(tpl.next_date, d("2024-01-01"));

    // Two periods overdue: still exactly one materialization per run.
    let summary = recurring::run_due(&mut conn, d("2024-03-15")).unwrap();
    assert_eq!(summary.generated.len(), 1);
    assert!(summary.failures.is_empty());

    let entries = journal(&conn, user);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].date, d("2024-01-01"));
    assert_eq!(entries[0].amount, dec("-50"));
    assert_eq!(recurring::get(&conn, tpl.id).unwrap().next_date, d("2024-02-01"));

    // The next run catches up the following period only.
    recurring::run_due(&mut conn, d("2024-03-15")).unwrap();
    let entries = journal(&conn, user);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].date, d("2024-02-01"));
}

#[test]
fn future_template_is_left_alone() {
    let (mut conn, user, account_id, category_id) = setup();
    recurring::create(
        &mut conn,
        user,
        &template(account_id, category_id, "50", PeriodType::Weekly, "2024-06-01"),
        d("2024-05-01"),
    )
    .unwrap();

    let summary = recurring::run_due(&mut conn, d("2024-05-15")).unwrap();
    assert!(summary.generated.is_empty());
    assert_eq!(summary.skipped, 1);
    assert!(journal(&conn, user).is_empty());
}

#[test]
fn once_template_fires_a_single_time_then_deactivates() {
    let (mut conn, user, account_id, category_id) = setup();
    let tpl = recurring::create(
        &mut conn,
        user,
        &template(account_id, category_id, "75", PeriodType::Once, "2024-04-01"),
        d("2024-03-01"),
    )
    .unwrap();

    let summary = recurring::run_due(&mut conn, d("2024-04-02")).unwrap();
    assert_eq!(summary.generated.len(), 1);
    assert!(!recurring::get(&conn, tpl.id).unwrap().active);

    // Deactivated templates never run again.
    let summary = recurring::run_due(&mut conn, d("2024-05-01")).unwrap();
    assert!(summary.generated.is_empty());
    assert_eq!(journal(&conn, user).len(), 1);
}

#[test]
fn anchor_not_in_the_future_posts_at_creation() {
    let (mut conn, user, account_id, category_id) = setup();
    let tpl = recurring::create(
        &mut conn,
        user,
        &template(account_id, category_id, "50", PeriodType::Monthly, "2024-03-10"),
        d("2024-03-10"),
    )
    .unwrap();

    let entries = journal(&conn, user);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].date, d("2024-03-10"));
    assert_eq!(tpl.next_date, d("2024-04-10"));
    assert!(tpl.active);
    assert_eq!(
        accounts::get(&conn, user, account_id).unwrap().balance,
        dec("950")
    );
}

#[test]
fn once_anchor_in_the_past_is_fulfilled_and_stored_inactive() {
    let (mut conn, user, account_id, category_id) = setup();
    let tpl = recurring::create(
        &mut conn,
        user,
        &template(account_id, category_id, "75", PeriodType::Once, "2024-03-01"),
        d("2024-03-05"),
    )
    .unwrap();

    assert!(!tpl.active);
    assert_eq!(journal(&conn, user).len(), 1);
    let summary = recurring::run_due(&mut conn, d("2024-06-01")).unwrap();
    assert!(summary.generated.is_empty());
    assert_eq!(journal(&conn, user).len(), 1);
}

#[test]
fn none_period_is_rejected() {
    let (mut conn, user, account_id, category_id) = setup();
    let err = recurring::create(
        &mut conn,
        user,
        &template(account_id, category_id, "50", PeriodType::None, "2024-01-01"),
        d("2024-01-01"),
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
}

#[test]
fn advance_handles_calendar_arithmetic() {
    let advance = |s: &str, p: PeriodType| recurring::advance(d(s), p);

    assert_eq!(advance("2024-03-01", PeriodType::Daily), d("2024-03-02"));
    assert_eq!(advance("2024-03-01", PeriodType::Weekly), d("2024-03-08"));
    // Day-of-month is clipped to the target month's length.
    assert_eq!(advance("2024-01-31", PeriodType::Monthly), d("2024-02-29"));
    assert_eq!(advance("2023-01-31", PeriodType::Monthly), d("2023-02-28"));
    assert_eq!(advance("2024-02-29", PeriodType::Yearly), d("2025-02-28"));
    assert_eq!(advance("2024-05-05", PeriodType::Once), d("2024-05-05"));
}

#[test]
fn one_broken_template_does_not_stop_the_batch() {
    let (mut conn, user, account_id, category_id) = setup();
    let doomed_cat = categories::create(&conn, user, "Doomed", None).unwrap();

    let healthy = recurring::create(
        &mut conn,
        user,
        &template(account_id, category_id, "50", PeriodType::Monthly, "2024-04-01"),
        d("2024-03-01"),
    )
    .unwrap();
    let broken = recurring::create(
        &mut conn,
        user,
        &template(account_id, doomed_cat.id, "60", PeriodType::Monthly, "2024-04-01"),
        d("2024-03-01"),
    )
    .unwrap();

    // Deleting the category nulls the template's reference.
    categories::delete(&conn, user, doomed_cat.id).unwrap();

    let summary = recurring::run_due(&mut conn, d("2024-04-02")).unwrap();
    assert_eq!(summary.generated.len(), 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].template_id, broken.id);

    // The healthy template advanced; the broken one did not lose state.
    assert_eq!(recurring::get(&conn, healthy.id).unwrap().next_date, d("2024-05-01"));
    assert_eq!(recurring::get(&conn, broken.id).unwrap().next_date, d("2024-04-01"));
    assert_eq!(journal(&conn, user).len(), 1);
}

#[test]
fn inactive_template_is_never_materialized() {
    let (mut conn, user, account_id, category_id) = setup();
    let tpl = recurring::create(
        &mut conn,
        user,
        &template(account_id, category_id, "50", PeriodType::Daily, "2024-04-01"),
        d("2024-03-01"),
    )
    .unwrap();
    recurring::toggle_active(&conn, tpl.id).unwrap();

    let summary = recurring::run_due(&mut conn, d("2024-04-05")).unwrap();
    assert!(summary.generated.is_empty());
    assert!(journal(&conn, user).is_empty());
}

#[test]
fn template_edit_is_balance_neutral() {
    let (mut conn, user, account_id, category_id) = setup();
    let tpl = recurring::create(
        &mut conn,
        user,
        &template(account_id, category_id, "50", PeriodType::Monthly, "2024-05-01"),
        d("2024-04-01"),
    )
    .unwrap();

    let updated = recurring::edit(
        &conn,
        tpl.id,
        &recurring::RecurringPatch {
            amount: Some(dec("80")),
            period: Some(PeriodType::Weekly),
            next_date: Some(d("2024-05-08")),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(updated.amount, dec("-80"));
    assert_eq!(updated.period, PeriodType::Weekly);
    assert_eq!(updated.next_date, d("2024-05-08"));
    assert_eq!(
        accounts::get(&conn, user, account_id).unwrap().balance,
        dec("1000")
    );
}
