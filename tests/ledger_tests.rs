// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerloop::directory::{create_user, find_category};
use ledgerloop::error::LedgerError;
use ledgerloop::ledger::{
    TransactionInput, create_transaction, delete_transaction, edit_transaction, series_members,
    user_transactions,
};
use ledgerloop::models::{EntryType, Transaction, TransactionPatch};
use ledgerloop::scope::{EditScope, Outcome};
use ledgerloop::store::{MemoryStore, Records, SqliteStore};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn money(v: i64) -> Decimal {
    Decimal::from_i64(v).unwrap()
}

fn setup() -> (MemoryStore, String, String) {
    let mut store = MemoryStore::new();
    let user = create_user(&mut store, "Ana", "ana@example.com").unwrap();
    let food = find_category(&store, &user.id, "food").unwrap().unwrap();
    (store, user.id, food.id)
}

fn rent(user_id: &str, category_id: &str, months: Option<u32>) -> TransactionInput {
    TransactionInput {
        user_id: user_id.to_string(),
        r#type: EntryType::Expense,
        amount: money(100),
        description: "Rent".into(),
        category_id: category_id.to_string(),
        date: d(2024, 1, 10),
        recurring_months: months,
    }
}

fn by_date(mut txs: Vec<Transaction>) -> Vec<Transaction> {
    txs.sort_by_key(|t| t.date);
    txs
}

#[test]
fn single_transaction_is_not_recurring() {
    let (mut store, user, cat) = setup();
    let created = create_transaction(&mut store, &rent(&user, &cat, None)).unwrap();
    assert_eq!(created.len(), 1);
    let t = &created[0];
    assert!(!t.is_recurring);
    assert!(t.recurring_series_id.is_none());
    assert!(!t.id.is_empty());
}

#[test]
fn recurring_transaction_expands_monthly_with_shared_series() {
    let (mut store, user, cat) = setup();
    let created = create_transaction(&mut store, &rent(&user, &cat, Some(3))).unwrap();
    let dates: Vec<_> = created.iter().map(|t| t.date).collect();
    assert_eq!(dates, vec![d(2024, 1, 10), d(2024, 2, 10), d(2024, 3, 10)]);
    let sid = created[0].recurring_series_id.clone().unwrap();
    assert!(created.iter().all(|t| t.recurring_series_id.as_deref() == Some(sid.as_str())));
    assert!(created.iter().all(|t| t.is_recurring && t.recurring_months == Some(3)));
    assert_eq!(user_transactions(&store, &user).unwrap().len(), 3);
}

#[test]
fn invalid_input_writes_nothing() {
    let (mut store, user, cat) = setup();
    let mut input = rent(&user, &cat, Some(0));
    assert!(matches!(
        create_transaction(&mut store, &input),
        Err(LedgerError::Validation(_))
    ));
    input.recurring_months = None;
    input.amount = Decimal::ZERO;
    assert!(create_transaction(&mut store, &input).is_err());
    input.amount = money(5);
    input.description = "   ".into();
    assert!(create_transaction(&mut store, &input).is_err());
    assert!(user_transactions(&store, &user).unwrap().is_empty());
}

#[test]
fn recurring_edit_needs_a_scope() {
    let (mut store, user, cat) = setup();
    let created = create_transaction(&mut store, &rent(&user, &cat, Some(3))).unwrap();
    let patch = TransactionPatch {
        amount: Some(money(120)),
        ..Default::default()
    };
    let outcome = edit_transaction(&mut store, &created[1].id, &patch, None).unwrap();
    assert_eq!(outcome, Outcome::ScopeRequired);
    assert!(
        user_transactions(&store, &user)
            .unwrap()
            .iter()
            .all(|t| t.amount == money(100))
    );
}

#[test]
fn edit_future_updates_anchor_and_later_members() {
    let (mut store, user, cat) = setup();
    let created = create_transaction(&mut store, &rent(&user, &cat, Some(4))).unwrap();
    let patch = TransactionPatch {
        amount: Some(money(120)),
        description: Some("Rent (new lease)".into()),
        ..Default::default()
    };
    let outcome =
        edit_transaction(&mut store, &created[1].id, &patch, Some(EditScope::Future)).unwrap();
    assert_eq!(outcome, Outcome::Applied(3));
    let rows = by_date(user_transactions(&store, &user).unwrap());
    let amounts: Vec<_> = rows.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![money(100), money(120), money(120), money(120)]);
    assert_eq!(rows[0].description, "Rent");
    assert_eq!(rows[3].description, "Rent (new lease)");
}

#[test]
fn edit_single_and_all() {
    let (mut store, user, cat) = setup();
    let created = create_transaction(&mut store, &rent(&user, &cat, Some(3))).unwrap();
    let patch = TransactionPatch {
        amount: Some(money(90)),
        ..Default::default()
    };
    assert_eq!(
        edit_transaction(&mut store, &created[2].id, &patch, Some(EditScope::Single)).unwrap(),
        Outcome::Applied(1)
    );
    let patch = TransactionPatch {
        description: Some("Flat".into()),
        ..Default::default()
    };
    assert_eq!(
        edit_transaction(&mut store, &created[2].id, &patch, Some(EditScope::All)).unwrap(),
        Outcome::Applied(3)
    );
    let rows = by_date(user_transactions(&store, &user).unwrap());
    assert!(rows.iter().all(|t| t.description == "Flat"));
    assert_eq!(rows[2].amount, money(90));
    assert_eq!(rows[0].amount, money(100));
}

#[test]
fn series_edit_keeps_dates() {
    let (mut store, user, cat) = setup();
    let created = create_transaction(&mut store, &rent(&user, &cat, Some(2))).unwrap();
    let patch = TransactionPatch {
        amount: Some(money(50)),
        date: Some(d(2030, 1, 1)),
        ..Default::default()
    };
    edit_transaction(&mut store, &created[0].id, &patch, Some(EditScope::All)).unwrap();
    let rows = by_date(user_transactions(&store, &user).unwrap());
    assert_eq!(rows[0].date, d(2024, 1, 10));
    assert_eq!(rows[1].date, d(2024, 2, 10));
    assert!(rows.iter().all(|t| t.amount == money(50)));

    let date_only = TransactionPatch {
        date: Some(d(2030, 1, 1)),
        ..Default::default()
    };
    assert!(
        edit_transaction(&mut store, &created[0].id, &date_only, Some(EditScope::Single)).is_err()
    );
}

#[test]
fn plain_transaction_edit_can_move_date() {
    let (mut store, user, cat) = setup();
    let created = create_transaction(&mut store, &rent(&user, &cat, None)).unwrap();
    let patch = TransactionPatch {
        date: Some(d(2024, 5, 5)),
        ..Default::default()
    };
    assert_eq!(
        edit_transaction(&mut store, &created[0].id, &patch, None).unwrap(),
        Outcome::Applied(1)
    );
    let t: Transaction = store.find_record(&created[0].id).unwrap().unwrap();
    assert_eq!(t.date, d(2024, 5, 5));
}

#[test]
fn empty_patch_and_missing_ids() {
    let (mut store, user, cat) = setup();
    let created = create_transaction(&mut store, &rent(&user, &cat, None)).unwrap();
    assert!(
        edit_transaction(&mut store, &created[0].id, &TransactionPatch::default(), None).is_err()
    );
    let patch = TransactionPatch {
        amount: Some(money(1)),
        ..Default::default()
    };
    assert_eq!(
        edit_transaction(&mut store, "nope", &patch, Some(EditScope::All)).unwrap(),
        Outcome::NotFound
    );
    assert_eq!(
        delete_transaction(&mut store, "nope", None).unwrap(),
        Outcome::NotFound
    );
}

#[test]
fn delete_scopes() {
    let (mut store, user, cat) = setup();
    let created = create_transaction(&mut store, &rent(&user, &cat, Some(4))).unwrap();

    assert_eq!(
        delete_transaction(&mut store, &created[0].id, None).unwrap(),
        Outcome::ScopeRequired
    );
    assert_eq!(
        delete_transaction(&mut store, &created[0].id, Some(EditScope::Single)).unwrap(),
        Outcome::Applied(1)
    );
    assert_eq!(
        delete_transaction(&mut store, &created[2].id, Some(EditScope::Future)).unwrap(),
        Outcome::Applied(2)
    );
    let left = user_transactions(&store, &user).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, created[1].id);

    assert_eq!(
        delete_transaction(&mut store, &created[1].id, Some(EditScope::All)).unwrap(),
        Outcome::Applied(1)
    );
    assert!(user_transactions(&store, &user).unwrap().is_empty());
}

#[test]
fn series_scope_stays_within_the_user() {
    let (mut store, user, cat) = setup();
    let created = create_transaction(&mut store, &rent(&user, &cat, Some(2))).unwrap();
    let other = create_user(&mut store, "Bia", "").unwrap();
    // a foreign record carrying the same series id
    let foreign = store
        .insert_record(&Transaction {
            user_id: other.id.clone(),
            ..created[0].clone()
        })
        .unwrap();

    assert_eq!(series_members(&store, &created[0]).unwrap().len(), 2);
    assert_eq!(
        delete_transaction(&mut store, &created[0].id, Some(EditScope::All)).unwrap(),
        Outcome::Applied(2)
    );
    assert!(store.find_record::<Transaction>(&foreign.id).unwrap().is_some());
}

#[test]
fn scoped_edits_behave_the_same_on_sqlite() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let user = create_user(&mut store, "Ana", "").unwrap();
    let cat = find_category(&store, &user.id, "Food").unwrap().unwrap();
    let created = create_transaction(&mut store, &rent(&user.id, &cat.id, Some(3))).unwrap();
    let patch = TransactionPatch {
        amount: Some(money(75)),
        ..Default::default()
    };
    assert_eq!(
        edit_transaction(&mut store, &created[1].id, &patch, Some(EditScope::Future)).unwrap(),
        Outcome::Applied(2)
    );
    let rows = by_date(user_transactions(&store, &user.id).unwrap());
    assert_eq!(rows[0].amount, money(100));
    assert_eq!(rows[2].amount, money(75));
}

#[test]
fn february_future_edit_leaves_january_alone() {
    let (mut store, user, cat) = setup();
    let input = TransactionInput {
        date: d(2024, 1, 15),
        ..rent(&user, &cat, Some(3))
    };
    let created = create_transaction(&mut store, &input).unwrap();
    assert_eq!(
        created.iter().map(|t| t.date).collect::<Vec<_>>(),
        vec![d(2024, 1, 15), d(2024, 2, 15), d(2024, 3, 15)]
    );
    let feb = created.iter().find(|t| t.date == d(2024, 2, 15)).unwrap();
    let patch = TransactionPatch {
        amount: Some(money(150)),
        ..Default::default()
    };
    edit_transaction(&mut store, &feb.id, &patch, Some(EditScope::Future)).unwrap();
    let amounts: Vec<_> = by_date(user_transactions(&store, &user).unwrap())
        .into_iter()
        .map(|t| t.amount)
        .collect();
    assert_eq!(amounts, vec![money(100), money(150), money(150)]);
}

#[test]
fn date_only_series_edit_fails_without_asking_for_scope() {
    let (mut store, user, cat) = setup();
    let created = create_transaction(&mut store, &rent(&user, &cat, Some(2))).unwrap();
    let patch = TransactionPatch {
        date: Some(d(2024, 6, 1)),
        ..Default::default()
    };
    assert!(matches!(
        edit_transaction(&mut store, &created[0].id, &patch, None),
        Err(LedgerError::Validation(_))
    ));
}
