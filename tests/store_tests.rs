// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Timelike};
use rust_decimal::Decimal;
use spendwise::db::{self, SqlitePersistence};
use spendwise::models::{NewTransaction, Transaction, TransactionKind};
use spendwise::store::{MemoryPersistence, TransactionStore};
use spendwise::TrackerError;

fn when(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn expense(amount: &str, category: &str) -> NewTransaction {
    NewTransaction::validate(
        TransactionKind::Expense,
        amount,
        "groceries",
        Some(category),
        when(2023, 10, 2),
    )
    .unwrap()
}

#[test]
fn add_assigns_increasing_ids_in_insertion_order() {
    let mut store = TransactionStore::init(MemoryPersistence::new());
    let a = store.add(expense("10", "Food")).unwrap();
    let b = store.add(expense("20", "Shopping")).unwrap();
    assert!(b > a);
    let ids: Vec<i64> = store.all().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn remove_deletes_only_that_id() {
    let mut store = TransactionStore::init(MemoryPersistence::new());
    let a = store.add(expense("10", "Food")).unwrap();
    let b = store.add(expense("20", "Food")).unwrap();
    assert!(store.remove(a).unwrap());
    assert!(store.all().iter().all(|t| t.id != a));
    assert!(store.get(b).is_some());
}

#[test]
fn remove_unknown_id_is_false_and_leaves_store_unchanged() {
    let mut store = TransactionStore::init(MemoryPersistence::new());
    store.add(expense("10", "Food")).unwrap();
    let before = store.all().to_vec();
    assert!(!store.remove(999).unwrap());
    assert_eq!(store.all(), before.as_slice());
}

#[test]
fn failed_save_rolls_back_the_mutation() {
    let mut store = TransactionStore::init(MemoryPersistence::new());
    let id = store.add(expense("10", "Food")).unwrap();
    let mut persistence = store.teardown();
    persistence.set_fail_save(true);

    let mut store = TransactionStore::init(persistence);
    let err = store.add(expense("20", "Food")).unwrap_err();
    assert!(matches!(err, TrackerError::Persistence(_)));
    assert_eq!(store.len(), 1);

    assert!(store.remove(id).is_err());
    assert!(store.get(id).is_some());

    assert!(store.clear().is_err());
    assert_eq!(store.len(), 1);
}

#[test]
fn failed_load_starts_empty() {
    let t = Transaction {
        id: 1,
        kind: TransactionKind::Income,
        category: "Income".into(),
        amount: Decimal::from(100),
        description: "salary".into(),
        date: when(2023, 10, 1),
    };
    let store = TransactionStore::init(MemoryPersistence::with_transactions(vec![t]).failing_load());
    assert!(store.is_empty());
    assert!(store.load_failed());
    assert!(!TransactionStore::init(MemoryPersistence::new()).load_failed());
}

#[test]
fn ids_continue_after_loaded_transactions() {
    let t = Transaction {
        id: 41,
        kind: TransactionKind::Income,
        category: "Income".into(),
        amount: Decimal::from(100),
        description: "salary".into(),
        date: when(2023, 10, 1),
    };
    let mut store = TransactionStore::init(MemoryPersistence::with_transactions(vec![t]));
    assert_eq!(store.add(expense("5", "Food")).unwrap(), 42);
}

#[test]
fn recent_is_newest_first() {
    let mut store = TransactionStore::init(MemoryPersistence::new());
    let ids: Vec<i64> = (1..=7)
        .map(|i| store.add(expense(&i.to_string(), "Food")).unwrap())
        .collect();
    let recent: Vec<i64> = store.recent(5).iter().map(|t| t.id).collect();
    assert_eq!(recent, vec![ids[6], ids[5], ids[4], ids[3], ids[2]]);
}

#[test]
fn clear_empties_store_and_persistence() {
    let mut store = TransactionStore::init(MemoryPersistence::new());
    store.add(expense("10", "Food")).unwrap();
    store.clear().unwrap();
    assert!(store.is_empty());
    assert!(store.teardown().saved().is_empty());
}

#[test]
fn sqlite_log_survives_reopen() {
    let conn = db::open_in_memory().unwrap();
    let mut store = TransactionStore::init(SqlitePersistence::new(&conn));
    store
        .add(
            NewTransaction::validate(
                TransactionKind::Income,
                "5000",
                "salary",
                None,
                when(2023, 10, 1),
            )
            .unwrap(),
        )
        .unwrap();
    store.add(expense("12.34", "Food")).unwrap();
    let saved = store.all().to_vec();
    drop(store);

    let reopened = TransactionStore::init(SqlitePersistence::new(&conn));
    assert_eq!(reopened.all(), saved.as_slice());
    assert_eq!(reopened.all()[1].amount, Decimal::new(1234, 2));
}

#[test]
fn load_picks_up_changes_saved_elsewhere() {
    let conn = db::open_in_memory().unwrap();
    let mut writer = TransactionStore::init(SqlitePersistence::new(&conn));
    let mut reader = TransactionStore::init(SqlitePersistence::new(&conn));
    writer.add(expense("15", "Food")).unwrap();
    assert!(reader.is_empty());

    reader.load();
    assert_eq!(reader.len(), 1);
    let id = reader.add(expense("5", "Food")).unwrap();
    assert_eq!(id, 2);
}

#[test]
fn reloaded_transaction_equals_the_added_one() {
    let conn = db::open_in_memory().unwrap();
    let mut store = TransactionStore::init(SqlitePersistence::new(&conn));
    let with_nanos = when(2024, 3, 9)
        .with_nanosecond(123_456_789)
        .unwrap();
    let new = NewTransaction::validate(
        TransactionKind::Expense,
        "9.99",
        "coffee",
        Some("Food"),
        with_nanos,
    )
    .unwrap();
    let id = store.add(new).unwrap();
    let added = store.get(id).unwrap().clone();
    assert_eq!(added.date.nanosecond(), 0);

    let reopened = TransactionStore::init(SqlitePersistence::new(&conn));
    assert_eq!(reopened.get(id), Some(&added));
}
