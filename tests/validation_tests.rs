// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendwise::models::{NewTransaction, TransactionKind, INCOME_CATEGORY, MAX_AMOUNT};
use spendwise::store::{MemoryPersistence, TransactionStore};
use spendwise::TrackerError;

fn now() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn field_of(err: TrackerError) -> &'static str {
    match err {
        TrackerError::Validation { field, .. } => field,
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn rejects_bad_amounts() {
    for raw in ["", "  ", "abc", "0", "-5", "0.00", "12.345"] {
        let err = NewTransaction::validate(
            TransactionKind::Expense,
            raw,
            "lunch",
            Some("Food"),
            now(),
        )
        .unwrap_err();
        assert_eq!(field_of(err), "amount", "amount {:?}", raw);
    }
}

#[test]
fn accepts_two_decimal_places() {
    let t = NewTransaction::validate(TransactionKind::Expense, " 12.50 ", "lunch", Some("Food"), now())
        .unwrap();
    assert_eq!(t.amount(), Decimal::new(125, 1));
}

#[test]
fn rejects_empty_description() {
    let err = NewTransaction::validate(TransactionKind::Income, "10", "   ", None, now())
        .unwrap_err();
    assert_eq!(field_of(err), "description");
}

#[test]
fn expense_requires_category() {
    for category in [None, Some(""), Some("  ")] {
        let err = NewTransaction::validate(TransactionKind::Expense, "10", "lunch", category, now())
            .unwrap_err();
        assert_eq!(field_of(err), "category");
    }
}

#[test]
fn income_category_is_fixed() {
    let new = NewTransaction::validate(TransactionKind::Income, "10", "gift", Some("Food"), now())
        .unwrap();
    let mut store = TransactionStore::init(MemoryPersistence::new());
    let id = store.add(new).unwrap();
    assert_eq!(store.get(id).unwrap().category, INCOME_CATEGORY);
}

#[test]
fn kind_parses_case_insensitively() {
    assert_eq!("Income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
    assert_eq!(" EXPENSE ".parse::<TransactionKind>().unwrap(), TransactionKind::Expense);
    assert!("transfer".parse::<TransactionKind>().is_err());
}

#[test]
fn amounts_are_capped() {
    assert_eq!(MAX_AMOUNT, Decimal::from(10u64.pow(15)));
    for raw in ["50000000000000000000000000000", "1000000000000000.01", "1000000000000001"] {
        let err = NewTransaction::validate(TransactionKind::Expense, raw, "yacht", Some("Fun"), now())
            .unwrap_err();
        assert_eq!(field_of(err), "amount", "amount {:?}", raw);
    }
    let max = NewTransaction::validate(TransactionKind::Income, "1000000000000000", "bonus", None, now())
        .unwrap();
    assert_eq!(max.amount(), MAX_AMOUNT);
}
