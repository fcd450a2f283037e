// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendwise::aggregate::{category_breakdown, totals};
use spendwise::budget::{progress, BudgetKey, BudgetProgress, Budgets};
use spendwise::db::{self, load_budgets, save_budget};
use spendwise::models::{Transaction, TransactionKind};
use spendwise::TrackerError;

fn expense(id: i64, category: &str, amount: i64) -> Transaction {
    Transaction {
        id,
        kind: TransactionKind::Expense,
        category: category.into(),
        amount: Decimal::from(amount),
        description: "spent".into(),
        date: NaiveDate::from_ymd_opt(2023, 10, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
    }
}

fn key(s: &str) -> BudgetKey {
    BudgetKey::parse(s).unwrap()
}

#[test]
fn overspent_category_is_clamped_to_one_hundred_percent() {
    let t = vec![expense(1, "Food", 1200)];
    let mut budgets = Budgets::new();
    budgets.set_budget(key("Food"), Decimal::from(1000)).unwrap();

    let result = progress(&budgets, &category_breakdown(&t), totals(&t).expense);
    let entry = &result.entries()[0];
    assert_eq!(entry.spent, Decimal::from(1200));
    assert_eq!(entry.limit, Decimal::from(1000));
    assert_eq!(entry.percent, Decimal::ONE_HUNDRED);
    assert!(entry.is_over());
}

#[test]
fn no_budgets_is_distinct_from_empty_entries() {
    let t = vec![expense(1, "Food", 10)];
    let result = progress(&Budgets::new(), &category_breakdown(&t), totals(&t).expense);
    assert_eq!(result, BudgetProgress::NoBudgets);
    assert!(result.entries().is_empty());
}

#[test]
fn total_budget_tracks_all_expenses() {
    let t = vec![expense(1, "Food", 300), expense(2, "Rent", 200)];
    let mut budgets = Budgets::new();
    budgets.set_budget(key("TOTAL"), Decimal::from(1000)).unwrap();
    budgets.set_budget(key("Travel"), Decimal::from(50)).unwrap();

    let result = progress(&budgets, &category_breakdown(&t), totals(&t).expense);
    let entries = result.entries();
    assert_eq!(entries[0].key, BudgetKey::Total);
    assert_eq!(entries[0].key.label(), "Total Expenses");
    assert_eq!(entries[0].spent, Decimal::from(500));
    assert_eq!(entries[0].percent, Decimal::from(50));
    assert_eq!(entries[1].spent, Decimal::ZERO);
    assert_eq!(entries[1].percent, Decimal::ZERO);
}

#[test]
fn budget_amount_must_be_positive_and_bounded() {
    let mut budgets = Budgets::new();
    let err = budgets.set_budget(key("Food"), Decimal::ZERO).unwrap_err();
    assert_eq!(err, TrackerError::InvalidBudgetAmount(Decimal::ZERO));
    assert!(budgets
        .set_budget(key("Food"), Decimal::from(-5))
        .is_err());
    assert!(budgets
        .set_budget(key("Food"), Decimal::from(10u64.pow(15) + 1))
        .is_err());
    assert!(budgets
        .set_budget(key("Food"), Decimal::new(1, 5))
        .is_err());
    assert!(budgets.is_empty());
}

#[test]
fn overwrite_keeps_first_position() {
    let mut budgets = Budgets::new();
    budgets.set_budget(key("Food"), Decimal::from(100)).unwrap();
    budgets.set_budget(key("Rent"), Decimal::from(900)).unwrap();
    budgets.set_budget(key("food"), Decimal::from(150)).unwrap();

    let order: Vec<&str> = budgets.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(order, vec!["Food", "Rent"]);
    assert_eq!(budgets.get(&key("FOOD")), Some(Decimal::from(150)));
    assert_eq!(budgets.len(), 2);
}

#[test]
fn empty_key_is_rejected() {
    assert!(matches!(
        BudgetKey::parse("   "),
        Err(TrackerError::Validation { field: "category", .. })
    ));
}

#[test]
fn stored_budgets_load_in_insertion_order() {
    let conn = db::open_in_memory().unwrap();
    save_budget(&conn, &key("Food"), Decimal::from(100)).unwrap();
    save_budget(&conn, &key("total"), Decimal::from(2000)).unwrap();
    save_budget(&conn, &key("FOOD"), Decimal::from(120)).unwrap();

    let budgets = load_budgets(&conn).unwrap();
    let order: Vec<BudgetKey> = budgets.iter().map(|b| b.key.clone()).collect();
    assert_eq!(order, vec![key("Food"), BudgetKey::Total]);
    assert_eq!(budgets.get(&key("Food")), Some(Decimal::from(120)));
}
