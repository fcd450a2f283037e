// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Totals and per-category sums over any selection of transactions.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Transaction, TransactionKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

pub fn totals<'a, I>(transactions: I) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for t in transactions {
        match t.kind {
            TransactionKind::Income => income += t.amount,
            TransactionKind::Expense => expense += t.amount,
        }
    }
    Totals {
        income,
        expense,
        balance: income - expense,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: Decimal,
}

/// Expense sums per category in first-seen order.
///
/// Categories match case-insensitively; the key keeps the casing of the
/// first transaction seen for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryBreakdown {
    entries: Vec<CategoryAmount>,
}

impl CategoryBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, category: &str, amount: Decimal) {
        match self.position(category) {
            Some(i) => self.entries[i].amount += amount,
            None => self.entries.push(CategoryAmount {
                category: category.trim().to_string(),
                amount,
            }),
        }
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.position(category).map(|i| self.entries[i].amount)
    }

    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|e| e.amount).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryAmount> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, category: &str) -> Option<usize> {
        let category = category.trim();
        self.entries
            .iter()
            .position(|e| e.category.eq_ignore_ascii_case(category))
    }
}

pub fn category_breakdown<'a, I>(transactions: I) -> CategoryBreakdown
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut breakdown = CategoryBreakdown::new();
    for t in transactions.into_iter().filter(|t| t.is_expense()) {
        breakdown.add(&t.category, t.amount);
    }
    breakdown
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub percent: Decimal,
}

/// Share of total expense per category, in breakdown order. All zero when
/// nothing was spent.
pub fn category_percentages(breakdown: &CategoryBreakdown) -> Vec<CategoryShare> {
    let total = breakdown.total();
    breakdown
        .iter()
        .map(|e| CategoryShare {
            category: e.category.clone(),
            percent: percent_of(e.amount, total),
        })
        .collect()
}

/// `100 * part / whole`, or zero when `whole` is not positive. Saturates
/// at `Decimal::MAX`.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .map_or(Decimal::MAX, |ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub year: i32,
    pub month: u32,
    pub totals: Totals,
}

impl MonthlyTotals {
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// Income/expense per calendar month that has transactions, newest first.
pub fn monthly_totals(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
    let mut by_month: BTreeMap<(i32, u32), Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        let d = t.date.date();
        by_month.entry((d.year(), d.month())).or_default().push(t);
    }
    by_month
        .into_iter()
        .rev()
        .map(|((year, month), items)| MonthlyTotals {
            year,
            month,
            totals: totals(items),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStats {
    pub transaction_count: usize,
    pub total_expense: Decimal,
    pub first_transaction: Option<NaiveDate>,
    /// Whole 30-day months since the first transaction.
    pub age_months: i64,
}

pub fn activity_stats(transactions: &[Transaction], today: NaiveDate) -> ActivityStats {
    let first_transaction = transactions.iter().map(|t| t.date.date()).min();
    let age_months = first_transaction
        .map(|first| (today - first).num_days().max(0) / 30)
        .unwrap_or(0);
    ActivityStats {
        transaction_count: transactions.len(),
        total_expense: totals(transactions).expense,
        first_transaction,
        age_months,
    }
}
