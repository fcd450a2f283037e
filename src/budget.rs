// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{percent_of, CategoryBreakdown};
use crate::error::{TrackerError, TrackerResult};
use crate::models::MAX_AMOUNT;

/// Key that stands for the whole-expense ceiling.
pub const TOTAL_KEY: &str = "total";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "category", rename_all = "lowercase")]
pub enum BudgetKey {
    Total,
    Category(String),
}

impl BudgetKey {
    /// `total` (any casing) is the overall ceiling, anything else a category.
    pub fn parse(raw: &str) -> TrackerResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TrackerError::validation(
                "category",
                "a budget needs a category or 'total'",
            ));
        }
        if raw.eq_ignore_ascii_case(TOTAL_KEY) {
            Ok(BudgetKey::Total)
        } else {
            Ok(BudgetKey::Category(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BudgetKey::Total => TOTAL_KEY,
            BudgetKey::Category(c) => c,
        }
    }

    /// Display name: `Total Expenses` for the overall ceiling.
    pub fn label(&self) -> &str {
        match self {
            BudgetKey::Total => "Total Expenses",
            BudgetKey::Category(c) => c,
        }
    }

    fn same_as(&self, other: &BudgetKey) -> bool {
        match (self, other) {
            (BudgetKey::Total, BudgetKey::Total) => true,
            (BudgetKey::Category(a), BudgetKey::Category(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }
}

impl fmt::Display for BudgetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub key: BudgetKey,
    pub limit: Decimal,
}

/// Spending ceilings in the order they were first set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budgets {
    entries: Vec<Budget>,
}

impl Budgets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or overwrites the ceiling for `key`. An overwritten budget keeps
    /// its original position.
    pub fn set_budget(&mut self, key: BudgetKey, amount: Decimal) -> TrackerResult<()> {
        if amount <= Decimal::ZERO || amount > MAX_AMOUNT || amount.normalize().scale() > 2 {
            return Err(TrackerError::InvalidBudgetAmount(amount));
        }
        match self.entries.iter_mut().find(|b| b.key.same_as(&key)) {
            Some(existing) => existing.limit = amount,
            None => self.entries.push(Budget { key, limit: amount }),
        }
        Ok(())
    }

    pub fn get(&self, key: &BudgetKey) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|b| b.key.same_as(key))
            .map(|b| b.limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Budget> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetProgressEntry {
    pub key: BudgetKey,
    pub spent: Decimal,
    pub limit: Decimal,
    /// Share of the limit used, clamped to 100.
    pub percent: Decimal,
}

impl BudgetProgressEntry {
    pub fn is_over(&self) -> bool {
        self.spent > self.limit
    }
}

/// Budget comparison result. `NoBudgets` tells renderers to show a
/// placeholder instead of an empty panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "entries", rename_all = "snake_case")]
pub enum BudgetProgress {
    NoBudgets,
    Entries(Vec<BudgetProgressEntry>),
}

impl BudgetProgress {
    pub fn entries(&self) -> &[BudgetProgressEntry] {
        match self {
            BudgetProgress::NoBudgets => &[],
            BudgetProgress::Entries(e) => e,
        }
    }
}

pub fn progress(
    budgets: &Budgets,
    breakdown: &CategoryBreakdown,
    total_expense: Decimal,
) -> BudgetProgress {
    if budgets.is_empty() {
        return BudgetProgress::NoBudgets;
    }
    let entries = budgets
        .iter()
        .map(|b| {
            let spent = match &b.key {
                BudgetKey::Total => total_expense,
                BudgetKey::Category(c) => breakdown.get(c).unwrap_or(Decimal::ZERO),
            };
            BudgetProgressEntry {
                key: b.key.clone(),
                spent,
                limit: b.limit,
                percent: percent_of(spent, b.limit).min(Decimal::ONE_HUNDRED),
            }
        })
        .collect();
    BudgetProgress::Entries(entries)
}
