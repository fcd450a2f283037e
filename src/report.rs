// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period reports: one immutable value combining totals, line items,
//! category breakdown, trend, budget progress and suggestions.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{category_breakdown, category_percentages, totals, CategoryBreakdown, CategoryShare};
use crate::budget::{progress, BudgetProgress, Budgets};
use crate::models::{Transaction, TransactionId, TransactionKind};
use crate::period::{trailing_periods, ReportPeriod, TrendPoint};
use crate::recommend::{recommend, RecommendationRules};

pub const DEFAULT_TREND_WINDOW: usize = 6;

/// Column headers of the flattened line-item table, in export order.
pub const LINE_ITEM_COLUMNS: [&str; 4] = ["Date", "Type", "Category", "Amount"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub trend_window: usize,
    pub rules: RecommendationRules,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            trend_window: DEFAULT_TREND_WINDOW,
            rules: RecommendationRules::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodInfo {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub period: ReportPeriod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: TransactionId,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    /// Negative for expenses.
    pub amount: Decimal,
}

impl LineItem {
    fn from_transaction(t: &Transaction) -> Self {
        Self {
            id: t.id,
            date: t.date.date(),
            kind: t.kind,
            category: t.category.clone(),
            description: t.description.clone(),
            amount: t.signed_amount(),
        }
    }

    /// The row as exported: date, type, category, signed amount.
    pub fn to_row(&self) -> [String; 4] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.kind.label().to_string(),
            self.category.clone(),
            fmt_signed(self.amount),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub period: PeriodInfo,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub line_items: Vec<LineItem>,
    pub breakdown: CategoryBreakdown,
    pub percentages: Vec<CategoryShare>,
    pub trend: Vec<TrendPoint>,
    pub budget_progress: BudgetProgress,
    pub suggestions: Vec<String>,
}

/// Builds reports from a read-only snapshot of the store.
///
/// The trend window ends at the period holding the anchor date, which is
/// today unless set with [`ReportBuilder::anchored_at`].
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    options: ReportOptions,
    anchor: Option<NaiveDate>,
}

impl ReportBuilder {
    pub fn new(options: ReportOptions) -> Self {
        Self {
            options,
            anchor: None,
        }
    }

    pub fn anchored_at(mut self, anchor: NaiveDate) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn build(
        &self,
        transactions: &[Transaction],
        period: ReportPeriod,
        budgets: &Budgets,
    ) -> Report {
        let selected = period.select(transactions);
        let sums = totals(selected.iter().copied());
        let breakdown = category_breakdown(selected.iter().copied());
        let percentages = category_percentages(&breakdown);
        let anchor = self.anchor.unwrap_or_else(|| Local::now().date_naive());
        let trend = trailing_periods(
            transactions,
            anchor,
            self.options.trend_window,
            period.granularity(),
        );
        let budget_progress = progress(budgets, &breakdown, sums.expense);
        let suggestions = recommend(&breakdown, sums.expense, &self.options.rules);
        log::debug!(
            "built '{}' from {} of {} transactions",
            period.title(),
            selected.len(),
            transactions.len()
        );

        Report {
            period: PeriodInfo {
                label: period.title(),
                start: period.start(),
                end: period.end(),
                period,
            },
            total_income: sums.income,
            total_expense: sums.expense,
            balance: sums.balance,
            line_items: selected.into_iter().map(LineItem::from_transaction).collect(),
            breakdown,
            percentages,
            trend,
            budget_progress,
            suggestions,
        }
    }
}

/// `+5000.00` / `-1200.00`.
pub fn fmt_signed(amount: Decimal) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        '-'
    } else {
        '+'
    };
    format!("{}{:.2}", sign, amount.abs())
}
