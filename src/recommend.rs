// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rule-based spending advice.
//!
//! Every rule is evaluated; all matches are reported in rule order. When
//! nothing matches a single "healthy" message is returned, so the output is
//! never empty.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aggregate::{percent_of, CategoryBreakdown};

pub const HEALTHY_MESSAGE: &str =
    "Your spending looks healthy! Keep up the good work with your financial management.";

/// Absolute spending limit for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryThreshold {
    pub category: String,
    pub limit: Decimal,
}

impl CategoryThreshold {
    pub fn new(category: &str, limit: i64) -> Self {
        Self {
            category: category.to_string(),
            limit: Decimal::from(limit),
        }
    }

    fn message(&self) -> String {
        let canned = match self.category.to_ascii_lowercase().as_str() {
            "food" => Some(
                "Your food expenses are high. Consider meal planning or cooking at home more often to save money.",
            ),
            "shopping" => Some(
                "Your shopping expenses are relatively high. Try creating a shopping list to avoid impulse purchases.",
            ),
            "entertainment" => Some(
                "Entertainment expenses are on the higher side. Look for free or low-cost entertainment options.",
            ),
            "transportation" => Some(
                "Your transportation costs are high. Consider carpooling or using public transportation.",
            ),
            "utilities" => Some(
                "Your utility expenses are notable. Look for energy-saving options or reduce usage where possible.",
            ),
            _ => None,
        };
        match canned {
            Some(m) => m.to_string(),
            None => format!(
                "Your {} expenses are above {}. Review them for possible savings.",
                self.category,
                self.limit.round_dp(2)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRules {
    /// A category whose share of expenses exceeds this percentage is flagged.
    pub share_threshold: Decimal,
    pub thresholds: Vec<CategoryThreshold>,
}

impl Default for RecommendationRules {
    fn default() -> Self {
        Self {
            share_threshold: Decimal::from(20),
            thresholds: vec![
                CategoryThreshold::new("Food", 400),
                CategoryThreshold::new("Shopping", 250),
                CategoryThreshold::new("Entertainment", 100),
            ],
        }
    }
}

impl RecommendationRules {
    /// Larger limits for a whole-ledger view, with transport and utilities.
    pub fn tracker_preset() -> Self {
        Self {
            share_threshold: Decimal::from(20),
            thresholds: vec![
                CategoryThreshold::new("Food", 5000),
                CategoryThreshold::new("Shopping", 3000),
                CategoryThreshold::new("Entertainment", 2000),
                CategoryThreshold::new("Transportation", 4000),
                CategoryThreshold::new("Utilities", 3000),
            ],
        }
    }

    /// Adds or replaces the limit for `category`.
    pub fn set_threshold(&mut self, category: &str, limit: Decimal) {
        match self
            .thresholds
            .iter_mut()
            .find(|t| t.category.eq_ignore_ascii_case(category))
        {
            Some(t) => t.limit = limit,
            None => self.thresholds.push(CategoryThreshold {
                category: category.to_string(),
                limit,
            }),
        }
    }

    pub fn remove_threshold(&mut self, category: &str) -> bool {
        let before = self.thresholds.len();
        self.thresholds
            .retain(|t| !t.category.eq_ignore_ascii_case(category));
        self.thresholds.len() != before
    }
}

pub fn recommend(
    breakdown: &CategoryBreakdown,
    total_expense: Decimal,
    rules: &RecommendationRules,
) -> Vec<String> {
    let mut out = Vec::new();

    for entry in breakdown.iter() {
        let share = percent_of(entry.amount, total_expense);
        if share > rules.share_threshold {
            let rounded = share.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            out.push(format!(
                "You're spending a lot on {} ({}% of total). Consider reducing this to save money.",
                entry.category, rounded
            ));
        }
    }

    for threshold in &rules.thresholds {
        let spent = breakdown.get(&threshold.category).unwrap_or(Decimal::ZERO);
        if spent > threshold.limit {
            out.push(threshold.message());
        }
    }

    if out.is_empty() {
        out.push(HEALTHY_MESSAGE.to_string());
    }
    out
}
