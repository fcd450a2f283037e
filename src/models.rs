// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, SubsecRound};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};

pub type TransactionId = i64;

/// Category recorded for every income transaction.
pub const INCOME_CATEGORY: &str = "Income";

/// Largest accepted amount for a single transaction or budget (10^15).
///
/// Keeps sums over any realistic ledger far inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        })
    }
}

impl FromStr for TransactionKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(TrackerError::validation(
                "type",
                format!("'{}' is neither income nor expense", other),
            )),
        }
    }
}

/// A recorded money movement. Never mutated after it enters the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDateTime,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount with the sign used in report tables: expenses are negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// User input that passed the boundary checks and may be handed to the store.
///
/// The only way to obtain one is [`NewTransaction::validate`], so the store
/// never has to re-check amounts, descriptions or categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    kind: TransactionKind,
    category: String,
    amount: Decimal,
    description: String,
    date: NaiveDateTime,
}

impl NewTransaction {
    pub fn validate(
        kind: TransactionKind,
        amount: &str,
        description: &str,
        category: Option<&str>,
        date: NaiveDateTime,
    ) -> TrackerResult<Self> {
        let amount = parse_amount(amount)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(TrackerError::validation(
                "description",
                "a description is required",
            ));
        }
        let category = match kind {
            TransactionKind::Income => INCOME_CATEGORY.to_string(),
            TransactionKind::Expense => {
                let c = category.map(str::trim).unwrap_or_default();
                if c.is_empty() {
                    return Err(TrackerError::validation(
                        "category",
                        "expenses need a category",
                    ));
                }
                c.to_string()
            }
        };
        Ok(Self {
            kind,
            category,
            amount,
            description: description.to_string(),
            // stored with whole-second precision
            date: date.trunc_subsecs(0),
        })
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub(crate) fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            description: self.description,
            date: self.date,
        }
    }
}

fn parse_amount(raw: &str) -> TrackerResult<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TrackerError::validation("amount", "an amount is required"));
    }
    let amount = raw
        .parse::<Decimal>()
        .map_err(|_| TrackerError::validation("amount", format!("'{}' is not a number", raw)))?;
    if amount <= Decimal::ZERO {
        return Err(TrackerError::validation(
            "amount",
            format!("{} must be greater than zero", amount),
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(TrackerError::validation(
            "amount",
            format!("{} exceeds the maximum of {}", raw, MAX_AMOUNT),
        ));
    }
    let amount = amount.normalize();
    if amount.scale() > 2 {
        return Err(TrackerError::validation(
            "amount",
            format!("{} has more than 2 decimal places", raw),
        ));
    }
    Ok(amount)
}
