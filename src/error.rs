// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised by the tracker core.
//!
//! Aggregation, budgeting and recommendations never fail on well-formed
//! input; only the input boundary, budget updates and persistence do.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::TransactionId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("Invalid budget amount {0}: use a positive amount with at most 2 decimals")]
    InvalidBudgetAmount(Decimal),
    #[error("Transaction {0} not found")]
    NotFound(TransactionId),
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl TrackerError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<rusqlite::Error> for TrackerError {
    fn from(err: rusqlite::Error) -> Self {
        Self::persistence(err)
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
