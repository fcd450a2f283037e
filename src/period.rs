// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar periods: month/year selection and trailing trend buckets.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};
use crate::models::Transaction;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Month,
    Year,
}

/// The calendar period a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportPeriod {
    Monthly { year: i32, month: u32 },
    Yearly { year: i32 },
}

impl ReportPeriod {
    pub fn month(year: i32, month: u32) -> TrackerResult<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(TrackerError::validation(
                "month",
                format!("{}-{:02} is not a calendar month", year, month),
            ));
        }
        Ok(ReportPeriod::Monthly { year, month })
    }

    pub fn year(year: i32) -> TrackerResult<Self> {
        if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
            return Err(TrackerError::validation(
                "year",
                format!("{} is out of range", year),
            ));
        }
        Ok(ReportPeriod::Yearly { year })
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            ReportPeriod::Monthly { .. } => Granularity::Month,
            ReportPeriod::Yearly { .. } => Granularity::Year,
        }
    }

    /// `Monthly Report - October 2023` or `Yearly Report - 2023`.
    pub fn title(&self) -> String {
        match *self {
            ReportPeriod::Monthly { year, month } => {
                format!("Monthly Report - {} {}", month_name(month), year)
            }
            ReportPeriod::Yearly { year } => format!("Yearly Report - {}", year),
        }
    }

    /// First calendar day of the period.
    pub fn start(&self) -> NaiveDate {
        let (year, month) = match *self {
            ReportPeriod::Monthly { year, month } => (year, month),
            ReportPeriod::Yearly { year } => (year, 1),
        };
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the period, inclusive.
    pub fn end(&self) -> NaiveDate {
        match *self {
            ReportPeriod::Monthly { year, month } => month_end(year, month),
            ReportPeriod::Yearly { year } => {
                NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX)
            }
        }
    }

    pub fn select<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        match *self {
            ReportPeriod::Monthly { year, month } => select_by_month(transactions, year, month),
            ReportPeriod::Yearly { year } => select_by_year(transactions, year),
        }
    }
}

/// Transactions dated within `[first, last]` day of the month, time of day ignored.
pub fn select_by_month(transactions: &[Transaction], year: i32, month: u32) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|t| {
            let d = t.date.date();
            d.year() == year && d.month() == month
        })
        .collect()
}

pub fn select_by_year(transactions: &[Transaction], year: i32) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|t| t.date.date().year() == year)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub amount: Decimal,
}

/// Expense totals for the `count` periods ending with the one containing
/// `anchor`, oldest first. Empty periods are reported as zero.
pub fn trailing_periods(
    transactions: &[Transaction],
    anchor: NaiveDate,
    count: usize,
    granularity: Granularity,
) -> Vec<TrendPoint> {
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    let buckets: Vec<(i64, Option<u32>)> = match granularity {
        Granularity::Month => {
            let anchor_index = month_index(anchor.year(), anchor.month());
            (0..count)
                .rev()
                .map(|back| {
                    let idx = anchor_index - back;
                    (idx.div_euclid(12), Some(idx.rem_euclid(12) as u32 + 1))
                })
                .collect()
        }
        Granularity::Year => (0..count)
            .rev()
            .map(|back| (i64::from(anchor.year()) - back, None))
            .collect(),
    };

    buckets
        .into_iter()
        .map(|(year, month)| {
            let amount = transactions
                .iter()
                .filter(|t| t.is_expense())
                .filter(|t| {
                    let d = t.date.date();
                    i64::from(d.year()) == year && month.is_none_or(|m| d.month() == m)
                })
                .map(|t| t.amount)
                .sum();
            let label = match month {
                Some(m) => format!("{} {}", &month_name(m)[..3], year),
                None => year.to_string(),
            };
            TrendPoint { label, amount }
        })
        .collect()
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown")
}

pub fn month_end(year: i32, month: u32) -> NaiveDate {
    let last_day = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 1,
    };
    NaiveDate::from_ymd_opt(year, month, last_day).unwrap_or(NaiveDate::MAX)
}

fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}
