// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report configuration stored in the `settings` table.
//!
//! Keys: `currency`, `trend_window`, `share_threshold`, `preset`
//! (`default` or `tracker`) and `threshold.<Category>`. A threshold value of
//! `off` removes that category's limit from the preset.

use anyhow::{anyhow, bail, Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::recommend::RecommendationRules;
use crate::report::{ReportOptions, DEFAULT_TREND_WINDOW};
use crate::utils::{get_setting, list_settings, parse_decimal};

pub const DEFAULT_CURRENCY: &str = "INR";
pub const THRESHOLD_PREFIX: &str = "threshold.";

pub const MAX_TREND_WINDOW: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub currency: String,
    pub options: ReportOptions,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            options: ReportOptions::default(),
        }
    }
}

impl ReportSettings {
    pub fn load(conn: &Connection) -> Result<Self> {
        let currency = get_setting(conn, "currency")?.unwrap_or_else(|| DEFAULT_CURRENCY.into());
        let trend_window = match get_setting(conn, "trend_window")? {
            Some(v) => parse_trend_window(&v)?,
            None => DEFAULT_TREND_WINDOW,
        };
        let mut rules = match get_setting(conn, "preset")? {
            Some(p) => preset(&p)?,
            None => RecommendationRules::default(),
        };
        if let Some(v) = get_setting(conn, "share_threshold")? {
            rules.share_threshold = parse_non_negative(&v)?;
        }
        for (key, value) in list_settings(conn)? {
            let Some(category) = key.strip_prefix(THRESHOLD_PREFIX) else {
                continue;
            };
            if value.trim().eq_ignore_ascii_case("off") {
                rules.remove_threshold(category);
            } else {
                let limit = parse_non_negative(&value)
                    .with_context(|| format!("Invalid threshold for {}", category))?;
                rules.set_threshold(category, limit);
            }
        }
        Ok(Self {
            currency,
            options: ReportOptions {
                trend_window,
                rules,
            },
        })
    }
}

/// Checks a key/value pair before it is written, returning the value to store.
pub fn validate_setting(key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    match key {
        "currency" => {
            if value.is_empty() {
                bail!("currency cannot be empty");
            }
            Ok(value.to_uppercase())
        }
        "trend_window" => Ok(parse_trend_window(value)?.to_string()),
        "share_threshold" => Ok(parse_non_negative(value)?.to_string()),
        "preset" => {
            preset(value)?;
            Ok(value.to_ascii_lowercase())
        }
        k if k.starts_with(THRESHOLD_PREFIX) => {
            if k.len() == THRESHOLD_PREFIX.len() {
                bail!("threshold key needs a category, e.g. threshold.Food");
            }
            if value.eq_ignore_ascii_case("off") {
                Ok("off".into())
            } else {
                Ok(parse_non_negative(value)?.to_string())
            }
        }
        other => Err(anyhow!("Unknown setting '{}'", other)),
    }
}

pub fn preset(name: &str) -> Result<RecommendationRules> {
    match name.trim().to_ascii_lowercase().as_str() {
        "default" => Ok(RecommendationRules::default()),
        "tracker" => Ok(RecommendationRules::tracker_preset()),
        other => Err(anyhow!("Unknown preset '{}' (use default|tracker)", other)),
    }
}

/// A trend length between 1 and [`MAX_TREND_WINDOW`].
pub fn parse_trend_window(s: &str) -> Result<usize> {
    let n: usize = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid trend window '{}'", s))?;
    if n == 0 || n > MAX_TREND_WINDOW {
        bail!("trend window must be between 1 and {}", MAX_TREND_WINDOW);
    }
    Ok(n)
}

fn parse_non_negative(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d.is_sign_negative() {
        bail!("'{}' must not be negative", s);
    }
    Ok(d)
}
