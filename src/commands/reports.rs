// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{
    activity_stats, category_breakdown, category_percentages, monthly_totals, totals,
};
use crate::commands::budgets::print_progress;
use crate::db::{load_budgets, SqlitePersistence};
use crate::period::{trailing_periods, Granularity, ReportPeriod};
use crate::recommend::recommend;
use crate::report::{Report, ReportBuilder, LINE_ITEM_COLUMNS};
use crate::settings::{parse_trend_window, ReportSettings};
use crate::store::TransactionStore;
use crate::utils::{fmt_money, maybe_print_json, parse_date, period_from_args, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("generate", sub)) => generate(conn, sub)?,
        Some(("breakdown", sub)) => breakdown(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("advise", sub)) => advise(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Trend anchor from `--anchor`, falling back to the last day of `period`.
pub fn anchor_for(sub: &clap::ArgMatches, period: Option<ReportPeriod>) -> Result<NaiveDate> {
    if let Some(a) = sub.get_one::<String>("anchor") {
        return parse_date(a);
    }
    Ok(match period {
        Some(p) => p.end(),
        None => chrono::Local::now().date_naive(),
    })
}

/// Builds the report for the period named in `sub` from the stored data.
pub fn build_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<Report> {
    let period = period_from_args(sub)?;
    let settings = ReportSettings::load(conn)?;
    let budgets = load_budgets(conn)?;
    let store = TransactionStore::init(SqlitePersistence::new(conn));
    let builder = ReportBuilder::new(settings.options).anchored_at(anchor_for(sub, Some(period))?);
    Ok(builder.build(store.all(), period, &budgets))
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let ccy = ReportSettings::load(conn)?.currency;
    let store = TransactionStore::init(SqlitePersistence::new(conn));
    let sums = totals(store.all());
    let stats = activity_stats(store.all(), chrono::Local::now().date_naive());
    let value = json!({ "totals": &sums, "activity": &stats });
    if maybe_print_json(json_flag, jsonl_flag, &value)? {
        return Ok(());
    }
    let first = stats
        .first_transaction
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".into());
    println!(
        "{}",
        pretty_table(
            &["Metric", "Value"],
            vec![
                vec!["Total income".into(), fmt_money(&sums.income, &ccy)],
                vec!["Total expenses".into(), fmt_money(&sums.expense, &ccy)],
                vec!["Balance".into(), fmt_money(&sums.balance, &ccy)],
                vec!["Transactions".into(), stats.transaction_count.to_string()],
                vec!["First transaction".into(), first],
                vec!["Active months".into(), stats.age_months.to_string()],
            ],
        )
    );
    Ok(())
}

fn generate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let report = build_report(conn, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }
    let ccy = ReportSettings::load(conn)?.currency;

    println!("{}", report.period.label);
    println!(
        "{}",
        pretty_table(
            &["Total Income", "Total Expenses", "Balance"],
            vec![vec![
                fmt_money(&report.total_income, &ccy),
                fmt_money(&report.total_expense, &ccy),
                fmt_money(&report.balance, &ccy),
            ]],
        )
    );
    let rows = report
        .line_items
        .iter()
        .map(|l| l.to_row().to_vec())
        .collect();
    println!("{}", pretty_table(&LINE_ITEM_COLUMNS, rows));

    let shares = report
        .breakdown
        .iter()
        .zip(report.percentages.iter())
        .map(|(b, p)| {
            vec![
                b.category.clone(),
                fmt_money(&b.amount, &ccy),
                format!("{:.1}%", p.percent),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share"], shares));

    let trend = report
        .trend
        .iter()
        .map(|p| vec![p.label.clone(), fmt_money(&p.amount, &ccy)])
        .collect();
    println!("{}", pretty_table(&["Period", "Expenses"], trend));

    print_progress(&report.budget_progress, &ccy);
    println!("Suggestions:");
    for s in &report.suggestions {
        println!("  - {}", s);
    }
    Ok(())
}

fn breakdown(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period = period_from_args(sub)?;
    let ccy = ReportSettings::load(conn)?.currency;
    let store = TransactionStore::init(SqlitePersistence::new(conn));
    let selected = period.select(store.all());
    let breakdown = category_breakdown(selected.iter().copied());
    let shares = category_percentages(&breakdown);
    let data: Vec<Vec<String>> = breakdown
        .iter()
        .zip(shares.iter())
        .map(|(b, s)| {
            vec![
                b.category.clone(),
                format!("{:.2}", b.amount),
                format!("{:.1}", s.percent),
            ]
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let spent = format!("Spent ({})", ccy);
        println!("{}", pretty_table(&["Category", spent.as_str(), "Share %"], data));
    }
    Ok(())
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let settings = ReportSettings::load(conn)?;
    let count = match sub.get_one::<String>("periods") {
        Some(p) => parse_trend_window(p)?,
        None => settings.options.trend_window,
    };
    let granularity = if sub.get_flag("yearly") {
        Granularity::Year
    } else {
        Granularity::Month
    };
    let anchor = anchor_for(sub, None)?;
    let store = TransactionStore::init(SqlitePersistence::new(conn));
    let points = trailing_periods(store.all(), anchor, count, granularity);
    if !maybe_print_json(json_flag, jsonl_flag, &points)? {
        let data = points
            .iter()
            .map(|p| vec![p.label.clone(), fmt_money(&p.amount, &settings.currency)])
            .collect();
        println!("{}", pretty_table(&["Period", "Expenses"], data));
    }
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let store = TransactionStore::init(SqlitePersistence::new(conn));
    let mut data = Vec::new();
    for m in monthly_totals(store.all()).into_iter().take(months) {
        data.push(vec![
            m.label(),
            format!("{:.2}", m.totals.income),
            format!("{:.2}", m.totals.expense),
            format!("{:.2}", m.totals.balance),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Balance"], data)
        );
    }
    Ok(())
}

fn advise(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = ReportSettings::load(conn)?;
    let store = TransactionStore::init(SqlitePersistence::new(conn));
    let selected = if sub.contains_id("month") || sub.contains_id("year") {
        period_from_args(sub)?.select(store.all())
    } else {
        store.all().iter().collect()
    };
    let breakdown = category_breakdown(selected.iter().copied());
    let spent = breakdown.total();
    for s in recommend(&breakdown, spent, &settings.options.rules) {
        println!("- {}", s);
    }
    Ok(())
}
