// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{category_breakdown, totals};
use crate::budget::{progress, BudgetKey, BudgetProgress};
use crate::db::{load_budgets, save_budget, SqlitePersistence};
use crate::settings::ReportSettings;
use crate::store::TransactionStore;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, period_from_args, pretty_table, required};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = BudgetKey::parse(required(sub, "category")?)?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    let mut budgets = load_budgets(conn)?;
    budgets.set_budget(key.clone(), amount)?;
    save_budget(conn, &key, amount)?;
    let ccy = ReportSettings::load(conn)?.currency;
    println!("Budget of {} set for {}", fmt_money(&amount, &ccy), key.label());
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let budgets = load_budgets(conn)?;
    let data: Vec<Vec<String>> = budgets
        .iter()
        .map(|b| vec![b.key.label().to_string(), format!("{:.2}", b.limit)])
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Category", "Budget"], data));
    }
    Ok(())
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period = period_from_args(sub)?;
    let store = TransactionStore::init(SqlitePersistence::new(conn));
    let selected = period.select(store.all());
    let breakdown = category_breakdown(selected.iter().copied());
    let spent = totals(selected.iter().copied()).expense;
    let result = progress(&load_budgets(conn)?, &breakdown, spent);

    if maybe_print_json(json_flag, jsonl_flag, &result)? {
        return Ok(());
    }
    print_progress(&result, &ReportSettings::load(conn)?.currency);
    Ok(())
}

pub(crate) fn print_progress(result: &BudgetProgress, ccy: &str) {
    match result {
        BudgetProgress::NoBudgets => {
            println!("No budgets set. Use `spendwise budget set` to add one.");
        }
        BudgetProgress::Entries(entries) => {
            let data = entries
                .iter()
                .map(|e| {
                    vec![
                        e.key.label().to_string(),
                        fmt_money(&e.spent, ccy),
                        fmt_money(&e.limit, ccy),
                        format!("{:.0}%", e.percent),
                        if e.is_over() { "over".into() } else { String::new() },
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Category", "Spent", "Budget", "Used", ""], data)
            );
        }
    }
}
