// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqlitePersistence;
use crate::models::{NewTransaction, Transaction, TransactionKind};
use crate::settings::ReportSettings;
use crate::store::TransactionStore;
use crate::utils::{
    fmt_money, maybe_print_json, parse_datetime, period_from_args, pretty_table, required,
};
use anyhow::{bail, Result};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("recent", sub)) => recent(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("clear", sub)) => clear(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Validates the arguments of `tx add` without touching the store.
pub fn new_transaction(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let kind = required(sub, "type")?.parse::<TransactionKind>()?;
    let amount = required(sub, "amount")?;
    let description = required(sub, "description")?;
    let category = sub.get_one::<String>("category").map(|s| s.as_str());
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_datetime(d)?,
        None => chrono::Local::now().naive_local(),
    };
    Ok(NewTransaction::validate(
        kind,
        amount,
        description,
        category,
        date,
    )?)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let new = new_transaction(sub)?;
    let ccy = ReportSettings::load(conn)?.currency;
    let (kind, amount) = (new.kind(), new.amount());
    let mut store = writable_store(conn)?;
    let id = store.add(new)?;
    println!("Recorded {} #{}: {}", kind, id, fmt_money(&amount, &ccy));
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let store = TransactionStore::init(SqlitePersistence::new(conn));
    let data = query_rows(store.all(), sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        print_rows(&data);
    }
    Ok(())
}

fn recent(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&5);
    let store = TransactionStore::init(SqlitePersistence::new(conn));
    let data: Vec<TransactionRow> = store.recent(limit).into_iter().map(TransactionRow::from).collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        print_rows(&data);
    }
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let Some(id) = sub.get_one::<i64>("id").copied() else {
        bail!("Missing required argument --id");
    };
    let mut store = writable_store(conn)?;
    if store.remove(id)? {
        println!("Removed transaction {}", id);
    } else {
        println!("No transaction with id {}", id);
    }
    Ok(())
}

fn clear(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    if !sub.get_flag("yes") {
        bail!("Refusing to delete all transactions without --yes");
    }
    let mut store = writable_store(conn)?;
    let n = store.len();
    store.clear()?;
    println!("Deleted {} transactions", n);
    Ok(())
}

/// Opens the store for a mutation, refusing when the stored log could not be
/// read so that saving cannot overwrite it.
fn writable_store(conn: &Connection) -> Result<TransactionStore<SqlitePersistence<'_>>> {
    let store = TransactionStore::init(SqlitePersistence::new(conn));
    if store.load_failed() {
        bail!("Stored transactions could not be read; refusing to modify them (run with RUST_LOG=warn for details)");
    }
    Ok(store)
}

fn print_rows(data: &[TransactionRow]) {
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.date.clone(),
                r.kind.clone(),
                r.category.clone(),
                r.amount.clone(),
                r.description.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Type", "Category", "Amount", "Description"],
            rows,
        )
    );
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id,
            date: t.date.format("%Y-%m-%d %H:%M").to_string(),
            kind: t.kind.label().to_string(),
            category: t.category.clone(),
            amount: format!("{:.2}", t.amount),
            description: t.description.clone(),
        }
    }
}

/// Applies the `tx list` filters to a store snapshot, keeping store order.
pub fn query_rows(transactions: &[Transaction], sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let selected: Vec<&Transaction> = if sub.contains_id("month") || sub.contains_id("year") {
        period_from_args(sub)?.select(transactions)
    } else {
        transactions.iter().collect()
    };
    let kind = match sub.get_one::<String>("type") {
        Some(k) => Some(k.parse::<TransactionKind>()?),
        None => None,
    };
    let category = sub.get_one::<String>("category").map(|c| c.trim());

    let mut data: Vec<TransactionRow> = selected
        .into_iter()
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .filter(|t| category.is_none_or(|c| t.category.eq_ignore_ascii_case(c)))
        .map(TransactionRow::from)
        .collect();
    // keep the newest `limit` rows, still oldest first
    if let Some(limit) = sub.get_one::<usize>("limit") {
        let skip = data.len().saturating_sub(*limit);
        data.drain(..skip);
    }
    Ok(data)
}
