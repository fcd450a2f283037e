// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;

use crate::budget::{BudgetKey, Budgets};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Transaction, TransactionKind, MAX_AMOUNT};
use crate::store::TransactionPersistence;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Spendwise", "spendwise"));

pub const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("spendwise.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    log::debug!("opened database at {}", path.display());
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("Open in-memory DB")?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY,
        seq INTEGER NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        description TEXT NOT NULL,
        date TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    -- insertion order of budgets is the row id; upserts keep it
    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        key TEXT NOT NULL UNIQUE COLLATE NOCASE,
        amount TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}

/// Transaction log stored in the `transactions` table.
pub struct SqlitePersistence<'c> {
    conn: &'c Connection,
}

impl<'c> SqlitePersistence<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl TransactionPersistence for SqlitePersistence<'_> {
    fn load(&self) -> TrackerResult<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, type, category, amount, description, date FROM transactions ORDER BY seq",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let id: i64 = r.get(0)?;
            let kind: String = r.get(1)?;
            let category: String = r.get(2)?;
            let amount: String = r.get(3)?;
            let description: String = r.get(4)?;
            let date: String = r.get(5)?;
            let kind = kind.parse::<TransactionKind>()?;
            let amount = amount
                .parse::<Decimal>()
                .ok()
                .filter(|a| *a > Decimal::ZERO && *a <= MAX_AMOUNT)
                .ok_or_else(|| {
                    TrackerError::persistence(format!(
                        "Invalid amount '{}' in transaction {}",
                        amount, id
                    ))
                })?;
            let date = NaiveDateTime::parse_from_str(&date, DATETIME_FMT).map_err(|_| {
                TrackerError::persistence(format!("Invalid date '{}' in transaction {}", date, id))
            })?;
            out.push(Transaction {
                id,
                kind,
                category,
                amount,
                description,
                date,
            });
        }
        Ok(out)
    }

    fn save(&mut self, transactions: &[Transaction]) -> TrackerResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM transactions", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO transactions(id, seq, type, category, amount, description, date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (seq, t) in transactions.iter().enumerate() {
                stmt.execute(params![
                    t.id,
                    seq as i64,
                    t.kind.to_string(),
                    t.category,
                    t.amount.to_string(),
                    t.description,
                    t.date.format(DATETIME_FMT).to_string(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

pub fn load_budgets(conn: &Connection) -> Result<Budgets> {
    let mut stmt = conn.prepare("SELECT key, amount FROM budgets ORDER BY id")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut budgets = Budgets::new();
    for row in rows {
        let (key, amount) = row?;
        let amount = amount
            .parse::<Decimal>()
            .with_context(|| format!("Invalid budget amount '{}' for {}", amount, key))?;
        budgets.set_budget(BudgetKey::parse(&key)?, amount)?;
    }
    Ok(budgets)
}

pub fn save_budget(conn: &Connection, key: &BudgetKey, amount: Decimal) -> Result<()> {
    conn.execute(
        "INSERT INTO budgets(key, amount) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET amount=excluded.amount",
        params![key.as_str(), amount.to_string()],
    )?;
    Ok(())
}
