// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;
use spendwise::budget::Budgets;
use spendwise::cli;
use spendwise::commands::exporter::{self, write_csv, write_pdf};
use spendwise::db::{self, SqlitePersistence};
use spendwise::models::{NewTransaction, TransactionKind};
use spendwise::period::ReportPeriod;
use spendwise::report::{Report, ReportBuilder, ReportOptions};
use spendwise::store::TransactionStore;

fn seeded() -> Connection {
    let conn = db::open_in_memory().unwrap();
    let mut store = TransactionStore::init(SqlitePersistence::new(&conn));
    let day = |d: u32| {
        NaiveDate::from_ymd_opt(2023, 10, d)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    };
    store
        .add(NewTransaction::validate(TransactionKind::Income, "5000", "salary", None, day(1)).unwrap())
        .unwrap();
    store
        .add(NewTransaction::validate(TransactionKind::Expense, "1200", "groceries", Some("Food"), day(2)).unwrap())
        .unwrap();
    conn
}

fn export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let m = cli::build_cli().try_get_matches_from(
        ["spendwise", "export", "report"]
            .into_iter()
            .chain(args.iter().copied()),
    )?;
    let (_, sub) = m.subcommand().unwrap();
    exporter::handle(conn, sub)
}

fn october() -> Report {
    let conn = seeded();
    let store = TransactionStore::init(SqlitePersistence::new(&conn));
    ReportBuilder::new(ReportOptions::default())
        .anchored_at(NaiveDate::from_ymd_opt(2023, 10, 31).unwrap())
        .build(store.all(), ReportPeriod::month(2023, 10).unwrap(), &Budgets::new())
}

#[test]
fn csv_has_summary_table_and_numbered_suggestions() {
    let mut buf = Vec::new();
    write_csv(&october(), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Monthly Report - October 2023");
    assert_eq!(lines[1], "Total Income,5000.00");
    assert_eq!(lines[2], "Total Expenses,1200.00");
    assert_eq!(lines[3], "Balance,3800.00");
    assert_eq!(lines[5], "Date,Type,Category,Amount");
    assert_eq!(lines[6], "2023-10-01,Income,Income,+5000.00");
    assert_eq!(lines[7], "2023-10-02,Expense,Food,-1200.00");
    assert_eq!(lines[9], "Suggestions");
    assert!(lines[10].starts_with("1. You're spending a lot on Food (100% of total)."));
    assert!(lines[11].starts_with("2. Your food expenses are high."));
    assert_eq!(lines.len(), 12);
}

#[test]
fn csv_export_writes_file() {
    let conn = seeded();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("october.csv");
    export(&conn, &["--month", "2023-10", "--out", out.to_str().unwrap()]).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("Monthly Report - October 2023\n"));
    assert!(text.contains("2023-10-02,Expense,Food,-1200.00"));
}

#[test]
fn json_export_round_trips_report_fields() {
    let conn = seeded();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("october.json");
    export(
        &conn,
        &["--month", "2023-10", "--format", "JSON", "--anchor", "2023-10-31", "--out", out.to_str().unwrap()],
    )
    .unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["period"]["label"], "Monthly Report - October 2023");
    assert_eq!(value["line_items"][1]["type"], "expense");
    assert_eq!(value["trend"].as_array().unwrap().len(), 6);
    assert_eq!(value["budget_progress"], json!({ "status": "no_budgets" }));

    let report: Report = serde_json::from_value(value).unwrap();
    assert_eq!(report.balance, Decimal::from(3800));
}

#[test]
fn unknown_format_writes_nothing() {
    let conn = seeded();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("october.docx");
    let err = export(
        &conn,
        &["--month", "2023-10", "--format", "docx", "--out", out.to_str().unwrap()],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out.exists());
}

#[test]
fn pdf_export_writes_a_pdf_document() {
    let conn = seeded();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("october.pdf");
    export(
        &conn,
        &["--month", "2023-10", "--format", "pdf", "--out", out.to_str().unwrap()],
    )
    .unwrap();
    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn pdf_spills_long_tables_onto_more_pages() {
    let mut single = Vec::new();
    write_pdf(&october(), &mut single).unwrap();

    let mut report = october();
    let item = report.line_items[1].clone();
    report.line_items = (0..200).map(|_| item.clone()).collect();
    report.suggestions.push("word ".repeat(60));
    let mut long = Vec::new();
    write_pdf(&report, &mut long).unwrap();

    assert!(long.starts_with(b"%PDF"));
    assert!(long.len() > single.len());
}
