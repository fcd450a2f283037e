// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::reports::build_report;
use crate::report::{Report, LINE_ITEM_COLUMNS};
use crate::utils::required;
use anyhow::{anyhow, Context, Result};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use rusqlite::Connection;
use std::io::Write;
use std::path::Path;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("report", sub)) => export_report(conn, sub),
        _ => Ok(()),
    }
}

fn export_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.trim().to_lowercase();
    let out = required(sub, "out")?.trim().to_string();
    if !matches!(fmt.as_str(), "csv" | "json" | "pdf") {
        return Err(anyhow!("Unknown format: {} (use csv|json|pdf)", fmt));
    }
    let report = build_report(conn, sub)?;
    let path = Path::new(&out);
    match fmt.as_str() {
        "csv" => {
            let file = std::fs::File::create(path).with_context(|| format!("Create {}", out))?;
            write_csv(&report, file)?;
        }
        "pdf" => {
            let file = std::fs::File::create(path).with_context(|| format!("Create {}", out))?;
            write_pdf(&report, file)?;
        }
        _ => {
            std::fs::write(path, serde_json::to_string_pretty(&report)?)
                .with_context(|| format!("Write {}", out))?;
        }
    }
    log::info!("exported '{}' as {} to {}", report.period.label, fmt, out);
    println!("Exported {} to {}", report.period.label, out);
    Ok(())
}

/// Summary rows, the line-item table, then numbered suggestions.
pub fn write_csv<W: Write>(report: &Report, out: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(out);
    wtr.write_record([report.period.label.as_str()])?;
    wtr.write_record(["Total Income", format!("{:.2}", report.total_income).as_str()])?;
    wtr.write_record(["Total Expenses", format!("{:.2}", report.total_expense).as_str()])?;
    wtr.write_record(["Balance", format!("{:.2}", report.balance).as_str()])?;
    wtr.write_record([""])?;

    wtr.write_record(LINE_ITEM_COLUMNS)?;
    for item in &report.line_items {
        wtr.write_record(item.to_row())?;
    }

    wtr.write_record([""])?;
    wtr.write_record(["Suggestions"])?;
    for (i, s) in report.suggestions.iter().enumerate() {
        wtr.write_record([format!("{}. {}", i + 1, s)])?;
    }
    wtr.flush()?;
    Ok(())
}

// US letter, in millimetres
const PAGE_W: f32 = 215.9;
const PAGE_H: f32 = 279.4;
const MARGIN: f32 = 14.0;
const COLUMN_W: f32 = 35.0;
const ROW_H: f32 = 7.0;
const WRAP_AT: usize = 90;

/// Title, totals, the line-item table and numbered suggestions on letter
/// pages. The table continues on new pages instead of being cut off.
pub fn write_pdf<W: Write>(report: &Report, mut out: W) -> Result<()> {
    let (doc, page, layer) = PdfDocument::new(
        report.period.label.as_str(),
        Mm(PAGE_W),
        Mm(PAGE_H),
        "Report",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("Load PDF font: {:?}", e))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("Load PDF font: {:?}", e))?;

    let mut pen = Pen {
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_H - MARGIN,
        pages: 1,
    };

    pen.line(&report.period.label, 18.0, &bold, &doc);
    pen.y -= ROW_H / 2.0;
    for (label, value) in [
        ("Total Income", report.total_income),
        ("Total Expenses", report.total_expense),
        ("Balance", report.balance),
    ] {
        pen.line(&format!("{}: {:.2}", label, value), 14.0, &font, &doc);
    }
    pen.y -= ROW_H;

    pen.line("Transaction Details:", 12.0, &bold, &doc);
    pen.row(&LINE_ITEM_COLUMNS.map(String::from), &bold, &doc);
    for item in &report.line_items {
        pen.row(&item.to_row(), &font, &doc);
    }
    pen.y -= ROW_H;

    pen.line("Suggestions", 12.0, &bold, &doc);
    for (i, s) in report.suggestions.iter().enumerate() {
        for (n, part) in wrap(&format!("{}. {}", i + 1, s), WRAP_AT).iter().enumerate() {
            let text = if n == 0 { part.clone() } else { format!("   {}", part) };
            pen.line(&text, 10.0, &font, &doc);
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| anyhow!("Render PDF: {:?}", e))?;
    out.write_all(&bytes).context("Write PDF")?;
    log::debug!("rendered PDF on {} page(s)", pen.pages);
    Ok(())
}

/// Write position on the current page.
struct Pen {
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl Pen {
    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef, doc: &PdfDocumentReference) {
        self.ensure_room(doc);
        self.layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
        self.y -= ROW_H;
    }

    fn row(&mut self, cells: &[String; 4], font: &IndirectFontRef, doc: &PdfDocumentReference) {
        self.ensure_room(doc);
        for (i, cell) in cells.iter().enumerate() {
            let x = MARGIN + COLUMN_W * i as f32;
            self.layer.use_text(cell.as_str(), 11.0, Mm(x), Mm(self.y), font);
        }
        self.y -= ROW_H;
    }

    fn ensure_room(&mut self, doc: &PdfDocumentReference) {
        if self.y >= MARGIN {
            return;
        }
        let (page, layer) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Report");
        self.layer = doc.get_page(page).get_layer(layer);
        self.y = PAGE_H - MARGIN;
        self.pages += 1;
    }
}

/// Greedy word wrap; a word longer than `width` gets its own line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
