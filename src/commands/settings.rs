// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::settings::{validate_setting, ReportSettings};
use crate::utils::{delete_setting, get_setting, list_settings, pretty_table, required, set_setting};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", _)) => list(conn)?,
        Some(("get", sub)) => {
            let key = required(sub, "key")?.trim();
            match get_setting(conn, key)? {
                Some(v) => println!("{} = {}", key, v),
                None => println!("{} is not set", key),
            }
        }
        Some(("set", sub)) => {
            let key = required(sub, "key")?.trim();
            let value = validate_setting(key, required(sub, "value")?)?;
            set_setting(conn, key, &value)?;
            println!("{} = {}", key, value);
        }
        Some(("unset", sub)) => {
            let key = required(sub, "key")?.trim();
            if delete_setting(conn, key)? {
                println!("Removed {}", key);
            } else {
                println!("{} was not set", key);
            }
        }
        Some(("reset", _)) => {
            conn.execute("DELETE FROM settings", [])?;
            println!("Settings reset to defaults");
        }
        Some(("preset", sub)) => {
            let name = validate_setting("preset", required(sub, "name")?)?;
            set_setting(conn, "preset", &name)?;
            println!("Using the {} thresholds", name);
        }
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let effective = ReportSettings::load(conn)?;
    let mut data = vec![
        vec!["currency".to_string(), effective.currency.clone()],
        vec![
            "trend_window".to_string(),
            effective.options.trend_window.to_string(),
        ],
        vec![
            "share_threshold".to_string(),
            effective.options.rules.share_threshold.to_string(),
        ],
    ];
    for t in &effective.options.rules.thresholds {
        data.push(vec![format!("threshold.{}", t.category), t.limit.to_string()]);
    }
    println!("{}", pretty_table(&["Key", "Value"], data));
    let stored = list_settings(conn)?.len();
    if stored == 0 {
        println!("(all defaults)");
    }
    Ok(())
}
