// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, value_parser, Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("spendwise")
        .version(crate_version!())
        .about("Track income and expenses, budgets and period reports")
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(tx())
        .subcommand(budget())
        .subcommand(report())
        .subcommand(export())
        .subcommand(config())
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn period_args(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("month")
            .long("month")
            .value_name("YYYY-MM")
            .help("Calendar month"),
    )
    .arg(
        Arg::new("year")
            .long("year")
            .value_name("YYYY")
            .conflicts_with("month")
            .help("Calendar year"),
    )
    .group(
        clap::ArgGroup::new("period")
            .args(["month", "year"])
            .required(required),
    )
}

fn anchor_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("anchor")
            .long("anchor")
            .value_name("YYYY-MM-DD")
            .help("Date the trend window ends at"),
    )
}

fn tx() -> Command {
    Command::new("tx")
        .about("Record and browse transactions")
        .subcommand(
            Command::new("add")
                .about("Record an income or expense")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .value_parser(["income", "expense"]),
                )
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("description").long("description").required(true))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help("Required for expenses"),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD[THH:MM:SS]")
                        .help("Defaults to now"),
                ),
        )
        .subcommand(json_flags(period_args(
            Command::new("list")
                .about("List transactions, oldest first")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(["income", "expense"]),
                )
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
            false,
        )))
        .subcommand(json_flags(
            Command::new("recent")
                .about("Most recently added transactions")
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize))
                        .default_value("5"),
                ),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("clear").about("Delete every transaction").arg(
                Arg::new("yes")
                    .long("yes")
                    .action(ArgAction::SetTrue)
                    .help("Confirm deleting all data"),
            ),
        )
}

fn budget() -> Command {
    Command::new("budget")
        .about("Spending ceilings per category or in total")
        .subcommand(
            Command::new("set")
                .about("Set or overwrite a budget")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .required(true)
                        .help("Category name, or 'total'"),
                )
                .arg(Arg::new("amount").long("amount").required(true)),
        )
        .subcommand(json_flags(Command::new("list").about("List budgets")))
        .subcommand(json_flags(period_args(
            Command::new("status").about("Spent versus budget for a period"),
            true,
        )))
}

fn report() -> Command {
    Command::new("report")
        .about("Summaries and period reports")
        .subcommand(json_flags(
            Command::new("summary").about("All-time totals and activity"),
        ))
        .subcommand(json_flags(anchor_arg(period_args(
            Command::new("generate").about("Full report for a month or year"),
            true,
        ))))
        .subcommand(json_flags(period_args(
            Command::new("breakdown").about("Expenses per category"),
            true,
        )))
        .subcommand(json_flags(anchor_arg(
            Command::new("trend")
                .about("Expense totals over trailing periods")
                .arg(
                    Arg::new("periods")
                        .long("periods")
                        .help("Number of periods (1-120), defaults to the configured window"),
                )
                .arg(
                    Arg::new("yearly")
                        .long("yearly")
                        .action(ArgAction::SetTrue)
                        .help("Bucket by year instead of month"),
                ),
        )))
        .subcommand(json_flags(
            Command::new("cashflow")
                .about("Income and expense per month")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(usize))
                        .default_value("12"),
                ),
        ))
        .subcommand(period_args(
            Command::new("advise").about("Spending suggestions"),
            false,
        ))
}

fn export() -> Command {
    Command::new("export").about("Write reports to files").subcommand(anchor_arg(
        period_args(
            Command::new("report")
                .about("Export a period report")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json|pdf"),
                )
                .arg(Arg::new("out").long("out").required(true)),
            true,
        ),
    ))
}

fn config() -> Command {
    Command::new("config")
        .about("Report settings")
        .subcommand(Command::new("list").about("Effective settings"))
        .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
        .subcommand(
            Command::new("set")
                .arg(Arg::new("key").required(true))
                .arg(Arg::new("value").required(true)),
        )
        .subcommand(Command::new("unset").arg(Arg::new("key").required(true)))
        .subcommand(Command::new("reset").about("Remove all stored settings"))
        .subcommand(
            Command::new("preset")
                .about("Switch recommendation thresholds")
                .arg(
                    Arg::new("name")
                        .required(true)
                        .value_parser(["default", "tracker"]),
                ),
        )
}
