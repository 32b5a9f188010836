// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::directory::user_categories;
use crate::ledger::user_transactions;
use crate::schedule::user_instances;
use crate::store::RecordStore;
use crate::summary::{CategoryTotal, MonthSummary, expenses_by_category, in_month, summarize, upcoming};
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table, user_for};
use anyhow::Result;
use serde::Serialize;

pub fn handle<S: RecordStore + ?Sized>(
    store: &S,
    config: &Config,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(store, config, sub)?,
        Some(("upcoming", sub)) => due_soon(store, config, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct MonthReport {
    #[serde(flatten)]
    summary: MonthSummary,
    by_category: Vec<CategoryTotal>,
}

fn month<S: RecordStore + ?Sized>(store: &S, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_for(store, sub.get_one::<String>("user").unwrap())?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let txs = user_transactions(store, &user.id)?;
    let instances = user_instances(store, &user.id)?;
    let categories = user_categories(store, &user.id)?;

    let report = MonthReport {
        summary: summarize(month, &txs, &instances),
        by_category: expenses_by_category(&in_month(&txs, month), &categories),
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let s = &report.summary;
    println!(
        "{}",
        pretty_table(
            &["Month", "Income", "Expenses", "Balance", "Transactions", "Bills"],
            vec![vec![
                s.month.clone(),
                fmt_money(&s.income, &config.currency),
                fmt_money(&s.expenses, &config.currency),
                fmt_money(&s.balance, &config.currency),
                s.transactions.to_string(),
                s.scheduled.to_string(),
            ]],
        )
    );
    if !report.by_category.is_empty() {
        let rows = report
            .by_category
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    fmt_money(&c.total, &config.currency),
                    c.count.to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Count"], rows));
    }
    Ok(())
}

fn due_soon<S: RecordStore + ?Sized>(store: &S, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_for(store, sub.get_one::<String>("user").unwrap())?;
    let days = sub
        .get_one::<u32>("days")
        .copied()
        .unwrap_or(config.upcoming_days);
    let today = chrono::Local::now().date_naive();
    let due = upcoming(&user_instances(store, &user.id)?, today, days);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &due)? {
        return Ok(());
    }
    if due.is_empty() {
        println!("No bills due in the next {} day(s)", days);
        return Ok(());
    }
    let rows = due
        .iter()
        .map(|i| {
            vec![
                i.due_date.to_string(),
                i.description.clone(),
                fmt_money(&i.amount, &config.currency),
                i.id.clone(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Due", "Description", "Amount", "ID"], rows));
    Ok(())
}
