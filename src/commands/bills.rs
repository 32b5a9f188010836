// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::directory::user_categories;
use crate::models::EntryType;
use crate::schedule::{
    BillInput, create_bill, delete_instance, mark_paid, rename_instance, user_instances,
};
use crate::scope::{BillScope, Outcome};
use crate::store::RecordStore;
use crate::utils::{
    category_for, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table,
    prompt_choice, user_for,
};
use anyhow::{Result, anyhow};
use serde::Serialize;
use std::io::{self, BufRead, Write};

const SCOPE_QUESTION: &str = "Delete:\n1 - only this bill\n2 - every bill in this schedule";
const SCOPE_CHOICES: &[(&str, BillScope)] = &[("1", BillScope::Single), ("2", BillScope::Series)];

pub fn handle<S: RecordStore + ?Sized>(store: &mut S, m: &clap::ArgMatches) -> Result<()> {
    let stdin = io::stdin();
    handle_with(store, m, &mut stdin.lock(), &mut io::stdout())
}

pub fn handle_with<S: RecordStore + ?Sized, R: BufRead, W: Write>(
    store: &mut S,
    m: &clap::ArgMatches,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("pay", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            match mark_paid(store, id)? {
                Outcome::NotFound => writeln!(output, "Bill {} not found", id)?,
                _ => writeln!(output, "Marked {} as paid", id)?,
            }
        }
        Some(("rename", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let description = sub.get_one::<String>("description").unwrap();
            match rename_instance(store, id, description)? {
                Outcome::NotFound => writeln!(output, "Bill {} not found", id)?,
                Outcome::Applied(0) => writeln!(output, "Description unchanged")?,
                _ => writeln!(output, "Renamed {} to '{}'", id, description.trim())?,
            }
        }
        Some(("rm", sub)) => remove(store, sub, input, output)?,
        _ => {}
    }
    Ok(())
}

fn add<S: RecordStore + ?Sized>(store: &mut S, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_for(store, sub.get_one::<String>("user").unwrap())?;
    let category = category_for(store, &user, sub.get_one::<String>("category").unwrap())?;
    if category.r#type != EntryType::Expense {
        return Err(anyhow!("Category '{}' is not an expense category", category.name));
    }
    let start_date = match sub.get_one::<String>("start") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let input = BillInput {
        user_id: user.id.clone(),
        description: sub.get_one::<String>("description").unwrap().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        category_id: category.id,
        due_day: *sub.get_one::<u32>("due_day").unwrap(),
        recurring_months: *sub.get_one::<u32>("months").unwrap(),
        start_date,
    };
    let (bill, instances) = create_bill(store, &input)?;
    println!(
        "Scheduled '{}' ({}) for {} month(s): {} .. {}",
        bill.description,
        bill.amount,
        instances.len(),
        instances.first().map(|i| i.due_date.to_string()).unwrap_or_default(),
        instances.last().map(|i| i.due_date.to_string()).unwrap_or_default(),
    );
    Ok(())
}

#[derive(Serialize)]
pub struct BillRow {
    pub id: String,
    pub due_date: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub status: String,
}

pub fn query_rows<S: RecordStore + ?Sized>(
    store: &S,
    sub: &clap::ArgMatches,
) -> Result<Vec<BillRow>> {
    let user = user_for(store, sub.get_one::<String>("user").unwrap())?;
    let categories = user_categories(store, &user.id)?;
    let month = sub
        .get_one::<String>("month")
        .map(|m| parse_month(m))
        .transpose()?;
    Ok(user_instances(store, &user.id)?
        .into_iter()
        .filter(|i| month.is_none_or(|m| m.contains(i.due_date)))
        .map(|i| BillRow {
            category: categories
                .iter()
                .find(|c| c.id == i.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            id: i.id,
            due_date: i.due_date.to_string(),
            description: i.description,
            amount: format!("{:.2}", i.amount),
            status: i.status.to_string(),
        })
        .collect())
}

fn list<S: RecordStore + ?Sized>(store: &S, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(store, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.due_date.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.status.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Due", "Description", "Category", "Amount", "Status", "ID"],
                rows
            )
        );
    }
    Ok(())
}

fn remove<S: RecordStore + ?Sized, R: BufRead, W: Write>(
    store: &mut S,
    sub: &clap::ArgMatches,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let scope = sub
        .get_one::<String>("scope")
        .map(|s| s.parse::<BillScope>())
        .transpose()?;
    let mut outcome = delete_instance(store, id, scope)?;
    if outcome == Outcome::ScopeRequired {
        match prompt_choice(input, output, SCOPE_QUESTION, SCOPE_CHOICES)? {
            Some(chosen) => outcome = delete_instance(store, id, Some(chosen))?,
            None => {
                writeln!(output, "Cancelled, nothing changed")?;
                return Ok(());
            }
        }
    }
    match outcome {
        Outcome::NotFound => writeln!(output, "Bill {} not found, nothing changed", id)?,
        Outcome::Applied(n) => writeln!(output, "Removed {} record(s)", n)?,
        Outcome::ScopeRequired => writeln!(output, "A scope is required, nothing changed")?,
    }
    Ok(())
}
