// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::directory::user_categories;
use crate::ledger::{
    TransactionInput, create_transaction, delete_transaction, edit_transaction, user_transactions,
};
use crate::models::{Category, EntryType, Transaction, TransactionPatch};
use crate::scope::{EditScope, Outcome};
use crate::store::{RecordStore, Records};
use crate::summary::{in_month, search};
use crate::utils::{
    category_for, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table,
    prompt_choice, user_for,
};
use anyhow::{Result, anyhow};
use serde::Serialize;
use std::io::{self, BufRead, Write};

const SCOPE_QUESTION: &str =
    "This transaction is recurring. Apply to:\n1 - only this one\n2 - this and future ones\n3 - the whole series";
const SCOPE_CHOICES: &[(&str, EditScope)] = &[
    ("1", EditScope::Single),
    ("2", EditScope::Future),
    ("3", EditScope::All),
];

pub fn handle<S: RecordStore + ?Sized>(store: &mut S, m: &clap::ArgMatches) -> Result<()> {
    let stdin = io::stdin();
    handle_with(store, m, &mut stdin.lock(), &mut io::stdout())
}

/// `handle` with explicit streams for the scope prompt.
pub fn handle_with<S: RecordStore + ?Sized, R: BufRead, W: Write>(
    store: &mut S,
    m: &clap::ArgMatches,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => edit(store, sub, input, output)?,
        Some(("rm", sub)) => remove(store, sub, input, output)?,
        _ => {}
    }
    Ok(())
}

fn add<S: RecordStore + ?Sized>(store: &mut S, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_for(store, sub.get_one::<String>("user").unwrap())?;
    let kind: EntryType = sub.get_one::<String>("type").unwrap().parse()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap().to_string();
    let category = category_for(store, &user, sub.get_one::<String>("category").unwrap())?;
    ensure_kind(&category, kind)?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let recurring_months = sub.get_one::<u32>("months").copied();

    let input = TransactionInput {
        user_id: user.id.clone(),
        r#type: kind,
        amount,
        description,
        category_id: category.id.clone(),
        date,
        recurring_months,
    };
    let created = create_transaction(store, &input)?;
    match created.as_slice() {
        [one] => println!(
            "Recorded {} {} on {} '{}' ({})",
            one.r#type, one.amount, one.date, one.description, one.id
        ),
        many => println!(
            "Recorded {} monthly {} entries of {} '{}' from {} (series {})",
            many.len(),
            kind,
            amount,
            input.description.trim(),
            date,
            many.first()
                .and_then(|t| t.recurring_series_id.as_deref())
                .unwrap_or_default()
        ),
    }
    Ok(())
}

fn ensure_kind(category: &Category, kind: EntryType) -> Result<()> {
    if category.r#type != kind {
        return Err(anyhow!(
            "Category '{}' is for {} entries, not {}",
            category.name,
            category.r#type,
            kind
        ));
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub r#type: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub series: String,
}

pub fn query_rows<S: RecordStore + ?Sized>(
    store: &S,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let user = user_for(store, sub.get_one::<String>("user").unwrap())?;
    let categories = user_categories(store, &user.id)?;
    let mut rows = user_transactions(store, &user.id)?;
    if let Some(month) = sub.get_one::<String>("month") {
        rows = in_month(&rows, parse_month(month)?);
    }
    if let Some(term) = sub.get_one::<String>("search") {
        rows = search(&rows, &categories, term);
    }
    Ok(rows
        .into_iter()
        .map(|t| TransactionRow {
            category: categories
                .iter()
                .find(|c| c.id == t.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            id: t.id,
            date: t.date.to_string(),
            r#type: t.r#type.to_string(),
            description: t.description,
            amount: format!("{:.2}", t.amount),
            series: t.recurring_series_id.unwrap_or_default(),
        })
        .collect())
}

fn list<S: RecordStore + ?Sized>(store: &S, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.r#type.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    if r.series.is_empty() { String::new() } else { "yes".into() },
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Description", "Category", "Amount", "Recurring", "ID"],
                rows,
            )
        );
    }
    Ok(())
}

fn scope_arg(sub: &clap::ArgMatches) -> Result<Option<EditScope>> {
    Ok(sub
        .get_one::<String>("scope")
        .map(|s| s.parse::<EditScope>())
        .transpose()?)
}

/// Runs `op` with the given scope; when the record turns out to be
/// recurring and no scope was given, asks for one and runs it again.
fn with_scope<S, R, W, F>(
    store: &mut S,
    scope: Option<EditScope>,
    input: &mut R,
    output: &mut W,
    mut op: F,
) -> Result<Option<Outcome>>
where
    S: RecordStore + ?Sized,
    R: BufRead,
    W: Write,
    F: FnMut(&mut S, Option<EditScope>) -> Result<Outcome>,
{
    let outcome = op(store, scope)?;
    if outcome != Outcome::ScopeRequired {
        return Ok(Some(outcome));
    }
    match prompt_choice(input, output, SCOPE_QUESTION, SCOPE_CHOICES)? {
        Some(chosen) => Ok(Some(op(store, Some(chosen))?)),
        None => Ok(None),
    }
}

fn report<W: Write>(output: &mut W, id: &str, verb: &str, outcome: Option<Outcome>) -> Result<()> {
    match outcome {
        None => writeln!(output, "Cancelled, nothing changed")?,
        Some(Outcome::NotFound) => writeln!(output, "Transaction {} not found, nothing changed", id)?,
        Some(Outcome::Applied(n)) => writeln!(output, "{} {} transaction(s)", verb, n)?,
        Some(Outcome::ScopeRequired) => writeln!(output, "A scope is required, nothing changed")?,
    }
    Ok(())
}

fn edit<S: RecordStore + ?Sized, R: BufRead, W: Write>(
    store: &mut S,
    sub: &clap::ArgMatches,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    let Some(anchor) = store.find_record::<Transaction>(&id)? else {
        return report(output, &id, "Updated", Some(Outcome::NotFound));
    };
    let mut patch = TransactionPatch::default();
    if let Some(t) = sub.get_one::<String>("type") {
        patch.r#type = Some(t.parse::<EntryType>()?);
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        patch.amount = Some(parse_decimal(a)?);
    }
    if let Some(d) = sub.get_one::<String>("description") {
        patch.description = Some(d.trim().to_string());
    }
    let category = match sub.get_one::<String>("category") {
        Some(c) => {
            let user = user_for(store, &anchor.user_id)?;
            let found = category_for(store, &user, c)?;
            patch.category_id = Some(found.id.clone());
            Some(found)
        }
        None => store.find_record::<Category>(&anchor.category_id)?,
    };
    if let Some(category) = &category {
        ensure_kind(category, patch.r#type.unwrap_or(anchor.r#type))?;
    }
    if let Some(d) = sub.get_one::<String>("date") {
        patch.date = Some(parse_date(d)?);
    }
    let scope = scope_arg(sub)?;
    let outcome = with_scope(store, scope, input, output, |s, scope| {
        Ok(edit_transaction(s, &id, &patch, scope)?)
    })?;
    report(output, &id, "Updated", outcome)
}

fn remove<S: RecordStore + ?Sized, R: BufRead, W: Write>(
    store: &mut S,
    sub: &clap::ArgMatches,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    let scope = scope_arg(sub)?;
    let outcome = with_scope(store, scope, input, output, |s, scope| {
        Ok(delete_transaction(s, &id, scope)?)
    })?;
    report(output, &id, "Removed", outcome)
}
