// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};

use crate::directory::{find_category, find_user};
use crate::models::{Category, User};
use crate::store::RecordStore;
use crate::summary::Month;

const UA: &str = concat!(
    "ledgerloop/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/ledgerloop)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<Month> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(Month::of(d))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    format!("{} {:.2}", symbol, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn user_for<S: RecordStore + ?Sized>(store: &S, key: &str) -> Result<User> {
    find_user(store, key)?.with_context(|| format!("User '{}' not found", key.trim()))
}

pub fn category_for<S: RecordStore + ?Sized>(store: &S, user: &User, name: &str) -> Result<Category> {
    find_category(store, &user.id, name)?
        .with_context(|| format!("Category '{}' not found for {}", name.trim(), user.name))
}

/// Asks `question` on stdout and maps the answer through `choices`
/// (`("1", value), ...`). An empty answer or EOF cancels with `None`.
pub fn prompt_choice<T: Copy, R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    choices: &[(&str, T)],
) -> Result<Option<T>> {
    write!(output, "{}\n> ", question)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let answer = line.trim();
    if answer.is_empty() {
        return Ok(None);
    }
    choices
        .iter()
        .find(|(key, _)| *key == answer)
        .map(|(_, v)| Some(*v))
        .ok_or_else(|| anyhow!("Unrecognised choice '{}'", answer))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
