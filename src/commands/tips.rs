// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::directory::user_categories;
use crate::ledger::user_transactions;
use crate::store::RecordStore;
use crate::summary::{Month, in_month};
use crate::tips::{TipSource, generate_tips};
use crate::utils::{maybe_print_json, parse_month, user_for};
use anyhow::Result;

pub fn handle<S: RecordStore + ?Sized>(
    store: &S,
    config: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let user = user_for(store, sub.get_one::<String>("user").unwrap())?;
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => Month::of(chrono::Local::now().date_naive()),
    };
    let txs = in_month(&user_transactions(store, &user.id)?, month);
    let categories = user_categories(store, &user.id)?;
    let tips = generate_tips(&txs, &categories, config.tips.as_ref());

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &tips)? {
        return Ok(());
    }
    let origin = match tips.source {
        TipSource::Remote => "tips service",
        TipSource::Heuristic => "local",
    };
    println!("Tips for {} ({}):", month, origin);
    for tip in &tips.tips {
        println!("  * {}", tip);
    }
    Ok(())
}
