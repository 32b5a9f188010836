// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::RecordStore;
use crate::transfer::import_json;
use crate::utils::user_for;
use anyhow::{Context, Result};

pub fn handle<S: RecordStore + ?Sized>(store: &mut S, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let user = user_for(store, sub.get_one::<String>("user").unwrap())?;
    let text = std::fs::read_to_string(path).with_context(|| format!("Read {}", path))?;
    let report = import_json(store, &user.id, &text)
        .with_context(|| format!("Import {} into {}", path, user.name))?;
    println!(
        "Imported {} categories, {} transactions, {} bills and {} bill instances from {}",
        report.categories,
        report.transactions,
        report.scheduled_bills,
        report.scheduled_bill_instances,
        path
    );
    Ok(())
}
