// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::directory::user_categories;
use crate::ledger::user_transactions;
use crate::store::RecordStore;
use crate::transfer::export_json;
use crate::utils::user_for;
use anyhow::{Result, anyhow};

pub fn handle<S: RecordStore + ?Sized>(store: &S, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let user = user_for(store, sub.get_one::<String>("user").unwrap())?;

    match fmt.as_str() {
        "json" => std::fs::write(out, export_json(store, &user.id)?)?,
        "csv" => export_csv(store, &user.id, out)?,
        _ => return Err(anyhow!("Unknown format: {} (use json|csv)", fmt)),
    }
    println!("Exported {} data to {}", user.name, out);
    Ok(())
}

fn export_csv<S: RecordStore + ?Sized>(store: &S, user_id: &str, out: &str) -> Result<()> {
    let categories = user_categories(store, user_id)?;
    let mut txs = user_transactions(store, user_id)?;
    txs.sort_by(|a, b| a.date.cmp(&b.date));

    let mut wtr = csv::Writer::from_path(out)?;
    wtr.write_record([
        "date",
        "type",
        "description",
        "amount",
        "category",
        "recurring_series_id",
    ])?;
    for t in txs {
        let category = categories
            .iter()
            .find(|c| c.id == t.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        wtr.write_record([
            t.date.to_string(),
            t.r#type.to_string(),
            t.description,
            t.amount.to_string(),
            category,
            t.recurring_series_id.unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
