// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::directory::{add_category, remove_category, user_categories};
use crate::models::EntryType;
use crate::store::RecordStore;
use crate::utils::{category_for, pretty_table, user_for};
use anyhow::Result;

pub fn handle<S: RecordStore + ?Sized>(store: &mut S, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user = user_for(store, sub.get_one::<String>("user").unwrap())?;
            let name = sub.get_one::<String>("name").unwrap();
            let kind: EntryType = sub.get_one::<String>("type").unwrap().parse()?;
            let cat = add_category(store, &user.id, name, kind)?;
            println!("Added {} category '{}'", cat.r#type, cat.name);
        }
        Some(("list", sub)) => {
            let user = user_for(store, sub.get_one::<String>("user").unwrap())?;
            let mut cats = user_categories(store, &user.id)?;
            cats.sort_by(|a, b| {
                (a.r#type == EntryType::Expense)
                    .cmp(&(b.r#type == EntryType::Expense))
                    .then_with(|| a.name.cmp(&b.name))
            });
            let data = cats
                .into_iter()
                .map(|c| vec![c.name, c.r#type.to_string()])
                .collect();
            println!("{}", pretty_table(&["Category", "Type"], data));
        }
        Some(("rm", sub)) => {
            let user = user_for(store, sub.get_one::<String>("user").unwrap())?;
            let cat = category_for(store, &user, sub.get_one::<String>("name").unwrap())?;
            remove_category(store, &cat.id)?;
            println!("Removed category '{}'", cat.name);
        }
        _ => {}
    }
    Ok(())
}
