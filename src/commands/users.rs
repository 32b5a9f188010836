// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::directory::{create_guest, create_user};
use crate::models::User;
use crate::store::{RecordStore, Records};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle<S: RecordStore + ?Sized>(store: &mut S, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let email = sub.get_one::<String>("email").unwrap();
            let user = create_user(store, name, email)?;
            println!("Added user '{}' ({})", user.name, user.id);
        }
        Some(("guest", _)) => {
            let user = create_guest(store)?;
            println!("Added guest user ({})", user.id);
        }
        Some(("list", _)) => {
            let rows = store
                .all_records::<User>()?
                .into_iter()
                .map(|u| vec![u.name, u.email, u.id])
                .collect();
            println!("{}", pretty_table(&["Name", "Email", "ID"], rows));
        }
        _ => {}
    }
    Ok(())
}
