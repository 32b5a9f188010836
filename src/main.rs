// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ledgerloop::config::Config;
use ledgerloop::{cli, commands, db};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();
    let db_arg = matches.get_one::<PathBuf>("db").map(PathBuf::as_path);

    let mut store = db::open_or_init(db_arg)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path(db_arg)?.display());
        }
        Some(("user", sub)) => commands::users::handle(&mut store, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut store, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut store, sub)?,
        Some(("bill", sub)) => commands::bills::handle(&mut store, sub)?,
        Some(("report", sub)) => {
            let config = Config::load(store.conn())?;
            commands::reports::handle(&store, &config, sub)?
        }
        Some(("tips", sub)) => {
            let config = Config::load(store.conn())?;
            commands::tips::handle(&store, &config, sub)?
        }
        Some(("import", sub)) => commands::importer::handle(&mut store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("config", sub)) => commands::settings::handle(store.conn(), sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&mut store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
