// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .required(true)
        .help("User id, email or name")
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true).help("Record id")
}

fn month_arg() -> Arg {
    Arg::new("month").long("month").help("Month as YYYY-MM")
}

pub fn build_cli() -> Command {
    Command::new("ledgerloop")
        .version(crate_version!())
        .about("Personal finance tracker with recurring transactions and scheduled bills")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Database file (defaults to $LEDGERLOOP_DB or the platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email").default_value("")),
                )
                .subcommand(Command::new("guest").about("Create a guest user"))
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("type").long("type").required(true).help("income|expense")),
                )
                .subcommand(Command::new("list").arg(user_arg()))
                .subcommand(
                    Command::new("rm")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and change transactions")
                .subcommand(
                    Command::new("add")
                        .arg(user_arg())
                        .arg(Arg::new("type").long("type").required(true).help("income|expense"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(u32))
                                .help("Repeat monthly for this many months"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(user_arg())
                        .arg(month_arg())
                        .arg(Arg::new("search").long("search")),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("scope").long("scope").help("single|future|all")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(id_arg())
                        .arg(Arg::new("scope").long("scope").help("single|future|all")),
                ),
        )
        .subcommand(
            Command::new("bill")
                .about("Scheduled bills")
                .subcommand(
                    Command::new("add")
                        .arg(user_arg())
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("due_day")
                                .long("due-day")
                                .value_parser(value_parser!(u32))
                                .default_value("1"),
                        )
                        .arg(Arg::new("start").long("start").help("YYYY-MM-DD, defaults to today"))
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(u32))
                                .default_value("12"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(user_arg()).arg(month_arg()),
                ))
                .subcommand(Command::new("pay").arg(id_arg()))
                .subcommand(
                    Command::new("rename")
                        .arg(id_arg())
                        .arg(Arg::new("description").long("description").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(id_arg())
                        .arg(Arg::new("scope").long("scope").help("single|series")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Monthly summaries")
                .subcommand(json_flags(
                    Command::new("month")
                        .arg(user_arg())
                        .arg(month_arg().required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("upcoming").arg(user_arg()).arg(
                        Arg::new("days")
                            .long("days")
                            .value_parser(value_parser!(u32)),
                    ),
                )),
        )
        .subcommand(json_flags(
            Command::new("tips")
                .about("Savings tips for a month")
                .arg(user_arg())
                .arg(month_arg()),
        ))
        .subcommand(
            Command::new("export")
                .about("Export a user's data")
                .arg(user_arg())
                .arg(Arg::new("out").long("out").required(true))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("json")
                        .help("json|csv"),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import a JSON backup into a user")
                .arg(user_arg())
                .arg(Arg::new("path").long("path").required(true)),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check for broken series and references")
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Remove bill definitions that have no instances left"),
                ),
        )
}
