// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .required(true)
        .help("User the operation is scoped to")
}

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
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("billfold")
        .version(crate_version!())
        .about("Multi-account, multi-currency personal ledger")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .about("Create a user")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .required(true)
                                .help("Main currency for aggregate balances"),
                        ),
                )
                .subcommand(Command::new("list").about("List users")),
        )
        .subcommand(
            Command::new("currency")
                .about("Manage currencies")
                .subcommand(
                    Command::new("add")
                        .about("Add or update a currency")
                        .arg(Arg::new("code").required(true))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("symbol").long("symbol").required(true)),
                )
                .subcommand(Command::new("list").about("List currencies")),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .about("Create an account")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("currency").long("currency").required(true))
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .default_value("0")
                                .help("Initial deposit"),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List accounts").arg(user_arg()),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Edit account display metadata")
                        .arg(user_arg())
                        .arg(Arg::new("account").required(true))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(
                    Command::new("archive")
                        .about("Toggle the archived flag")
                        .arg(user_arg())
                        .arg(Arg::new("account").required(true)),
                )
                .subcommand(
                    Command::new("stats")
                        .about("Toggle inclusion in aggregate stats")
                        .arg(user_arg())
                        .arg(Arg::new("account").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete an account and its history")
                        .arg(user_arg())
                        .arg(Arg::new("account").required(true)),
                )
                .subcommand(
                    Command::new("balance")
                        .about("Total balance in the user's main currency")
                        .arg(user_arg()),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .about("Create a category")
                        .arg(user_arg())
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("group").long("group")),
                )
                .subcommand(
                    Command::new("list").about("List categories").arg(user_arg()),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a category")
                        .arg(user_arg())
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Post and query transactions")
                .subcommand(
                    Command::new("add")
                        .about("Post a transaction")
                        .arg(user_arg())
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("expense or income"),
                        )
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions with optional filters")
                        .arg(user_arg())
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("from").long("from").help("Earliest date, inclusive"))
                        .arg(Arg::new("to").long("to").help("Latest date, inclusive"))
                        .arg(Arg::new("min").long("min").help("Smallest signed amount"))
                        .arg(Arg::new("max").long("max").help("Largest signed amount")),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Edit a transaction")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("category").long("category").help("Category id"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(
                    Command::new("rm").about("Delete a transaction").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("transfer")
                .about("Move value between two accounts")
                .arg(user_arg())
                .arg(Arg::new("from").long("from").required(true))
                .arg(Arg::new("to").long("to").required(true))
                .arg(Arg::new("amount").long("amount").required(true)),
        )
        .subcommand(
            Command::new("recurring")
                .about("Manage recurring transactions")
                .subcommand(
                    Command::new("add")
                        .about("Create a recurring template")
                        .arg(user_arg())
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .required(true)
                                .help("daily, weekly, monthly, yearly or once"),
                        )
                        .arg(
                            Arg::new("start")
                                .long("start")
                                .help("Anchor date; not in the future posts immediately"),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List templates")
                        .arg(user_arg())
                        .arg(Arg::new("type").long("type")),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Edit a template")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("account").long("account").help("Account id"))
                        .arg(Arg::new("category").long("category").help("Category id"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("next").long("next").help("Next occurrence date"))
                        .arg(Arg::new("period").long("period")),
                )
                .subcommand(
                    Command::new("toggle").about("Flip the active flag").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("rm").about("Delete a template").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("run")
                        .about("Materialize everything due")
                        .arg(Arg::new("date").long("date").help("Reference date, default today")),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage category budgets")
                .subcommand(
                    Command::new("set")
                        .about("Open a budget for a category")
                        .arg(user_arg())
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("period").long("period").default_value("monthly"))
                        .arg(Arg::new("start").long("start").help("YYYY-MM-DD, default today")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List budgets").arg(user_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("report")
                        .about("Limit vs spent for open budgets")
                        .arg(user_arg()),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Change a budget's limit")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(
                    Command::new("close")
                        .about("Close budgets whose period has ended")
                        .arg(user_arg())
                        .arg(Arg::new("date").long("date").help("Reference date, default today")),
                )
                .subcommand(
                    Command::new("rm").about("Delete a budget").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("fx")
                .about("Currency exchange rates")
                .subcommand(
                    Command::new("add")
                        .about("Set one directional rate")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(Arg::new("rate").long("rate").required(true)),
                )
                .subcommand(Command::new("list").about("List stored rates"))
                .subcommand(
                    Command::new("fetch")
                        .about("Refresh rates for every known currency via Frankfurter"),
                )
                .subcommand(
                    Command::new("convert")
                        .about("Convert an amount through a stored rate")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Journal aggregation")
                .subcommand(json_flags(
                    Command::new("overview")
                        .about("Window totals vs the previous month")
                        .arg(user_arg())
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(Arg::new("type").long("type").default_value("expense")),
                ))
                .subcommand(json_flags(
                    Command::new("categories")
                        .about("Per-category totals in a window")
                        .arg(user_arg())
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(Arg::new("type").long("type").default_value("expense")),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Dump a user's journal")
                        .arg(user_arg())
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Consistency checks")
                .arg(user_arg()),
        )
}
