// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

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
    Command::new("khata")
        .version(crate_version!())
        .about("Khata: Nepali personal income/expense tracker with per-wallet balances")
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .default_value("default")
                .help("Owner scope; data is partitioned per user"),
        )
        .subcommand(Command::new("init").about("Create the database and default wallets"))
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record an income or expense")
                        .arg(Arg::new("kind").long("kind").required(true).help("Income|Expense"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Positive amount in NPR"),
                        )
                        .arg(
                            Arg::new("reason")
                                .long("reason")
                                .required(true)
                                .help("One of the fixed reasons (see `khata tx reasons`)"),
                        )
                        .arg(
                            Arg::new("payment")
                                .long("payment")
                                .required(true)
                                .help("Wallet name, e.g. CASH or ESEWA"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("Gregorian date, YYYY-MM-DD"),
                        )
                        .arg(
                            Arg::new("nepali-date")
                                .long("nepali-date")
                                .required(true)
                                .help("Bikram Sambat date, recorded verbatim"),
                        )
                        .arg(
                            Arg::new("day")
                                .long("day")
                                .help("Weekday label; derived from --date when omitted"),
                        )
                        .arg(Arg::new("notes").long("notes").help("Free-text notes")),
                )
                .subcommand(
                    json_flags(Command::new("list").about("List transactions, newest first"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize))
                                .help("Show at most N rows"),
                        ),
                )
                .subcommand(
                    json_flags(Command::new("get").about("Show one transaction"))
                        .arg(Arg::new("id").required(true).help("Transaction id")),
                )
                .subcommand(
                    Command::new("update")
                        .about("Change fields of a recorded transaction")
                        .arg(Arg::new("id").required(true).help("Transaction id"))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("reason").long("reason"))
                        .arg(Arg::new("payment").long("payment"))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("nepali-date").long("nepali-date"))
                        .arg(Arg::new("day").long("day"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction and revert its balance effect")
                        .arg(Arg::new("id").required(true).help("Transaction id")),
                )
                .subcommand(Command::new("reasons").about("List the fixed reason values")),
        )
        .subcommand(
            Command::new("wallet")
                .about("Inspect wallets and override balances")
                .subcommand(json_flags(Command::new("list").about("List wallets and balances")))
                .subcommand(
                    json_flags(Command::new("get").about("Show one wallet"))
                        .arg(Arg::new("name").required(true).help("Wallet name")),
                )
                .subcommand(
                    Command::new("set-balance")
                        .about("Manually override a wallet balance")
                        .arg(Arg::new("name").required(true).help("Wallet name"))
                        .arg(Arg::new("balance").required(true).help("New balance")),
                ),
        )
        .subcommand(json_flags(
            Command::new("summary").about("Total income, expense and balance"),
        ))
        .subcommand(
            Command::new("doctor")
                .about("Check cached wallet balances against transaction history"),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true).help("Output file")),
            ),
        )
}
