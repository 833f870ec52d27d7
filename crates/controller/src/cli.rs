// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[clap(name = "muster-controller")]
pub struct Args {
    #[clap(
        short,
        long,
        default_value = "config.toml",
        value_name = "FILE",
        help = "Specify path to configuration file"
    )]
    pub config: std::path::PathBuf,

    #[clap(
        long,
        help = "Apply the database migrations and exit without starting the HTTP server"
    )]
    pub migrate_only: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}
