//! Groups2BuildingInstructions CLI: building instructions from LXFML groups.
//!
//! Reads the group hierarchy of an LXFML model and writes it back as a
//! numbered building guide.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
