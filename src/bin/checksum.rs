//! `checksum`: command-line access to checksum-trailed files.

use anyhow::Context;
use checkstream::{concatenate, Input};
use clap::{Parser, Subcommand};
use std::io;

#[derive(Debug, Parser)]
#[command(name = "checksum", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
struct App {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Concatenate checksummed files to stdout under a single new checksum
    Cat(CatArg),
}

#[derive(Debug, clap::Args)]
struct CatArg {
    /// Files to concatenate; `-` reads standard input
    #[arg(value_name = "FILE")]
    files: Vec<Input>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match App::parse().cmd {
        Commands::Cat(arg) => run_cat(arg),
    }
}

fn run_cat(arg: CatArg) -> anyhow::Result<()> {
    let inputs = if arg.files.is_empty() {
        vec![Input::Stdin]
    } else {
        arg.files
    };

    let summary = concatenate(&inputs, io::stdout().lock()).context("cat failed")?;
    log::info!(
        "concatenated {} certified and {} uncertified inputs",
        summary.certified,
        summary.uncertified
    );
    Ok(())
}
