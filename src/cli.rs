//! CLI struct definitions for the `commandeer` binary.
//!
//! All clap-derived types live here. Dispatch lives in `lib.rs`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Config file read when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "commandeer.toml";

#[derive(Parser, Debug)]
#[clap(
    name = "commandeer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Cooperative command scheduler for robot control loops, with a scripted demo robot."
)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum CliCommand {
    /// Run the scripted demo robot on a simulated clock
    Simulate(SimulateCli),
    /// Print the effective scheduler configuration as TOML
    Config {
        /// Config file to read (defaults to ./commandeer.toml; missing means defaults).
        #[clap(long)]
        path: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
pub(crate) struct SimulateCli {
    /// Number of scheduler ticks to run.
    #[clap(long, default_value_t = crate::demo::DEFAULT_TICKS)]
    pub ticks: u64,
    /// Config file to read (defaults to ./commandeer.toml; missing means defaults).
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Append scheduler events to this JSONL file (overrides `journal.path`).
    #[clap(long)]
    pub journal: Option<PathBuf>,
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}
