//! Commandeer: a cooperative command scheduler for robot control loops.
//!
//! Robot behavior is written as [`Command`](crate::core::command::Command)s: small
//! state machines that are initialized once, executed once per tick, and
//! ended exactly once. Commands claim [`Subsystem`](crate::core::subsystem::Subsystem)s
//! while they run; the [`Scheduler`](crate::core::scheduler::Scheduler) guarantees
//! that no subsystem is held by two commands and resolves conflicts by each
//! command's interruption behavior.
//!
//! # Architecture
//!
//! - The robot main loop calls `Scheduler::run()` once per period (20 ms by
//!   default). Each tick runs subsystem periodic hooks, polls the button
//!   loop, steps every scheduled command, then fills idle subsystems with
//!   their default commands.
//! - [`Trigger`](crate::core::trigger::Trigger)s turn boolean conditions into
//!   scheduling actions on edges (`on_true`, `while_true`, `toggle_on_true`, ...).
//! - Composites in [`commands`] own their children and forward the
//!   lifecycle, so sequences, races and deadlines nest freely.
//! - Every lifecycle transition is a `SchedulerEvent`, delivered to
//!   listeners and optionally journaled as JSON lines.
//!
//! Everything is single-threaded. A command must never block.
//!
//! # Examples
//!
//! ```bash
//! # Run the scripted demo robot for 300 ticks
//! commandeer simulate
//!
//! # Same run, journaled, with a JSON summary
//! commandeer simulate --journal logs/scheduler.events.jsonl --format json
//!
//! # Show the effective configuration
//! commandeer config --path commandeer.toml
//! ```
//!
//! # Crate Structure
//!
//! - [`core`](crate::core): scheduler, command contract, subsystems, triggers, journal, config
//! - [`commands`]: leaf commands, composites, decorators and factories

pub mod commands;
pub mod core;

mod cli;
mod demo;

use crate::cli::{Cli, CliCommand, DEFAULT_CONFIG_FILE, SimulateCli};
use crate::core::config::load_config;
use crate::core::error::CommandeerError;
use crate::demo::DemoRobot;
use clap::Parser;
use std::path::PathBuf;

pub fn run() -> Result<(), CommandeerError> {
    let cli = Cli::parse();

    match cli.command {
        CliCommand::Simulate(args) => run_simulate(args),
        CliCommand::Config { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            let config = load_config(&path)?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn run_simulate(args: SimulateCli) -> Result<(), CommandeerError> {
    let path = args
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = load_config(&path)?;
    if let Some(journal) = args.journal {
        config.journal.path = Some(journal);
    }

    tracing::debug!(ticks = args.ticks, period_ms = config.loop_period_ms, "starting simulation");
    let mut robot = DemoRobot::new(config)?;
    let report = robot.run_for(args.ticks)?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", demo::render_text(&report, &robot.recent_events()));
    }
    Ok(())
}
