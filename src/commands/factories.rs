//! Free functions for the common command shapes.
//!
//! ```ignore
//! use commandeer::commands::factories::{run, sequence, wait};
//! let auto = sequence(vec![
//!     Box::new(wait(clock.clone(), Duration::from_secs(1))),
//!     Box::new(run(move || drive.borrow_mut().arcade(0.5, 0.0), &[drive_id])),
//! ]);
//! ```

use crate::commands::basic::{InstantCommand, PrintCommand, RunCommand, RunEndCommand, StartEndCommand};
use crate::commands::conditional::{ConditionalCommand, DeferredCommand, SelectCommand};
use crate::commands::parallel::{ParallelCommandGroup, ParallelDeadlineGroup, ParallelRaceGroup};
use crate::commands::repeat::RepeatCommand;
use crate::commands::sequential::SequentialCommandGroup;
use crate::commands::wait::{WaitCommand, WaitUntilCommand};
use crate::core::clock::ClockHandle;
use crate::core::command::Command;
use crate::core::error::CommandeerError;
use crate::core::subsystem::SubsystemId;
use std::hash::Hash;
use std::time::Duration;

/// Does nothing and finishes at once.
pub fn none() -> InstantCommand {
    InstantCommand::new(|| {}, &[])
}

/// Holds `requirements` and does nothing until interrupted.
pub fn idle(requirements: &[SubsystemId]) -> RunCommand {
    RunCommand::new(|| {}, requirements)
}

pub fn run_once(action: impl FnMut() + 'static, requirements: &[SubsystemId]) -> InstantCommand {
    InstantCommand::new(action, requirements)
}

pub fn run(action: impl FnMut() + 'static, requirements: &[SubsystemId]) -> RunCommand {
    RunCommand::new(action, requirements)
}

pub fn start_end(
    start: impl FnMut() + 'static,
    end: impl FnMut() + 'static,
    requirements: &[SubsystemId],
) -> StartEndCommand {
    StartEndCommand::new(start, end, requirements)
}

pub fn run_end(
    run: impl FnMut() + 'static,
    end: impl FnMut() + 'static,
    requirements: &[SubsystemId],
) -> RunEndCommand {
    RunEndCommand::new(run, end, requirements)
}

pub fn print(message: impl Into<String>) -> PrintCommand {
    PrintCommand::new(message)
}

pub fn wait(clock: ClockHandle, duration: Duration) -> WaitCommand {
    WaitCommand::new(clock, duration)
}

pub fn wait_until(condition: impl FnMut() -> bool + 'static) -> WaitUntilCommand {
    WaitUntilCommand::new(condition)
}

pub fn either(
    on_true: Box<dyn Command>,
    on_false: Box<dyn Command>,
    condition: impl FnMut() -> bool + 'static,
) -> ConditionalCommand {
    ConditionalCommand::new(on_true, on_false, condition)
}

pub fn select<K: Eq + Hash + Clone + 'static>(
    commands: impl IntoIterator<Item = (K, Box<dyn Command>)>,
    selector: impl FnMut() -> K + 'static,
) -> SelectCommand<K> {
    SelectCommand::new(commands, selector)
}

pub fn defer(
    supplier: impl FnMut() -> Box<dyn Command> + 'static,
    requirements: &[SubsystemId],
) -> DeferredCommand {
    DeferredCommand::new(supplier, requirements)
}

pub fn sequence(commands: Vec<Box<dyn Command>>) -> SequentialCommandGroup {
    SequentialCommandGroup::new(commands)
}

pub fn parallel(commands: Vec<Box<dyn Command>>) -> Result<ParallelCommandGroup, CommandeerError> {
    ParallelCommandGroup::new(commands)
}

pub fn race(commands: Vec<Box<dyn Command>>) -> Result<ParallelRaceGroup, CommandeerError> {
    ParallelRaceGroup::new(commands)
}

pub fn deadline(
    deadline: Box<dyn Command>,
    others: Vec<Box<dyn Command>>,
) -> Result<ParallelDeadlineGroup, CommandeerError> {
    ParallelDeadlineGroup::new(deadline, others)
}

/// A sequence that starts over each time it completes.
pub fn repeating_sequence(commands: Vec<Box<dyn Command>>) -> RepeatCommand {
    RepeatCommand::new(Box::new(SequentialCommandGroup::new(commands)))
}
