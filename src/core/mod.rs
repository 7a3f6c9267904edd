//! The scheduling core: commands, subsystems, the scheduler that drives
//! them, and the trigger layer that feeds it.
//!
//! Everything here is single-threaded. Shared state lives behind `Rc` and
//! `RefCell`, and the public handles (`Scheduler`, `CommandHandle`,
//! `EventLoop`, `Trigger`) are cheap to clone.

pub mod clock;
pub mod command;
pub mod config;
pub mod debounce;
pub mod error;
pub mod event_loop;
pub mod journal;
pub mod scheduler;
pub mod subsystem;
pub mod trigger;
pub mod watchdog;
