use crate::core::clock::{ClockHandle, Timer};
use crate::core::command::Command;
use std::time::Duration;

/// Finishes once `duration` has elapsed on the clock since it was
/// initialized. Runs while disabled.
pub struct WaitCommand {
    duration: Duration,
    timer: Timer,
}

impl WaitCommand {
    pub fn new(clock: ClockHandle, duration: Duration) -> Self {
        Self {
            duration,
            timer: Timer::new(clock),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Command for WaitCommand {
    fn initialize(&mut self) {
        self.timer.restart();
    }

    fn is_finished(&mut self) -> bool {
        self.timer.has_elapsed(self.duration)
    }

    fn end(&mut self, _interrupted: bool) {
        self.timer.stop();
    }

    fn runs_when_disabled(&self) -> bool {
        true
    }
}

/// Finishes the first time `condition` is true.
pub struct WaitUntilCommand {
    condition: Box<dyn FnMut() -> bool>,
}

impl WaitUntilCommand {
    pub fn new(condition: impl FnMut() -> bool + 'static) -> Self {
        Self {
            condition: Box::new(condition),
        }
    }

    /// Finishes once the clock reads at least `at`.
    pub fn until_time(clock: ClockHandle, at: Duration) -> Self {
        Self::new(move || clock.now() >= at)
    }
}

impl Command for WaitUntilCommand {
    fn is_finished(&mut self) -> bool {
        (self.condition)()
    }

    fn runs_when_disabled(&self) -> bool {
        true
    }
}
