//! Monotonic time sources.
//!
//! The scheduler never reads wall time directly. Everything time-based (the
//! loop watchdog, `WaitCommand`, timeouts, debouncing) goes through a
//! [`Clock`] injected at construction, so simulations and tests can drive
//! time by hand with [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A monotonic time source measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Shared clock handle passed to the scheduler and to time-aware commands.
pub type ClockHandle = Rc<dyn Clock>;

/// Clock backed by [`Instant`], with its origin at construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn handle() -> ClockHandle {
        Rc::new(Self::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for simulation and tests.
///
/// Cloning shares the same underlying time, so a test can keep one clone
/// and hand another to the scheduler.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }

    pub fn handle(&self) -> ClockHandle {
        Rc::new(self.clone())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Stopwatch over a [`Clock`], accumulating time across start/stop cycles.
pub struct Timer {
    clock: ClockHandle,
    started_at: Option<Duration>,
    accumulated: Duration,
}

impl Timer {
    pub fn new(clock: ClockHandle) -> Self {
        Self {
            clock,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }

    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(self.clock.now());
        }
    }

    pub fn stop(&mut self) {
        self.accumulated = self.elapsed();
        self.started_at = None;
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        if self.started_at.is_some() {
            self.started_at = Some(self.clock.now());
        }
    }

    /// Reset and start in one step.
    pub fn restart(&mut self) {
        self.accumulated = Duration::ZERO;
        self.started_at = Some(self.clock.now());
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(start) => self.accumulated + self.clock.now().saturating_sub(start),
            None => self.accumulated,
        }
    }

    pub fn has_elapsed(&self, period: Duration) -> bool {
        self.elapsed() >= period
    }
}
