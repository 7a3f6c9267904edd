//! Loop-overrun detection for the scheduler tick.
//!
//! The tick is timed against the configured loop period. Named epochs mark
//! how long each phase took so an overrun report points at the culprit.

use crate::core::clock::ClockHandle;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Epoch {
    pub name: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoopReport {
    pub tick: u64,
    pub elapsed: Duration,
    pub period: Duration,
    pub overrun: bool,
    pub epochs: Vec<Epoch>,
}

impl LoopReport {
    /// One line per epoch, e.g. `  buttons.poll(): 0.120ms`.
    pub fn render_epochs(&self) -> String {
        self.epochs
            .iter()
            .map(|epoch| {
                format!(
                    "  {}: {:.3}ms",
                    epoch.name,
                    epoch.duration.as_secs_f64() * 1000.0
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct LoopTimer {
    clock: ClockHandle,
    period: Duration,
    started_at: Duration,
    last_mark: Duration,
    epochs: Vec<Epoch>,
}

impl LoopTimer {
    pub fn new(clock: ClockHandle, period: Duration) -> Self {
        let now = clock.now();
        Self {
            clock,
            period,
            started_at: now,
            last_mark: now,
            epochs: Vec::new(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn reset(&mut self) {
        let now = self.clock.now();
        self.started_at = now;
        self.last_mark = now;
        self.epochs.clear();
    }

    /// Record the time since the previous mark under `name`.
    pub fn add_epoch(&mut self, name: impl Into<String>) {
        let now = self.clock.now();
        self.epochs.push(Epoch {
            name: name.into(),
            duration: now.saturating_sub(self.last_mark),
        });
        self.last_mark = now;
    }

    pub fn finish(&mut self, tick: u64) -> LoopReport {
        let elapsed = self.clock.now().saturating_sub(self.started_at);
        LoopReport {
            tick,
            elapsed,
            period: self.period,
            overrun: elapsed > self.period,
            epochs: std::mem::take(&mut self.epochs),
        }
    }
}
