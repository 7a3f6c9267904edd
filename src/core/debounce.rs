use crate::core::clock::ClockHandle;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which transitions must hold steady before they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebounceKind {
    Rising,
    Falling,
    Both,
}

/// Filters a boolean signal so a change is only reported once the new value
/// has been observed continuously for `period`.
pub struct Debouncer {
    clock: ClockHandle,
    period: Duration,
    kind: DebounceKind,
    baseline: bool,
    changed_at: Duration,
}

impl Debouncer {
    pub fn new(clock: ClockHandle, period: Duration, kind: DebounceKind) -> Self {
        let changed_at = clock.now();
        Self {
            clock,
            period,
            kind,
            baseline: kind == DebounceKind::Falling,
            changed_at,
        }
    }

    pub fn calculate(&mut self, input: bool) -> bool {
        let now = self.clock.now();
        if input == self.baseline {
            self.changed_at = now;
        }
        if now.saturating_sub(self.changed_at) >= self.period {
            if self.kind == DebounceKind::Both {
                self.baseline = input;
                self.changed_at = now;
            }
            input
        } else {
            self.baseline
        }
    }
}
