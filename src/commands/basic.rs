//! Leaf commands built from closures.

use crate::core::command::{Command, Requirements};
use crate::core::subsystem::SubsystemId;

fn requirement_set(requirements: &[SubsystemId]) -> Requirements {
    requirements.iter().copied().collect()
}

/// Command assembled from four closures, one per lifecycle phase.
pub struct FunctionalCommand {
    on_init: Box<dyn FnMut()>,
    on_execute: Box<dyn FnMut()>,
    on_end: Box<dyn FnMut(bool)>,
    is_finished: Box<dyn FnMut() -> bool>,
    requirements: Requirements,
}

impl FunctionalCommand {
    pub fn new(
        on_init: impl FnMut() + 'static,
        on_execute: impl FnMut() + 'static,
        on_end: impl FnMut(bool) + 'static,
        is_finished: impl FnMut() -> bool + 'static,
        requirements: &[SubsystemId],
    ) -> Self {
        Self {
            on_init: Box::new(on_init),
            on_execute: Box::new(on_execute),
            on_end: Box::new(on_end),
            is_finished: Box::new(is_finished),
            requirements: requirement_set(requirements),
        }
    }
}

impl Command for FunctionalCommand {
    fn initialize(&mut self) {
        (self.on_init)()
    }

    fn execute(&mut self) {
        (self.on_execute)()
    }

    fn is_finished(&mut self) -> bool {
        (self.is_finished)()
    }

    fn end(&mut self, interrupted: bool) {
        (self.on_end)(interrupted)
    }

    fn requirements(&self) -> Requirements {
        self.requirements.clone()
    }
}

/// Runs its action once in `initialize` and finishes immediately.
pub struct InstantCommand {
    action: Box<dyn FnMut()>,
    requirements: Requirements,
}

impl InstantCommand {
    pub fn new(action: impl FnMut() + 'static, requirements: &[SubsystemId]) -> Self {
        Self {
            action: Box::new(action),
            requirements: requirement_set(requirements),
        }
    }
}

impl Command for InstantCommand {
    fn initialize(&mut self) {
        (self.action)()
    }

    fn is_finished(&mut self) -> bool {
        true
    }

    fn requirements(&self) -> Requirements {
        self.requirements.clone()
    }
}

/// Runs its action every tick until interrupted.
pub struct RunCommand {
    action: Box<dyn FnMut()>,
    requirements: Requirements,
}

impl RunCommand {
    pub fn new(action: impl FnMut() + 'static, requirements: &[SubsystemId]) -> Self {
        Self {
            action: Box::new(action),
            requirements: requirement_set(requirements),
        }
    }
}

impl Command for RunCommand {
    fn execute(&mut self) {
        (self.action)()
    }

    fn requirements(&self) -> Requirements {
        self.requirements.clone()
    }
}

/// Calls `on_start` when initialized and `on_end` when ended. Never finishes
/// on its own.
pub struct StartEndCommand {
    on_start: Box<dyn FnMut()>,
    on_end: Box<dyn FnMut()>,
    requirements: Requirements,
}

impl StartEndCommand {
    pub fn new(
        on_start: impl FnMut() + 'static,
        on_end: impl FnMut() + 'static,
        requirements: &[SubsystemId],
    ) -> Self {
        Self {
            on_start: Box::new(on_start),
            on_end: Box::new(on_end),
            requirements: requirement_set(requirements),
        }
    }
}

impl Command for StartEndCommand {
    fn initialize(&mut self) {
        (self.on_start)()
    }

    fn end(&mut self, _interrupted: bool) {
        (self.on_end)()
    }

    fn requirements(&self) -> Requirements {
        self.requirements.clone()
    }
}

/// Calls `run` every tick and `on_end` when ended.
pub struct RunEndCommand {
    run: Box<dyn FnMut()>,
    on_end: Box<dyn FnMut()>,
    requirements: Requirements,
}

impl RunEndCommand {
    pub fn new(
        run: impl FnMut() + 'static,
        on_end: impl FnMut() + 'static,
        requirements: &[SubsystemId],
    ) -> Self {
        Self {
            run: Box::new(run),
            on_end: Box::new(on_end),
            requirements: requirement_set(requirements),
        }
    }
}

impl Command for RunEndCommand {
    fn execute(&mut self) {
        (self.run)()
    }

    fn end(&mut self, _interrupted: bool) {
        (self.on_end)()
    }

    fn requirements(&self) -> Requirements {
        self.requirements.clone()
    }
}

/// Logs a message at info level and finishes. Runs while disabled.
pub struct PrintCommand {
    message: String,
}

impl PrintCommand {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Command for PrintCommand {
    fn initialize(&mut self) {
        tracing::info!(target: "commandeer::print", "{}", self.message);
    }

    fn is_finished(&mut self) -> bool {
        true
    }

    fn runs_when_disabled(&self) -> bool {
        true
    }
}
