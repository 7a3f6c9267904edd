use crate::core::command::{Command, InterruptionBehavior, Requirements};

/// Restarts its child every time the child finishes. Never finishes on its
/// own. The restart happens at the start of the next tick.
pub struct RepeatCommand {
    command: Box<dyn Command>,
    ended: bool,
}

impl RepeatCommand {
    pub fn new(command: Box<dyn Command>) -> Self {
        Self {
            command,
            ended: true,
        }
    }
}

impl Command for RepeatCommand {
    fn initialize(&mut self) {
        self.ended = false;
        self.command.initialize();
    }

    fn execute(&mut self) {
        if self.ended {
            self.ended = false;
            self.command.initialize();
        }
        self.command.execute();
        if self.command.is_finished() {
            self.command.end(false);
            self.ended = true;
        }
    }

    fn end(&mut self, interrupted: bool) {
        if !self.ended {
            self.command.end(interrupted);
            self.ended = true;
        }
    }

    fn requirements(&self) -> Requirements {
        self.command.requirements()
    }

    fn name(&self) -> String {
        format!("Repeat({})", self.command.name())
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        self.command.interruption_behavior()
    }

    fn runs_when_disabled(&self) -> bool {
        self.command.runs_when_disabled()
    }
}
