use crate::commands::GroupTraits;
use crate::core::command::{Command, InterruptionBehavior, Requirements};

/// Runs its children one after another.
///
/// When a child finishes, the next one is initialized in the same tick.
/// Rescheduling the group starts again from the first child.
pub struct SequentialCommandGroup {
    commands: Vec<Box<dyn Command>>,
    current: Option<usize>,
    traits: GroupTraits,
}

impl SequentialCommandGroup {
    pub fn new(commands: Vec<Box<dyn Command>>) -> Self {
        let traits = GroupTraits::union(commands.iter().map(|c| c.as_ref()));
        Self {
            commands,
            current: None,
            traits,
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Command for SequentialCommandGroup {
    fn initialize(&mut self) {
        self.current = Some(0);
        if let Some(first) = self.commands.first_mut() {
            first.initialize();
        }
    }

    fn execute(&mut self) {
        let Some(index) = self.current else {
            return;
        };
        let Some(child) = self.commands.get_mut(index) else {
            return;
        };
        child.execute();
        if child.is_finished() {
            child.end(false);
            let next = index + 1;
            self.current = Some(next);
            if let Some(next) = self.commands.get_mut(next) {
                next.initialize();
            }
        }
    }

    fn is_finished(&mut self) -> bool {
        self.current == Some(self.commands.len())
    }

    fn end(&mut self, interrupted: bool) {
        if interrupted {
            if let Some(child) = self.current.and_then(|index| self.commands.get_mut(index)) {
                child.end(true);
            }
        }
        self.current = None;
    }

    fn requirements(&self) -> Requirements {
        self.traits.requirements.clone()
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        self.traits.interruption
    }

    fn runs_when_disabled(&self) -> bool {
        self.traits.runs_when_disabled
    }
}
