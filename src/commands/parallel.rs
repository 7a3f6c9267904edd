//! Groups whose children run side by side within each tick.
//!
//! Children are stepped in the order given. A child that finishes is ended
//! with `end(false)` right away and is not stepped again until the group is
//! rescheduled. Construction fails if two children share a requirement.

use crate::commands::GroupTraits;
use crate::core::command::{Command, InterruptionBehavior, Requirements};
use crate::core::error::CommandeerError;

struct Child {
    command: Box<dyn Command>,
    running: bool,
}

fn children(commands: Vec<Box<dyn Command>>) -> Vec<Child> {
    commands
        .into_iter()
        .map(|command| Child {
            command,
            running: false,
        })
        .collect()
}

macro_rules! group_traits {
    () => {
        fn requirements(&self) -> Requirements {
            self.traits.requirements.clone()
        }

        fn interruption_behavior(&self) -> InterruptionBehavior {
            self.traits.interruption
        }

        fn runs_when_disabled(&self) -> bool {
            self.traits.runs_when_disabled
        }
    };
}

/// Finishes when every child has finished.
pub struct ParallelCommandGroup {
    children: Vec<Child>,
    traits: GroupTraits,
}

impl ParallelCommandGroup {
    pub fn new(commands: Vec<Box<dyn Command>>) -> Result<Self, CommandeerError> {
        let traits = GroupTraits::disjoint("ParallelCommandGroup", &commands)?;
        Ok(Self {
            children: children(commands),
            traits,
        })
    }
}

impl Command for ParallelCommandGroup {
    fn initialize(&mut self) {
        for child in &mut self.children {
            child.command.initialize();
            child.running = true;
        }
    }

    fn execute(&mut self) {
        for child in self.children.iter_mut().filter(|child| child.running) {
            child.command.execute();
            if child.command.is_finished() {
                child.command.end(false);
                child.running = false;
            }
        }
    }

    fn is_finished(&mut self) -> bool {
        !self.children.iter().any(|child| child.running)
    }

    fn end(&mut self, interrupted: bool) {
        for child in self.children.iter_mut().filter(|child| child.running) {
            child.command.end(interrupted);
            child.running = false;
        }
    }

    group_traits!();
}

/// Finishes as soon as any child finishes. In that tick every child that
/// finished gets `end(false)` and every other child `end(true)`.
pub struct ParallelRaceGroup {
    children: Vec<Box<dyn Command>>,
    running: bool,
    traits: GroupTraits,
}

impl ParallelRaceGroup {
    pub fn new(commands: Vec<Box<dyn Command>>) -> Result<Self, CommandeerError> {
        let traits = GroupTraits::disjoint("ParallelRaceGroup", &commands)?;
        Ok(Self::with_traits(commands, traits))
    }

    /// For decorators pairing a command with a requirement-free watcher.
    pub(crate) fn unchecked(commands: Vec<Box<dyn Command>>) -> Self {
        let traits = GroupTraits::union(commands.iter().map(|c| c.as_ref()));
        Self::with_traits(commands, traits)
    }

    fn with_traits(children: Vec<Box<dyn Command>>, traits: GroupTraits) -> Self {
        Self {
            children,
            running: false,
            traits,
        }
    }
}

impl Command for ParallelRaceGroup {
    fn initialize(&mut self) {
        for child in &mut self.children {
            child.initialize();
        }
        self.running = true;
    }

    fn execute(&mut self) {
        if !self.running {
            return;
        }
        let mut finished = Vec::with_capacity(self.children.len());
        for child in &mut self.children {
            child.execute();
            finished.push(child.is_finished());
        }
        if finished.iter().any(|done| *done) {
            for (child, done) in self.children.iter_mut().zip(finished) {
                child.end(!done);
            }
            self.running = false;
        }
    }

    fn is_finished(&mut self) -> bool {
        !self.running
    }

    fn end(&mut self, interrupted: bool) {
        if self.running {
            for child in &mut self.children {
                child.end(interrupted);
            }
            self.running = false;
        }
    }

    group_traits!();
}

/// Runs until its first child, the deadline, finishes. Children still
/// running at that point are interrupted.
pub struct ParallelDeadlineGroup {
    children: Vec<Child>,
    deadline_done: bool,
    traits: GroupTraits,
}

impl ParallelDeadlineGroup {
    pub fn new(
        deadline: Box<dyn Command>,
        others: Vec<Box<dyn Command>>,
    ) -> Result<Self, CommandeerError> {
        let mut commands = Vec::with_capacity(others.len() + 1);
        commands.push(deadline);
        commands.extend(others);
        let traits = GroupTraits::disjoint("ParallelDeadlineGroup", &commands)?;
        Ok(Self {
            children: children(commands),
            deadline_done: false,
            traits,
        })
    }
}

impl Command for ParallelDeadlineGroup {
    fn initialize(&mut self) {
        for child in &mut self.children {
            child.command.initialize();
            child.running = true;
        }
        self.deadline_done = false;
    }

    fn execute(&mut self) {
        for (index, child) in self.children.iter_mut().enumerate() {
            if !child.running {
                continue;
            }
            child.command.execute();
            if child.command.is_finished() {
                child.command.end(false);
                child.running = false;
                if index == 0 {
                    self.deadline_done = true;
                }
            }
        }
    }

    fn is_finished(&mut self) -> bool {
        self.deadline_done
    }

    fn end(&mut self, _interrupted: bool) {
        for child in self.children.iter_mut().filter(|child| child.running) {
            child.command.end(true);
            child.running = false;
        }
    }

    group_traits!();
}
