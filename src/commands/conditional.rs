//! Commands that decide what to run at initialization time.

use crate::commands::GroupTraits;
use crate::core::command::{Command, InterruptionBehavior, Requirements};
use crate::core::subsystem::SubsystemId;
use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Runs `on_true` or `on_false` depending on `condition` at initialization.
/// Requires the subsystems of both branches.
pub struct ConditionalCommand {
    on_true: Box<dyn Command>,
    on_false: Box<dyn Command>,
    condition: Box<dyn FnMut() -> bool>,
    selected: Option<bool>,
    traits: GroupTraits,
}

impl ConditionalCommand {
    pub fn new(
        on_true: Box<dyn Command>,
        on_false: Box<dyn Command>,
        condition: impl FnMut() -> bool + 'static,
    ) -> Self {
        let traits = GroupTraits::union([on_true.as_ref(), on_false.as_ref()]);
        Self {
            on_true,
            on_false,
            condition: Box::new(condition),
            selected: None,
            traits,
        }
    }

    fn branch(&mut self) -> Option<&mut Box<dyn Command>> {
        match self.selected? {
            true => Some(&mut self.on_true),
            false => Some(&mut self.on_false),
        }
    }
}

impl Command for ConditionalCommand {
    fn initialize(&mut self) {
        self.selected = Some((self.condition)());
        if let Some(branch) = self.branch() {
            branch.initialize();
        }
    }

    fn execute(&mut self) {
        if let Some(branch) = self.branch() {
            branch.execute();
        }
    }

    fn is_finished(&mut self) -> bool {
        self.branch().is_none_or(|branch| branch.is_finished())
    }

    fn end(&mut self, interrupted: bool) {
        if let Some(branch) = self.branch() {
            branch.end(interrupted);
        }
        self.selected = None;
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

/// Picks one of several commands by key when initialized. A key with no
/// command is logged and the select finishes at once.
pub struct SelectCommand<K> {
    commands: FxHashMap<K, Box<dyn Command>>,
    selector: Box<dyn FnMut() -> K>,
    selected: Option<K>,
    traits: GroupTraits,
}

impl<K: Eq + Hash + Clone + 'static> SelectCommand<K> {
    pub fn new(
        commands: impl IntoIterator<Item = (K, Box<dyn Command>)>,
        selector: impl FnMut() -> K + 'static,
    ) -> Self {
        let commands: FxHashMap<K, Box<dyn Command>> = commands.into_iter().collect();
        let traits = GroupTraits::union(commands.values().map(|c| c.as_ref()));
        Self {
            commands,
            selector: Box::new(selector),
            selected: None,
            traits,
        }
    }

    fn branch(&mut self) -> Option<&mut Box<dyn Command>> {
        let key = self.selected.as_ref()?;
        self.commands.get_mut(key)
    }
}

impl<K: Eq + Hash + Clone + 'static> Command for SelectCommand<K> {
    fn initialize(&mut self) {
        let key = (self.selector)();
        if !self.commands.contains_key(&key) {
            tracing::warn!("select key does not correspond to any command");
        }
        self.selected = Some(key);
        if let Some(branch) = self.branch() {
            branch.initialize();
        }
    }

    fn execute(&mut self) {
        if let Some(branch) = self.branch() {
            branch.execute();
        }
    }

    fn is_finished(&mut self) -> bool {
        self.branch().is_none_or(|branch| branch.is_finished())
    }

    fn end(&mut self, interrupted: bool) {
        if let Some(branch) = self.branch() {
            branch.end(interrupted);
        }
        self.selected = None;
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

/// Builds a fresh command from `supplier` every time it is initialized.
///
/// The requirements are declared up front because the scheduler reads them
/// before the command exists.
pub struct DeferredCommand {
    supplier: Box<dyn FnMut() -> Box<dyn Command>>,
    requirements: Requirements,
    current: Option<Box<dyn Command>>,
}

impl DeferredCommand {
    pub fn new(
        supplier: impl FnMut() -> Box<dyn Command> + 'static,
        requirements: &[SubsystemId],
    ) -> Self {
        Self {
            supplier: Box::new(supplier),
            requirements: requirements.iter().copied().collect(),
            current: None,
        }
    }
}

impl Command for DeferredCommand {
    fn initialize(&mut self) {
        let mut command = (self.supplier)();
        command.initialize();
        self.current = Some(command);
    }

    fn execute(&mut self) {
        if let Some(command) = &mut self.current {
            command.execute();
        }
    }

    fn is_finished(&mut self) -> bool {
        self.current
            .as_mut()
            .is_none_or(|command| command.is_finished())
    }

    fn end(&mut self, interrupted: bool) {
        if let Some(mut command) = self.current.take() {
            command.end(interrupted);
        }
    }

    fn requirements(&self) -> Requirements {
        self.requirements.clone()
    }
}
