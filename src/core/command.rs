//! The command contract and the shared handle the scheduler tracks.
//!
//! A [`Command`] is a unit of cooperative work: `initialize` once, `execute`
//! every tick, `is_finished` polled right after each `execute`, and `end`
//! exactly once per successful `initialize`. Composite commands own their
//! children as `Box<dyn Command>` and forward these calls.
//!
//! The scheduler, triggers and proxies refer to commands through a
//! [`CommandHandle`], which gives a command its identity. Two handles are
//! the same command only if one is a clone of the other.

use crate::core::error::CommandeerError;
use crate::core::subsystem::SubsystemId;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Set of subsystems a command claims while it is scheduled.
pub type Requirements = BTreeSet<SubsystemId>;

/// What happens when another command needs a subsystem this one holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterruptionBehavior {
    /// The running command is interrupted and the incoming one proceeds.
    #[default]
    CancelSelf,
    /// The incoming schedule request is dropped.
    CancelIncoming,
}

impl InterruptionBehavior {
    pub fn as_str(&self) -> &str {
        match self {
            InterruptionBehavior::CancelSelf => "cancel_self",
            InterruptionBehavior::CancelIncoming => "cancel_incoming",
        }
    }
}

pub trait Command {
    fn initialize(&mut self) {}

    /// Called once per tick while scheduled. Must not block.
    fn execute(&mut self) {}

    /// Polled after every `execute`. Commands that never finish on their
    /// own must be canceled or composed with something that does.
    fn is_finished(&mut self) -> bool {
        false
    }

    fn end(&mut self, _interrupted: bool) {}

    /// Fixed for the lifetime of the command.
    fn requirements(&self) -> Requirements {
        Requirements::new()
    }

    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        InterruptionBehavior::CancelSelf
    }

    fn runs_when_disabled(&self) -> bool {
        false
    }
}

impl Command for Box<dyn Command> {
    fn initialize(&mut self) {
        (**self).initialize()
    }

    fn execute(&mut self) {
        (**self).execute()
    }

    fn is_finished(&mut self) -> bool {
        (**self).is_finished()
    }

    fn end(&mut self, interrupted: bool) {
        (**self).end(interrupted)
    }

    fn requirements(&self) -> Requirements {
        (**self).requirements()
    }

    fn name(&self) -> String {
        (**self).name()
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        (**self).interruption_behavior()
    }

    fn runs_when_disabled(&self) -> bool {
        (**self).runs_when_disabled()
    }
}

/// `a::b::Thing<c::D>` -> `Thing`
pub(crate) fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// Process-unique command identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommandId(u64);

impl CommandId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        CommandId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmd-{}", self.0)
    }
}

struct CommandSlot {
    id: CommandId,
    name: String,
    requirements: Requirements,
    interruption: InterruptionBehavior,
    runs_when_disabled: bool,
    single_use: bool,
    consumed: Cell<bool>,
    command: RefCell<Box<dyn Command>>,
}

/// Shared, identity-bearing reference to a schedulable command.
///
/// The static attributes (name, requirements, interruption behavior,
/// disabled policy) are read once when the handle is created.
#[derive(Clone)]
pub struct CommandHandle(Rc<CommandSlot>);

impl CommandHandle {
    pub fn new(command: impl Command + 'static) -> Self {
        Self::build(Box::new(command), false)
    }

    /// A handle that may run once. Scheduling it again after it ended is a
    /// [`CommandeerError::CommandConsumed`] error.
    pub fn single_use(command: impl Command + 'static) -> Self {
        Self::build(Box::new(command), true)
    }

    pub fn from_boxed(command: Box<dyn Command>) -> Self {
        Self::build(command, false)
    }

    fn build(command: Box<dyn Command>, single_use: bool) -> Self {
        CommandHandle(Rc::new(CommandSlot {
            id: CommandId::next(),
            name: command.name(),
            requirements: command.requirements(),
            interruption: command.interruption_behavior(),
            runs_when_disabled: command.runs_when_disabled(),
            single_use,
            consumed: Cell::new(false),
            command: RefCell::new(command),
        }))
    }

    pub fn id(&self) -> CommandId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn requirements(&self) -> &Requirements {
        &self.0.requirements
    }

    pub fn has_requirement(&self, subsystem: SubsystemId) -> bool {
        self.0.requirements.contains(&subsystem)
    }

    pub fn interruption_behavior(&self) -> InterruptionBehavior {
        self.0.interruption
    }

    pub fn runs_when_disabled(&self) -> bool {
        self.0.runs_when_disabled
    }

    pub fn is_single_use(&self) -> bool {
        self.0.single_use
    }

    pub fn is_consumed(&self) -> bool {
        self.0.consumed.get()
    }

    pub(crate) fn mark_ended(&self) {
        if self.0.single_use {
            self.0.consumed.set(true);
        }
    }

    /// True while one of the command's own callbacks is on the stack.
    pub(crate) fn is_busy(&self) -> bool {
        self.0.command.try_borrow_mut().is_err()
    }

    pub(crate) fn with_command<R>(
        &self,
        f: impl FnOnce(&mut dyn Command) -> R,
    ) -> Result<R, CommandeerError> {
        let mut command = self
            .0
            .command
            .try_borrow_mut()
            .map_err(|_| CommandeerError::ReentrantCommand(self.0.name.clone()))?;
        Ok(f(&mut **command))
    }
}

impl PartialEq for CommandHandle {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for CommandHandle {}

impl Hash for CommandHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for CommandHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHandle")
            .field("id", &self.0.id)
            .field("name", &self.0.name)
            .field("requirements", &self.0.requirements)
            .finish()
    }
}
