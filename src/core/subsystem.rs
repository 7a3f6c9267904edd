//! Subsystems and the resource registry.
//!
//! A subsystem is a long-lived owner of hardware or logical state. Commands
//! name the subsystems they need in their requirements; the registry records
//! which scheduled command currently holds each one and which default
//! command should take over when nothing does.

use crate::core::command::{CommandHandle, CommandId};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubsystemId(u64);

impl SubsystemId {
    /// Mint a fresh id. Registration does this for you; a bare id is useful
    /// for resources that have no periodic work.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SubsystemId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubsystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subsystem-{}", self.0)
    }
}

pub trait Subsystem {
    fn name(&self) -> String {
        crate::core::command::short_type_name(std::any::type_name::<Self>())
    }

    /// Called once per scheduler tick, before triggers are polled.
    fn periodic(&mut self) {}

    /// Called after `periodic` when the scheduler runs in simulation mode.
    fn simulation_periodic(&mut self) {}
}

pub type SubsystemRef = Rc<RefCell<dyn Subsystem>>;

pub(crate) struct SubsystemEntry {
    pub name: String,
    pub subsystem: Option<SubsystemRef>,
    pub default_command: Option<CommandHandle>,
}

/// Claim table plus per-subsystem defaults.
///
/// Invariant: every claim points at a scheduled command that lists the
/// claimed subsystem in its requirements, and no subsystem is claimed twice.
#[derive(Default)]
pub(crate) struct SubsystemRegistry {
    entries: IndexMap<SubsystemId, SubsystemEntry, FxBuildHasher>,
    claims: FxHashMap<SubsystemId, CommandHandle>,
}

impl SubsystemRegistry {
    pub fn register(&mut self, id: SubsystemId, name: String, subsystem: Option<SubsystemRef>) {
        self.entries.insert(
            id,
            SubsystemEntry {
                name,
                subsystem,
                default_command: None,
            },
        );
    }

    pub fn unregister(&mut self, id: SubsystemId) -> Option<SubsystemEntry> {
        self.entries.shift_remove(&id)
    }

    pub fn contains(&self, id: SubsystemId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn entry_mut(&mut self, id: SubsystemId) -> Option<&mut SubsystemEntry> {
        self.entries.get_mut(&id)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&SubsystemId, &SubsystemEntry)> {
        self.entries.iter()
    }

    pub fn name_of(&self, id: SubsystemId) -> String {
        self.entries
            .get(&id)
            .map(|entry| entry.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn default_command(&self, id: SubsystemId) -> Option<CommandHandle> {
        self.entries
            .get(&id)
            .and_then(|entry| entry.default_command.clone())
    }

    pub fn periodic_targets(&self) -> Vec<SubsystemRef> {
        self.entries
            .values()
            .filter_map(|entry| entry.subsystem.clone())
            .collect()
    }

    /// Registered subsystems that nothing holds and that have a default.
    pub fn idle_defaults(&self) -> Vec<CommandHandle> {
        self.entries
            .iter()
            .filter(|(id, _)| !self.claims.contains_key(*id))
            .filter_map(|(_, entry)| entry.default_command.clone())
            .collect()
    }

    pub fn holder(&self, id: SubsystemId) -> Option<CommandHandle> {
        self.claims.get(&id).cloned()
    }

    /// Distinct commands currently holding any of `command`'s requirements.
    pub fn conflicts_with(&self, command: &CommandHandle) -> Vec<CommandHandle> {
        let mut holders: Vec<CommandHandle> = Vec::new();
        for requirement in command.requirements() {
            if let Some(holder) = self.claims.get(requirement) {
                if holder != command && !holders.contains(holder) {
                    holders.push(holder.clone());
                }
            }
        }
        holders
    }

    pub fn claim(&mut self, command: &CommandHandle) {
        for requirement in command.requirements() {
            self.claims.insert(*requirement, command.clone());
        }
    }

    pub fn release(&mut self, command: &CommandHandle) {
        for requirement in command.requirements() {
            if self.claims.get(requirement).map(CommandHandle::id) == Some(command.id()) {
                self.claims.remove(requirement);
            }
        }
    }

    pub fn claimed_by(&self, id: CommandId) -> Vec<SubsystemId> {
        let mut claimed: Vec<SubsystemId> = self
            .claims
            .iter()
            .filter(|(_, holder)| holder.id() == id)
            .map(|(subsystem, _)| *subsystem)
            .collect();
        claimed.sort();
        claimed
    }
}
