//! The command library.
//!
//! - Leaf commands built from closures ([`InstantCommand`], [`RunCommand`],
//!   ...), timing ([`WaitCommand`]) and scheduler plumbing
//!   ([`ProxyCommand`], [`ScheduleCommand`]).
//! - Composites that own their children and forward the lifecycle:
//!   sequential, parallel, race, deadline, repeat, conditional and select.
//! - [`CommandExt`], the decorator methods available on every command.
//! - [`factories`], free functions for the common shapes.

mod basic;
mod conditional;
mod decorators;
pub mod factories;
mod parallel;
mod proxy;
mod repeat;
mod sequential;
mod wait;
mod wrapper;

pub use basic::{
    FunctionalCommand, InstantCommand, PrintCommand, RunCommand, RunEndCommand, StartEndCommand,
};
pub use conditional::{ConditionalCommand, DeferredCommand, SelectCommand};
pub use decorators::CommandExt;
pub use parallel::{ParallelCommandGroup, ParallelDeadlineGroup, ParallelRaceGroup};
pub use proxy::{ProxyCommand, ScheduleCommand};
pub use repeat::RepeatCommand;
pub use sequential::SequentialCommandGroup;
pub use wait::{WaitCommand, WaitUntilCommand};
pub use wrapper::WrapperCommand;

use crate::core::command::{Command, InterruptionBehavior, Requirements};
use crate::core::error::CommandeerError;

/// Attributes a composite derives from its children.
///
/// Requirements are the union. The group cancels itself on conflict if any
/// child would, and runs while disabled only if every child does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GroupTraits {
    pub requirements: Requirements,
    pub interruption: InterruptionBehavior,
    pub runs_when_disabled: bool,
}

impl GroupTraits {
    pub fn union<'a>(children: impl IntoIterator<Item = &'a dyn Command>) -> Self {
        let mut traits = GroupTraits {
            requirements: Requirements::new(),
            interruption: InterruptionBehavior::CancelIncoming,
            runs_when_disabled: true,
        };
        for child in children {
            traits.requirements.extend(child.requirements());
            if child.interruption_behavior() == InterruptionBehavior::CancelSelf {
                traits.interruption = InterruptionBehavior::CancelSelf;
            }
            traits.runs_when_disabled &= child.runs_when_disabled();
        }
        traits
    }

    /// Like [`union`](Self::union), but children running side by side may
    /// not share a requirement.
    pub fn disjoint(group: &str, children: &[Box<dyn Command>]) -> Result<Self, CommandeerError> {
        let mut seen = Requirements::new();
        for child in children {
            let requirements = child.requirements();
            if let Some(shared) = requirements.iter().find(|id| seen.contains(*id)) {
                return Err(CommandeerError::CompositionError(format!(
                    "{} child '{}' requires {} which an earlier child already requires",
                    group,
                    child.name(),
                    shared
                )));
            }
            seen.extend(requirements);
        }
        Ok(Self::union(children.iter().map(|child| child.as_ref())))
    }
}
