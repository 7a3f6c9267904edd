use crate::commands::basic::InstantCommand;
use crate::commands::conditional::ConditionalCommand;
use crate::commands::parallel::{ParallelCommandGroup, ParallelDeadlineGroup, ParallelRaceGroup};
use crate::commands::proxy::ProxyCommand;
use crate::commands::repeat::RepeatCommand;
use crate::commands::sequential::SequentialCommandGroup;
use crate::commands::wait::{WaitCommand, WaitUntilCommand};
use crate::commands::wrapper::WrapperCommand;
use crate::core::clock::ClockHandle;
use crate::core::command::{Command, CommandHandle, InterruptionBehavior};
use crate::core::error::CommandeerError;
use crate::core::scheduler::Scheduler;
use std::time::Duration;

/// Decorator methods for every command. Each consumes the command and
/// returns a new one that owns it.
pub trait CommandExt: Command + Sized + 'static {
    fn boxed(self) -> Box<dyn Command> {
        Box::new(self)
    }

    fn into_handle(self) -> CommandHandle {
        CommandHandle::new(self)
    }

    /// Interrupt the command once `timeout` has passed on `clock`.
    fn with_timeout(self, clock: ClockHandle, timeout: Duration) -> ParallelRaceGroup {
        ParallelRaceGroup::unchecked(vec![
            self.boxed(),
            Box::new(WaitCommand::new(clock, timeout)),
        ])
    }

    /// Interrupt the command the first tick `condition` is true.
    fn until(self, condition: impl FnMut() -> bool + 'static) -> ParallelRaceGroup {
        ParallelRaceGroup::unchecked(vec![
            self.boxed(),
            Box::new(WaitUntilCommand::new(condition)),
        ])
    }

    fn only_while(self, mut condition: impl FnMut() -> bool + 'static) -> ParallelRaceGroup {
        self.until(move || !condition())
    }

    /// Skip the command when `condition` is true at initialization.
    fn unless(self, condition: impl FnMut() -> bool + 'static) -> ConditionalCommand {
        ConditionalCommand::new(Box::new(InstantCommand::new(|| {}, &[])), self.boxed(), condition)
    }

    fn only_if(self, mut condition: impl FnMut() -> bool + 'static) -> ConditionalCommand {
        self.unless(move || !condition())
    }

    fn before_starting(self, before: impl Command + 'static) -> SequentialCommandGroup {
        SequentialCommandGroup::new(vec![Box::new(before), self.boxed()])
    }

    fn and_then(self, next: impl Command + 'static) -> SequentialCommandGroup {
        SequentialCommandGroup::new(vec![self.boxed(), Box::new(next)])
    }

    fn along_with(self, other: impl Command + 'static) -> Result<ParallelCommandGroup, CommandeerError> {
        ParallelCommandGroup::new(vec![self.boxed(), Box::new(other)])
    }

    fn race_with(self, other: impl Command + 'static) -> Result<ParallelRaceGroup, CommandeerError> {
        ParallelRaceGroup::new(vec![self.boxed(), Box::new(other)])
    }

    /// Run `other` alongside this command, which acts as the deadline.
    fn deadline_for(self, other: impl Command + 'static) -> Result<ParallelDeadlineGroup, CommandeerError> {
        ParallelDeadlineGroup::new(self.boxed(), vec![Box::new(other)])
    }

    /// Run this command until `deadline` finishes.
    fn with_deadline(self, deadline: impl Command + 'static) -> Result<ParallelDeadlineGroup, CommandeerError> {
        ParallelDeadlineGroup::new(Box::new(deadline), vec![self.boxed()])
    }

    fn repeatedly(self) -> RepeatCommand {
        RepeatCommand::new(self.boxed())
    }

    /// Hand the command to the scheduler as a separately scheduled command.
    /// The proxy itself claims no subsystems.
    fn as_proxy(self, scheduler: &Scheduler) -> ProxyCommand {
        ProxyCommand::new(scheduler, self.into_handle())
    }

    fn ignoring_disable(self, runs_when_disabled: bool) -> WrapperCommand {
        WrapperCommand::new(self.boxed()).disabled_policy(runs_when_disabled)
    }

    fn with_interruption_behavior(self, behavior: InterruptionBehavior) -> WrapperCommand {
        WrapperCommand::new(self.boxed()).interruption(behavior)
    }

    fn with_name(self, name: impl Into<String>) -> WrapperCommand {
        WrapperCommand::new(self.boxed()).named(name)
    }

    /// Run `hook(interrupted)` after the command ends, however it ends.
    fn finally_do(self, hook: impl FnMut(bool) + 'static) -> WrapperCommand {
        WrapperCommand::new(self.boxed()).after_end(hook)
    }

    /// Run `hook` after the command ends, only if it was interrupted.
    fn handle_interrupt(self, mut hook: impl FnMut() + 'static) -> WrapperCommand {
        self.finally_do(move |interrupted| {
            if interrupted {
                hook();
            }
        })
    }
}

impl<T: Command + 'static> CommandExt for T {}
