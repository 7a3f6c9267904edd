//! Commands that hand work to the scheduler instead of running it inline.

use crate::core::command::{Command, CommandHandle};
use crate::core::scheduler::{Scheduler, WeakScheduler};

enum ProxyTarget {
    Fixed(CommandHandle),
    Supplied(Box<dyn FnMut() -> CommandHandle>),
}

/// Schedules its target when initialized and finishes once the target is no
/// longer scheduled.
///
/// The proxy claims no subsystems; the target claims its own when the
/// scheduler accepts it. Interrupting the proxy cancels the target.
pub struct ProxyCommand {
    scheduler: WeakScheduler,
    target: ProxyTarget,
    active: Option<CommandHandle>,
}

impl ProxyCommand {
    pub fn new(scheduler: &Scheduler, target: CommandHandle) -> Self {
        Self {
            scheduler: scheduler.downgrade(),
            target: ProxyTarget::Fixed(target),
            active: None,
        }
    }

    /// Proxy whose target is picked each time it is initialized.
    pub fn supplied(scheduler: &Scheduler, supplier: impl FnMut() -> CommandHandle + 'static) -> Self {
        Self {
            scheduler: scheduler.downgrade(),
            target: ProxyTarget::Supplied(Box::new(supplier)),
            active: None,
        }
    }
}

impl Command for ProxyCommand {
    fn initialize(&mut self) {
        let target = match &mut self.target {
            ProxyTarget::Fixed(handle) => handle.clone(),
            ProxyTarget::Supplied(supplier) => supplier(),
        };
        if let Some(scheduler) = self.scheduler.upgrade() {
            if let Err(err) = scheduler.schedule(&target) {
                tracing::error!(command = target.name(), error = %err, "proxy failed to schedule its target");
            }
        }
        self.active = Some(target);
    }

    fn is_finished(&mut self) -> bool {
        match (&self.active, self.scheduler.upgrade()) {
            (Some(target), Some(scheduler)) => !scheduler.is_scheduled(target),
            _ => true,
        }
    }

    fn end(&mut self, interrupted: bool) {
        if let Some(target) = self.active.take() {
            if interrupted {
                if let Some(scheduler) = self.scheduler.upgrade() {
                    scheduler.cancel(&target);
                }
            }
        }
    }

    fn name(&self) -> String {
        match &self.target {
            ProxyTarget::Fixed(handle) => format!("Proxy({})", handle.name()),
            ProxyTarget::Supplied(_) => "ProxyCommand".to_string(),
        }
    }

    fn runs_when_disabled(&self) -> bool {
        match &self.target {
            ProxyTarget::Fixed(handle) => handle.runs_when_disabled(),
            ProxyTarget::Supplied(_) => false,
        }
    }
}

/// Schedules its targets when initialized and finishes immediately. The
/// targets run on their own from then on. Runs while disabled.
pub struct ScheduleCommand {
    scheduler: WeakScheduler,
    targets: Vec<CommandHandle>,
}

impl ScheduleCommand {
    pub fn new(scheduler: &Scheduler, targets: Vec<CommandHandle>) -> Self {
        Self {
            scheduler: scheduler.downgrade(),
            targets,
        }
    }
}

impl Command for ScheduleCommand {
    fn initialize(&mut self) {
        let Some(scheduler) = self.scheduler.upgrade() else {
            return;
        };
        for target in &self.targets {
            if let Err(err) = scheduler.schedule(target) {
                tracing::error!(command = target.name(), error = %err, "failed to schedule command");
            }
        }
    }

    fn is_finished(&mut self) -> bool {
        true
    }

    fn runs_when_disabled(&self) -> bool {
        true
    }
}
