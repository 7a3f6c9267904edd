//! Edge-triggered command bindings over boolean conditions.
//!
//! Every binding tracks the previous value of the condition on its own,
//! starting from the value observed when it was bound. Two bindings on the
//! same trigger therefore see the same edges, and a combined trigger bound
//! by itself sees only the edges of the combination.

use crate::core::clock::ClockHandle;
use crate::core::command::CommandHandle;
use crate::core::debounce::{DebounceKind, Debouncer};
use crate::core::error::CommandeerError;
use crate::core::event_loop::EventLoop;
use crate::core::scheduler::{Scheduler, WeakScheduler};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

type Condition = Rc<dyn Fn() -> bool>;

#[derive(Clone)]
pub struct Trigger {
    scheduler: WeakScheduler,
    event_loop: EventLoop,
    condition: Condition,
}

impl Trigger {
    /// Trigger polled by the scheduler's default button loop.
    pub fn new(scheduler: &Scheduler, condition: impl Fn() -> bool + 'static) -> Self {
        Self::with_loop(scheduler, scheduler.default_button_loop(), condition)
    }

    pub fn with_loop(
        scheduler: &Scheduler,
        event_loop: EventLoop,
        condition: impl Fn() -> bool + 'static,
    ) -> Self {
        Self {
            scheduler: scheduler.downgrade(),
            event_loop,
            condition: Rc::new(condition),
        }
    }

    fn derive(&self, condition: impl Fn() -> bool + 'static) -> Self {
        Self {
            scheduler: self.scheduler.clone(),
            event_loop: self.event_loop.clone(),
            condition: Rc::new(condition),
        }
    }

    pub fn get(&self) -> bool {
        (self.condition)()
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    /// Register `on_edge(scheduler, previous, current)` to run on every poll.
    fn bind_edges(
        &self,
        mut on_edge: impl FnMut(&Scheduler, bool, bool) -> Result<(), CommandeerError> + 'static,
    ) {
        let condition = Rc::clone(&self.condition);
        let scheduler = self.scheduler.clone();
        let mut previous = condition();
        self.event_loop.bind_always(move || {
            let current = condition();
            let was = std::mem::replace(&mut previous, current);
            match scheduler.upgrade() {
                Some(scheduler) => on_edge(&scheduler, was, current),
                None => Ok(()),
            }
        });
    }

    /// Schedule `command` on the false to true transition.
    pub fn on_true(&self, command: CommandHandle) -> Self {
        self.bind_edges(move |scheduler, was, now| {
            if !was && now {
                scheduler.schedule(&command)?;
            }
            Ok(())
        });
        self.clone()
    }

    /// Schedule `command` on the true to false transition.
    pub fn on_false(&self, command: CommandHandle) -> Self {
        self.bind_edges(move |scheduler, was, now| {
            if was && !now {
                scheduler.schedule(&command)?;
            }
            Ok(())
        });
        self.clone()
    }

    /// Schedule `command` on either transition.
    pub fn on_change(&self, command: CommandHandle) -> Self {
        self.bind_edges(move |scheduler, was, now| {
            if was != now {
                scheduler.schedule(&command)?;
            }
            Ok(())
        });
        self.clone()
    }

    /// Schedule on the rising edge, cancel on the falling edge.
    pub fn while_true(&self, command: CommandHandle) -> Self {
        self.bind_edges(move |scheduler, was, now| {
            if !was && now {
                scheduler.schedule(&command)?;
            } else if was && !now {
                scheduler.cancel(&command);
            }
            Ok(())
        });
        self.clone()
    }

    /// Schedule on the falling edge, cancel on the rising edge.
    pub fn while_false(&self, command: CommandHandle) -> Self {
        self.bind_edges(move |scheduler, was, now| {
            if was && !now {
                scheduler.schedule(&command)?;
            } else if !was && now {
                scheduler.cancel(&command);
            }
            Ok(())
        });
        self.clone()
    }

    /// On the rising edge, cancel `command` if it is scheduled, else schedule it.
    pub fn toggle_on_true(&self, command: CommandHandle) -> Self {
        self.bind_edges(move |scheduler, was, now| {
            if !was && now {
                toggle(scheduler, &command)?;
            }
            Ok(())
        });
        self.clone()
    }

    pub fn toggle_on_false(&self, command: CommandHandle) -> Self {
        self.bind_edges(move |scheduler, was, now| {
            if was && !now {
                toggle(scheduler, &command)?;
            }
            Ok(())
        });
        self.clone()
    }

    pub fn and(&self, other: &Trigger) -> Trigger {
        let (a, b) = (Rc::clone(&self.condition), Rc::clone(&other.condition));
        self.derive(move || a() && b())
    }

    pub fn or(&self, other: &Trigger) -> Trigger {
        let (a, b) = (Rc::clone(&self.condition), Rc::clone(&other.condition));
        self.derive(move || a() || b())
    }

    pub fn negate(&self) -> Trigger {
        let a = Rc::clone(&self.condition);
        self.derive(move || !a())
    }

    /// Trigger that only reports a change once it has held for `period`.
    pub fn debounce(&self, clock: ClockHandle, period: Duration, kind: DebounceKind) -> Trigger {
        let a = Rc::clone(&self.condition);
        let debouncer = RefCell::new(Debouncer::new(clock, period, kind));
        self.derive(move || {
            let input = a();
            debouncer.borrow_mut().calculate(input)
        })
    }
}

fn toggle(scheduler: &Scheduler, command: &CommandHandle) -> Result<(), CommandeerError> {
    if scheduler.is_scheduled(command) {
        scheduler.cancel(command);
    } else {
        scheduler.schedule(command)?;
    }
    Ok(())
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("event_loop", &self.event_loop)
            .finish_non_exhaustive()
    }
}
