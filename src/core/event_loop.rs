//! Registry of (condition, action) bindings polled once per tick.
//!
//! The loop itself has no notion of edges: an action runs on every poll in
//! which its condition is true. Edge detection is layered on top by
//! [`Trigger`](crate::core::trigger::Trigger).

use crate::core::error::CommandeerError;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Condition = Box<dyn Fn() -> bool>;
type Action = Box<dyn FnMut() -> Result<(), CommandeerError>>;

struct Binding {
    condition: Condition,
    action: RefCell<Action>,
    live: Cell<bool>,
}

#[derive(Default)]
struct EventLoopInner {
    bindings: RefCell<Vec<Rc<Binding>>>,
}

/// Cheaply clonable; clones share the same bindings.
#[derive(Clone, Default)]
pub struct EventLoop {
    inner: Rc<EventLoopInner>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(
        &self,
        condition: impl Fn() -> bool + 'static,
        action: impl FnMut() -> Result<(), CommandeerError> + 'static,
    ) {
        self.inner.bindings.borrow_mut().push(Rc::new(Binding {
            condition: Box::new(condition),
            action: RefCell::new(Box::new(action)),
            live: Cell::new(true),
        }));
    }

    /// Bind an action that runs on every poll.
    pub fn bind_always(&self, action: impl FnMut() -> Result<(), CommandeerError> + 'static) {
        self.bind(|| true, action);
    }

    /// Evaluate every binding once, in registration order.
    ///
    /// Bindings added while polling are first evaluated on the next poll;
    /// bindings removed by [`clear`](Self::clear) while polling are skipped.
    pub fn poll(&self) -> Result<(), CommandeerError> {
        let snapshot: Vec<Rc<Binding>> = self.inner.bindings.borrow().clone();
        for binding in snapshot {
            if !binding.live.get() {
                continue;
            }
            if !(binding.condition)() {
                continue;
            }
            // An action that polls its own loop would re-enter itself.
            let Ok(mut action) = binding.action.try_borrow_mut() else {
                continue;
            };
            (&mut *action)()?;
        }
        Ok(())
    }

    pub fn clear(&self) {
        for binding in self.inner.bindings.borrow_mut().drain(..) {
            binding.live.set(false);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.bindings.borrow().is_empty()
    }

    pub fn ptr_eq(&self, other: &EventLoop) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("bindings", &self.len())
            .finish()
    }
}
