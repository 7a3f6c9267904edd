use crate::core::command::{Command, InterruptionBehavior, Requirements};

/// Forwards the lifecycle to an inner command while overriding some of its
/// attributes or observing its end.
pub struct WrapperCommand {
    inner: Box<dyn Command>,
    name: Option<String>,
    interruption: Option<InterruptionBehavior>,
    runs_when_disabled: Option<bool>,
    on_end: Vec<Box<dyn FnMut(bool)>>,
}

impl WrapperCommand {
    pub fn new(inner: Box<dyn Command>) -> Self {
        Self {
            inner,
            name: None,
            interruption: None,
            runs_when_disabled: None,
            on_end: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn interruption(mut self, behavior: InterruptionBehavior) -> Self {
        self.interruption = Some(behavior);
        self
    }

    pub fn disabled_policy(mut self, runs_when_disabled: bool) -> Self {
        self.runs_when_disabled = Some(runs_when_disabled);
        self
    }

    /// Run `hook(interrupted)` after the inner command's `end`.
    pub fn after_end(mut self, hook: impl FnMut(bool) + 'static) -> Self {
        self.on_end.push(Box::new(hook));
        self
    }
}

impl Command for WrapperCommand {
    fn initialize(&mut self) {
        self.inner.initialize()
    }

    fn execute(&mut self) {
        self.inner.execute()
    }

    fn is_finished(&mut self) -> bool {
        self.inner.is_finished()
    }

    fn end(&mut self, interrupted: bool) {
        self.inner.end(interrupted);
        for hook in &mut self.on_end {
            hook(interrupted);
        }
    }

    fn requirements(&self) -> Requirements {
        self.inner.requirements()
    }

    fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.inner.name())
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        self.interruption
            .unwrap_or_else(|| self.inner.interruption_behavior())
    }

    fn runs_when_disabled(&self) -> bool {
        self.runs_when_disabled
            .unwrap_or_else(|| self.inner.runs_when_disabled())
    }
}
