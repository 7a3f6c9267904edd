//! The cooperative command scheduler.
//!
//! One [`Scheduler`] per robot program, created at the composition root and
//! handed to whatever needs it (subsystem registration, triggers, proxies).
//! It is single-threaded: `run`, `schedule` and `cancel` must all be called
//! from the thread that owns it.
//!
//! # Tick
//!
//! [`Scheduler::run`] performs one tick:
//!
//! 1. If the robot is disabled, cancel everything that may not run disabled.
//! 2. Call `periodic` on every registered subsystem.
//! 3. Poll the active button loop. Trigger actions take effect immediately.
//! 4. Step every scheduled command in insertion order: `execute`, then
//!    `is_finished`, then `end(false)` and release if finished. Schedule and
//!    cancel requests made while stepping are queued and applied once the
//!    step phase is over.
//! 5. Schedule the default command of every unclaimed subsystem.
//!
//! # Re-entrancy
//!
//! Commands may schedule or cancel other commands from any callback. A
//! command that is canceled while one of its own callbacks is on the stack
//! is released immediately and receives its `end(true)` as soon as that
//! callback returns.

use crate::core::clock::ClockHandle;
use crate::core::command::{CommandHandle, CommandId, InterruptionBehavior, Requirements};
use crate::core::config::SchedulerConfig;
use crate::core::error::CommandeerError;
use crate::core::event_loop::EventLoop;
use crate::core::journal::{EventKind, EventSink, InterruptCause, JsonlJournal, SchedulerEvent};
use crate::core::subsystem::{Subsystem, SubsystemId, SubsystemRef, SubsystemRegistry};
use crate::core::watchdog::{LoopReport, LoopTimer};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotMode {
    Disabled,
    Autonomous,
    Teleop,
    Test,
}

impl RobotMode {
    pub fn as_str(&self) -> &str {
        match self {
            RobotMode::Disabled => "disabled",
            RobotMode::Autonomous => "autonomous",
            RobotMode::Teleop => "teleop",
            RobotMode::Test => "test",
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self != RobotMode::Disabled
    }
}

/// Result of a schedule request that was not a programmer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled,
    AlreadyScheduled,
    /// Requested while commands were being stepped; applied after the step.
    Deferred,
    /// The robot is disabled and the command may not run disabled.
    Disabled,
    /// An incumbent with `CancelIncoming` holds a required subsystem.
    Rejected { by: CommandId },
}

impl ScheduleOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            ScheduleOutcome::Scheduled | ScheduleOutcome::AlreadyScheduled | ScheduleOutcome::Deferred
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandSummary {
    pub id: CommandId,
    pub name: String,
    pub requirements: Vec<String>,
    pub interruption_behavior: InterruptionBehavior,
    pub runs_when_disabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubsystemSummary {
    pub id: SubsystemId,
    pub name: String,
    pub holder: Option<String>,
    pub default_command: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchedulerSnapshot {
    pub tick: u64,
    pub mode: RobotMode,
    pub paused: bool,
    pub scheduled: Vec<CommandSummary>,
    pub subsystems: Vec<SubsystemSummary>,
}

type Listener = Rc<RefCell<dyn FnMut(&SchedulerEvent)>>;

struct PendingEnd {
    command: CommandHandle,
    interrupted: bool,
    cause: Option<InterruptCause>,
}

/// Request made while commands are being stepped, replayed in call order.
enum PendingOp {
    Schedule(CommandHandle),
    Cancel(CommandHandle, InterruptCause),
}

impl PendingOp {
    fn command(&self) -> &CommandHandle {
        match self {
            PendingOp::Schedule(command) | PendingOp::Cancel(command, _) => command,
        }
    }
}

struct SchedulerState {
    scheduled: IndexMap<CommandId, CommandHandle, FxBuildHasher>,
    registry: SubsystemRegistry,
    in_run_loop: bool,
    pending_ops: Vec<PendingOp>,
    pending_ends: Vec<PendingEnd>,
    mode: RobotMode,
    simulation: bool,
    paused: bool,
    tick: u64,
    last_report: Option<LoopReport>,
}

impl SchedulerState {
    /// Whether `command` will be scheduled once the queued requests are
    /// replayed. The last queued request for it decides.
    fn will_be_scheduled(&self, command: &CommandHandle) -> bool {
        match self.pending_ops.iter().rev().find(|op| op.command() == command) {
            Some(PendingOp::Schedule(_)) => true,
            Some(PendingOp::Cancel(..)) => false,
            None => self.scheduled.contains_key(&command.id()),
        }
    }

    fn has_pending_op(&self, command: &CommandHandle) -> bool {
        self.pending_ops.iter().any(|op| op.command() == command)
    }

    fn cancel_pending(&self, command: &CommandHandle) -> bool {
        self.pending_ops
            .iter()
            .any(|op| matches!(op, PendingOp::Cancel(queued, _) if queued == command))
    }
}

struct SchedulerInner {
    state: RefCell<SchedulerState>,
    config: SchedulerConfig,
    clock: ClockHandle,
    default_loop: EventLoop,
    active_loop: RefCell<EventLoop>,
    watchdog: RefCell<LoopTimer>,
    listeners: RefCell<Vec<Listener>>,
    journal: RefCell<Option<Box<dyn EventSink>>>,
}

/// Cheaply clonable handle; clones drive the same scheduler.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<SchedulerInner>,
}

/// Non-owning reference held by triggers and proxies.
#[derive(Clone)]
pub struct WeakScheduler {
    inner: Weak<SchedulerInner>,
}

impl WeakScheduler {
    pub fn upgrade(&self) -> Option<Scheduler> {
        self.inner.upgrade().map(|inner| Scheduler { inner })
    }
}

impl Scheduler {
    /// Scheduler with default configuration and no journal. Starts disabled:
    /// `schedule()` returns [`ScheduleOutcome::Disabled`] for commands that
    /// do not run while disabled until [`Scheduler::set_mode`] enables it.
    pub fn new(clock: ClockHandle) -> Self {
        Self::build(SchedulerConfig::default(), clock)
    }

    /// Scheduler from a validated config; opens the JSONL journal if one is
    /// configured.
    pub fn with_config(config: SchedulerConfig, clock: ClockHandle) -> Result<Self, CommandeerError> {
        config.validate()?;
        let journal_path = config.journal.path.clone();
        let scheduler = Self::build(config, clock);
        if let Some(path) = journal_path {
            scheduler.set_journal(JsonlJournal::open(path)?);
        }
        Ok(scheduler)
    }

    fn build(config: SchedulerConfig, clock: ClockHandle) -> Self {
        let default_loop = EventLoop::new();
        let watchdog = LoopTimer::new(clock.clone(), config.loop_period());
        Scheduler {
            inner: Rc::new(SchedulerInner {
                state: RefCell::new(SchedulerState {
                    scheduled: IndexMap::default(),
                    registry: SubsystemRegistry::default(),
                    in_run_loop: false,
                    pending_ops: Vec::new(),
                    pending_ends: Vec::new(),
                    mode: RobotMode::Disabled,
                    simulation: false,
                    paused: false,
                    tick: 0,
                    last_report: None,
                }),
                config,
                clock,
                active_loop: RefCell::new(default_loop.clone()),
                default_loop,
                watchdog: RefCell::new(watchdog),
                listeners: RefCell::new(Vec::new()),
                journal: RefCell::new(None),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakScheduler {
        WeakScheduler {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn clock(&self) -> ClockHandle {
        self.inner.clock.clone()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    // ===== Robot lifecycle =====

    pub fn mode(&self) -> RobotMode {
        self.inner.state.borrow().mode
    }

    pub fn is_disabled(&self) -> bool {
        self.mode() == RobotMode::Disabled
    }

    /// Switch robot mode. Entering `Disabled` cancels every command that may
    /// not run while disabled, right away.
    pub fn set_mode(&self, mode: RobotMode) {
        let previous = {
            let mut state = self.inner.state.borrow_mut();
            std::mem::replace(&mut state.mode, mode)
        };
        if previous != mode {
            tracing::debug!(from = previous.as_str(), to = mode.as_str(), "robot mode changed");
        }
        if mode == RobotMode::Disabled && previous != RobotMode::Disabled {
            self.cancel_disabled();
        }
    }

    pub fn set_simulation(&self, simulation: bool) {
        self.inner.state.borrow_mut().simulation = simulation;
    }

    /// Make `run` a no-op until [`resume`](Self::resume).
    pub fn pause(&self) {
        self.inner.state.borrow_mut().paused = true;
    }

    pub fn resume(&self) {
        self.inner.state.borrow_mut().paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.inner.state.borrow().paused
    }

    pub fn tick(&self) -> u64 {
        self.inner.state.borrow().tick
    }

    pub fn last_loop_report(&self) -> Option<LoopReport> {
        self.inner.state.borrow().last_report.clone()
    }

    // ===== Event loops and observers =====

    /// Loop that `Trigger::new` binds to.
    pub fn default_button_loop(&self) -> EventLoop {
        self.inner.default_loop.clone()
    }

    /// Loop that `run` polls; the default loop unless replaced.
    pub fn active_button_loop(&self) -> EventLoop {
        self.inner.active_loop.borrow().clone()
    }

    pub fn set_active_button_loop(&self, event_loop: EventLoop) {
        *self.inner.active_loop.borrow_mut() = event_loop;
    }

    /// Observe every lifecycle transition.
    pub fn on_event(&self, listener: impl FnMut(&SchedulerEvent) + 'static) {
        let listener: Listener = Rc::new(RefCell::new(listener));
        self.inner.listeners.borrow_mut().push(listener);
    }

    pub fn set_journal(&self, sink: impl EventSink + 'static) {
        *self.inner.journal.borrow_mut() = Some(Box::new(sink));
    }

    // ===== Subsystems =====

    /// Register a subsystem for periodic calls and default commands.
    pub fn register_subsystem<S: Subsystem + 'static>(&self, subsystem: &Rc<RefCell<S>>) -> SubsystemId {
        let id = SubsystemId::next();
        let name = subsystem.borrow().name();
        let shared: SubsystemRef = subsystem.clone();
        self.inner
            .state
            .borrow_mut()
            .registry
            .register(id, name, Some(shared));
        id
    }

    /// Register a named resource with no periodic work of its own.
    pub fn register_resource(&self, name: impl Into<String>) -> SubsystemId {
        let id = SubsystemId::next();
        self.inner
            .state
            .borrow_mut()
            .registry
            .register(id, name.into(), None);
        id
    }

    /// Cancel whatever holds `subsystem`, then forget it and its default.
    pub fn unregister_subsystem(&self, subsystem: SubsystemId) {
        let holder = self.inner.state.borrow().registry.holder(subsystem);
        if let Some(holder) = holder {
            self.cancel_with_cause(&holder, InterruptCause::Unregistered);
        }
        self.inner.state.borrow_mut().registry.unregister(subsystem);
    }

    pub fn is_registered(&self, subsystem: SubsystemId) -> bool {
        self.inner.state.borrow().registry.contains(subsystem)
    }

    pub fn subsystem_name(&self, subsystem: SubsystemId) -> String {
        self.inner.state.borrow().registry.name_of(subsystem)
    }

    /// Set the command that runs on `subsystem` whenever nothing else holds
    /// it. The command must require exactly `subsystem` and must not be
    /// single-use.
    pub fn set_default_command(
        &self,
        subsystem: SubsystemId,
        command: CommandHandle,
    ) -> Result<(), CommandeerError> {
        if command.is_single_use() {
            return Err(CommandeerError::DefaultCommandError(format!(
                "default command '{}' for '{}' is single-use and cannot be restarted",
                command.name(),
                self.subsystem_name(subsystem)
            )));
        }
        let expected: Requirements = [subsystem].into_iter().collect();
        if command.requirements() != &expected {
            return Err(CommandeerError::DefaultCommandError(format!(
                "default command '{}' for '{}' must require exactly that subsystem",
                command.name(),
                self.subsystem_name(subsystem)
            )));
        }
        if command.interruption_behavior() == InterruptionBehavior::CancelIncoming {
            tracing::warn!(
                command = command.name(),
                "default command uses cancel_incoming and will block other commands"
            );
        }
        let previous = {
            let mut state = self.inner.state.borrow_mut();
            let name = state.registry.name_of(subsystem);
            let entry = state
                .registry
                .entry_mut(subsystem)
                .ok_or(CommandeerError::UnknownSubsystem(name))?;
            entry.default_command.replace(command.clone())
        };
        if let Some(previous) = previous {
            if previous != command {
                self.cancel(&previous);
            }
        }
        Ok(())
    }

    pub fn default_command(&self, subsystem: SubsystemId) -> Option<CommandHandle> {
        self.inner.state.borrow().registry.default_command(subsystem)
    }

    /// Remove and cancel the default command of `subsystem`.
    pub fn remove_default_command(&self, subsystem: SubsystemId) -> Option<CommandHandle> {
        let removed = {
            let mut state = self.inner.state.borrow_mut();
            state
                .registry
                .entry_mut(subsystem)
                .and_then(|entry| entry.default_command.take())
        };
        if let Some(removed) = &removed {
            self.cancel(removed);
        }
        removed
    }

    /// The command currently holding `subsystem`.
    pub fn requiring(&self, subsystem: SubsystemId) -> Option<CommandHandle> {
        self.inner.state.borrow().registry.holder(subsystem)
    }

    /// Subsystems `command` currently holds, in id order.
    pub fn claimed_by(&self, command: &CommandHandle) -> Vec<SubsystemId> {
        self.inner.state.borrow().registry.claimed_by(command.id())
    }

    // ===== Scheduling =====

    pub fn is_scheduled(&self, command: &CommandHandle) -> bool {
        self.inner.state.borrow().will_be_scheduled(command)
    }

    /// Scheduled commands in the order they are stepped.
    pub fn scheduled_commands(&self) -> Vec<CommandHandle> {
        self.inner.state.borrow().scheduled.values().cloned().collect()
    }

    /// Request that `command` run.
    ///
    /// Conflicts with running commands are resolved by the incumbent's
    /// interruption behavior. On success the command is initialized before
    /// this returns, unless commands are being stepped, in which case the
    /// request is applied right after the step phase.
    pub fn schedule(&self, command: &CommandHandle) -> Result<ScheduleOutcome, CommandeerError> {
        if command.is_consumed() {
            return Err(CommandeerError::CommandConsumed(command.name().to_string()));
        }
        {
            let mut state = self.inner.state.borrow_mut();
            if state.in_run_loop {
                if state.will_be_scheduled(command) {
                    if state.has_pending_op(command) {
                        return Ok(ScheduleOutcome::Deferred);
                    }
                    return Ok(ScheduleOutcome::AlreadyScheduled);
                }
                state.pending_ops.push(PendingOp::Schedule(command.clone()));
                return Ok(ScheduleOutcome::Deferred);
            }
            if state.scheduled.contains_key(&command.id()) {
                return Ok(ScheduleOutcome::AlreadyScheduled);
            }
            if state.mode == RobotMode::Disabled && !command.runs_when_disabled() {
                return Ok(ScheduleOutcome::Disabled);
            }
        }
        if command.is_busy() {
            return Err(CommandeerError::ReentrantCommand(command.name().to_string()));
        }

        let conflicts = self.inner.state.borrow().registry.conflicts_with(command);
        if let Some(blocker) = conflicts
            .iter()
            .find(|incumbent| incumbent.interruption_behavior() == InterruptionBehavior::CancelIncoming)
        {
            self.emit(
                EventKind::Rejected,
                command,
                Some(InterruptCause::Conflict {
                    by: blocker.id(),
                    by_name: blocker.name().to_string(),
                }),
            );
            return Ok(ScheduleOutcome::Rejected { by: blocker.id() });
        }
        for incumbent in &conflicts {
            self.release(incumbent);
            self.end_released(
                incumbent,
                true,
                Some(InterruptCause::Conflict {
                    by: command.id(),
                    by_name: command.name().to_string(),
                }),
            );
        }

        {
            let mut state = self.inner.state.borrow_mut();
            state.scheduled.insert(command.id(), command.clone());
            state.registry.claim(command);
        }
        if let Err(err) = command.with_command(|c| c.initialize()) {
            self.release(command);
            return Err(err);
        }
        self.emit(EventKind::Initialized, command, None);
        self.flush_pending_ends();
        Ok(ScheduleOutcome::Scheduled)
    }

    pub fn schedule_all(&self, commands: &[CommandHandle]) -> Result<(), CommandeerError> {
        for command in commands {
            self.schedule(command)?;
        }
        Ok(())
    }

    /// Interrupt `command` with `end(true)`. Not scheduled means no-op.
    pub fn cancel(&self, command: &CommandHandle) {
        self.cancel_with_cause(command, InterruptCause::Canceled);
    }

    pub fn cancel_all(&self) {
        for command in self.scheduled_commands() {
            self.cancel(&command);
        }
    }

    fn cancel_disabled(&self) {
        for command in self.scheduled_commands() {
            if !command.runs_when_disabled() {
                self.cancel_with_cause(&command, InterruptCause::Disabled);
            }
        }
    }

    fn cancel_with_cause(&self, command: &CommandHandle, cause: InterruptCause) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.in_run_loop {
                state
                    .pending_ops
                    .retain(|op| !matches!(op, PendingOp::Schedule(queued) if queued == command));
                if state.will_be_scheduled(command) {
                    state.pending_ops.push(PendingOp::Cancel(command.clone(), cause));
                }
                return;
            }
            if !state.scheduled.contains_key(&command.id()) {
                return;
            }
        }
        self.release(command);
        self.end_released(command, true, Some(cause));
        self.flush_pending_ends();
    }

    fn release(&self, command: &CommandHandle) {
        let mut state = self.inner.state.borrow_mut();
        state.scheduled.shift_remove(&command.id());
        state.registry.release(command);
    }

    /// Call `end` on a command that has already been released. If one of its
    /// callbacks is on the stack the call is queued instead.
    fn end_released(&self, command: &CommandHandle, interrupted: bool, cause: Option<InterruptCause>) {
        match command.with_command(|c| c.end(interrupted)) {
            Ok(()) => {
                command.mark_ended();
                let kind = if interrupted {
                    EventKind::Interrupted
                } else {
                    EventKind::Finished
                };
                self.emit(kind, command, cause);
            }
            Err(_) => self.inner.state.borrow_mut().pending_ends.push(PendingEnd {
                command: command.clone(),
                interrupted,
                cause,
            }),
        }
    }

    fn flush_pending_ends(&self) {
        let pending = std::mem::take(&mut self.inner.state.borrow_mut().pending_ends);
        for end in pending {
            self.end_released(&end.command, end.interrupted, end.cause);
        }
    }

    // ===== Tick =====

    pub fn run(&self) -> Result<(), CommandeerError> {
        let (tick, disabled, simulation) = {
            let mut state = self.inner.state.borrow_mut();
            if state.paused {
                return Ok(());
            }
            state.tick += 1;
            (state.tick, state.mode == RobotMode::Disabled, state.simulation)
        };
        self.inner.watchdog.borrow_mut().reset();

        if disabled {
            self.cancel_disabled();
        }

        let subsystems = self.inner.state.borrow().registry.periodic_targets();
        for subsystem in subsystems {
            let name = {
                let mut subsystem = subsystem.borrow_mut();
                subsystem.periodic();
                if simulation {
                    subsystem.simulation_periodic();
                }
                subsystem.name()
            };
            self.epoch(format!("{}.periodic()", name));
        }

        let event_loop = self.active_button_loop();
        event_loop.poll()?;
        self.epoch("buttons.poll()");

        let snapshot: Vec<CommandHandle> = {
            let mut state = self.inner.state.borrow_mut();
            state.in_run_loop = true;
            state.scheduled.values().cloned().collect()
        };
        for command in &snapshot {
            self.step(command);
        }
        let pending_ops = {
            let mut state = self.inner.state.borrow_mut();
            state.in_run_loop = false;
            std::mem::take(&mut state.pending_ops)
        };
        for op in pending_ops {
            match op {
                PendingOp::Schedule(command) => {
                    self.schedule(&command)?;
                }
                PendingOp::Cancel(command, cause) => self.cancel_with_cause(&command, cause),
            }
        }

        let defaults = self.inner.state.borrow().registry.idle_defaults();
        for command in &defaults {
            self.schedule(command)?;
        }
        self.epoch("default commands");
        self.flush_pending_ends();

        let report = self.inner.watchdog.borrow_mut().finish(tick);
        if report.overrun && self.inner.config.warn_on_overrun {
            tracing::warn!(
                tick,
                elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
                period_ms = report.period.as_secs_f64() * 1000.0,
                "scheduler loop overrun\n{}",
                report.render_epochs()
            );
        }
        self.inner.state.borrow_mut().last_report = Some(report);
        Ok(())
    }

    fn step(&self, command: &CommandHandle) {
        {
            let state = self.inner.state.borrow();
            if !state.scheduled.contains_key(&command.id()) || state.cancel_pending(command) {
                return;
            }
        }
        if let Err(err) = command.with_command(|c| c.execute()) {
            tracing::error!(command = command.name(), error = %err, "skipping execute");
            return;
        }
        self.emit(EventKind::Executed, command, None);
        let finished = command.with_command(|c| c.is_finished()).unwrap_or(false);
        if finished {
            self.release(command);
            self.end_released(command, false, None);
        }
        self.epoch(format!("{}.execute()", command.name()));
    }

    fn epoch(&self, name: impl Into<String>) {
        if let Ok(mut watchdog) = self.inner.watchdog.try_borrow_mut() {
            watchdog.add_epoch(name);
        }
    }

    fn emit(&self, kind: EventKind, command: &CommandHandle, cause: Option<InterruptCause>) {
        let journaled = kind != EventKind::Executed || self.inner.config.journal.record_execute;
        if kind != EventKind::Executed {
            tracing::debug!(command = command.name(), event = kind.as_str(), "command lifecycle");
        }
        let listeners: Vec<Listener> = self.inner.listeners.borrow().clone();
        if !journaled && listeners.is_empty() {
            return;
        }
        let tick = self.inner.state.borrow().tick;
        let time_ms = self.inner.clock.now().as_millis() as u64;
        let event = SchedulerEvent::new(tick, time_ms, kind, command.id(), command.name(), cause);
        if journaled {
            if let Ok(mut journal) = self.inner.journal.try_borrow_mut() {
                if let Some(sink) = journal.as_mut() {
                    if let Err(err) = sink.record(&event) {
                        tracing::warn!(error = %err, "failed to journal scheduler event");
                    }
                }
            }
        }
        for listener in listeners {
            if let Ok(mut listener) = listener.try_borrow_mut() {
                (&mut *listener)(&event);
            }
        }
    }

    // ===== Introspection =====

    pub fn snapshot(&self) -> SchedulerSnapshot {
        let state = self.inner.state.borrow();
        let scheduled = state
            .scheduled
            .values()
            .map(|command| CommandSummary {
                id: command.id(),
                name: command.name().to_string(),
                requirements: command
                    .requirements()
                    .iter()
                    .map(|id| state.registry.name_of(*id))
                    .collect(),
                interruption_behavior: command.interruption_behavior(),
                runs_when_disabled: command.runs_when_disabled(),
            })
            .collect();
        let subsystems = state
            .registry
            .entries()
            .map(|(id, entry)| SubsystemSummary {
                id: *id,
                name: entry.name.clone(),
                holder: state.registry.holder(*id).map(|c| c.name().to_string()),
                default_command: entry.default_command.as_ref().map(|c| c.name().to_string()),
            })
            .collect();
        SchedulerSnapshot {
            tick: state.tick,
            mode: state.mode,
            paused: state.paused,
            scheduled,
            subsystems,
        }
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Scheduler")
            .field("tick", &state.tick)
            .field("mode", &state.mode)
            .field("scheduled", &state.scheduled.len())
            .finish()
    }
}
