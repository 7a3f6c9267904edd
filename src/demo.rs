//! Scripted demo robot for `commandeer simulate`.
//!
//! A drivetrain and an intake, an autonomous routine, a default drive
//! command and two buttons whose presses are scripted by tick. Time comes
//! from a [`ManualClock`] advanced by one loop period per tick, so a run is
//! reproducible.

use crate::commands::factories::{print, run, run_end, sequence, start_end, wait};
use crate::commands::CommandExt;
use crate::core::clock::ManualClock;
use crate::core::command::{CommandHandle, InterruptionBehavior};
use crate::core::config::SchedulerConfig;
use crate::core::error::CommandeerError;
use crate::core::journal::{EventKind, MemoryJournal, SchedulerEvent};
use crate::core::scheduler::{RobotMode, Scheduler, SchedulerSnapshot};
use crate::core::subsystem::Subsystem;
use crate::core::trigger::Trigger;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::rc::Rc;
use std::time::Duration;

pub(crate) const DEFAULT_TICKS: u64 = 300;

const TELEOP_AT: u64 = 120;
const DISABLE_AT: u64 = 270;
const INTAKE_HELD: RangeInclusive<u64> = 150..=190;
const CLIMB_PRESSES: [RangeInclusive<u64>; 2] = [210..=212, 240..=242];

struct Drivetrain {
    dt_s: f64,
    speed: f64,
    distance_m: f64,
}

impl Subsystem for Drivetrain {
    fn name(&self) -> String {
        "Drivetrain".to_string()
    }

    fn simulation_periodic(&mut self) {
        self.distance_m += self.speed * self.dt_s;
    }
}

struct Intake {
    running: bool,
    feed_ticks: u32,
    pieces: u32,
}

impl Subsystem for Intake {
    fn name(&self) -> String {
        "Intake".to_string()
    }

    fn simulation_periodic(&mut self) {
        if self.running {
            self.feed_ticks += 1;
            if self.feed_ticks % 25 == 0 {
                self.pieces += 1;
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SimulationReport {
    pub ticks: u64,
    pub mode: RobotMode,
    pub distance_m: f64,
    pub pieces: u32,
    pub overruns: u64,
    pub event_counts: BTreeMap<String, usize>,
    pub snapshot: SchedulerSnapshot,
    #[serde(skip)]
    pub events: Vec<SchedulerEvent>,
}

pub(crate) struct DemoRobot {
    scheduler: Scheduler,
    clock: ManualClock,
    period: Duration,
    drivetrain: Rc<RefCell<Drivetrain>>,
    intake: Rc<RefCell<Intake>>,
    intake_button: Rc<Cell<bool>>,
    climb_button: Rc<Cell<bool>>,
    autonomous: CommandHandle,
    events: Rc<RefCell<Vec<SchedulerEvent>>>,
    backlog: Option<MemoryJournal>,
    overruns: u64,
}

impl DemoRobot {
    pub fn new(config: SchedulerConfig) -> Result<Self, CommandeerError> {
        let clock = ManualClock::new();
        let period = config.loop_period();
        let memory_capacity = config.journal.memory_capacity;
        let journaled = config.journal.path.is_some();
        let scheduler = Scheduler::with_config(config, clock.handle())?;
        scheduler.set_simulation(true);

        let backlog = if journaled {
            None
        } else {
            let backlog = MemoryJournal::new(memory_capacity);
            scheduler.set_journal(backlog.clone());
            Some(backlog)
        };

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        scheduler.on_event(move |event| sink.borrow_mut().push(event.clone()));

        let drivetrain = Rc::new(RefCell::new(Drivetrain {
            dt_s: period.as_secs_f64(),
            speed: 0.0,
            distance_m: 0.0,
        }));
        let intake = Rc::new(RefCell::new(Intake {
            running: false,
            feed_ticks: 0,
            pieces: 0,
        }));
        let drive_id = scheduler.register_subsystem(&drivetrain);
        let intake_id = scheduler.register_subsystem(&intake);

        let drive = Rc::clone(&drivetrain);
        let arcade = run(move || drive.borrow_mut().speed = 0.2, &[drive_id])
            .with_name("ArcadeDrive")
            .into_handle();
        scheduler.set_default_command(drive_id, arcade)?;

        let autonomous = {
            let (go, stop) = (Rc::clone(&drivetrain), Rc::clone(&drivetrain));
            let drive_out = run_end(
                move || go.borrow_mut().speed = 0.5,
                move || stop.borrow_mut().speed = 0.0,
                &[drive_id],
            )
            .with_timeout(clock.handle(), Duration::from_secs(1));
            let (on, off, count) = (Rc::clone(&intake), Rc::clone(&intake), Rc::clone(&intake));
            let collect = start_end(
                move || on.borrow_mut().running = true,
                move || off.borrow_mut().running = false,
                &[intake_id],
            )
            .until(move || count.borrow().pieces >= 1);
            sequence(vec![
                print("autonomous: driving out").boxed(),
                drive_out.boxed(),
                wait(clock.handle(), Duration::from_millis(200)).boxed(),
                collect.boxed(),
            ])
            .with_name("AutoRoutine")
            .into_handle()
        };

        let intake_button = Rc::new(Cell::new(false));
        let (on, off) = (Rc::clone(&intake), Rc::clone(&intake));
        let run_intake = start_end(
            move || on.borrow_mut().running = true,
            move || off.borrow_mut().running = false,
            &[intake_id],
        )
        .with_name("RunIntake")
        .into_handle();
        let pressed = Rc::clone(&intake_button);
        Trigger::new(&scheduler, move || pressed.get()).while_true(run_intake);

        let climb_button = Rc::new(Cell::new(false));
        let hold = Rc::clone(&drivetrain);
        let climb = start_end(move || hold.borrow_mut().speed = 0.0, || {}, &[drive_id])
            .with_interruption_behavior(InterruptionBehavior::CancelIncoming)
            .with_name("Climb")
            .into_handle();
        let pressed = Rc::clone(&climb_button);
        Trigger::new(&scheduler, move || pressed.get()).toggle_on_true(climb);

        Ok(Self {
            scheduler,
            clock,
            period,
            drivetrain,
            intake,
            intake_button,
            climb_button,
            autonomous,
            events,
            backlog,
            overruns: 0,
        })
    }

    /// Apply the script for the next tick, then run it.
    pub fn step(&mut self) -> Result<(), CommandeerError> {
        let tick = self.scheduler.tick() + 1;
        match tick {
            1 => {
                self.scheduler.set_mode(RobotMode::Autonomous);
                self.scheduler.schedule(&self.autonomous)?;
            }
            TELEOP_AT => {
                self.scheduler.cancel(&self.autonomous);
                self.scheduler.set_mode(RobotMode::Teleop);
            }
            DISABLE_AT => {
                self.scheduler.set_mode(RobotMode::Disabled);
                self.scheduler
                    .schedule(&print("robot disabled").into_handle())?;
            }
            _ => {}
        }
        self.intake_button.set(INTAKE_HELD.contains(&tick));
        self.climb_button
            .set(CLIMB_PRESSES.iter().any(|press| press.contains(&tick)));

        self.scheduler.run()?;
        if self
            .scheduler
            .last_loop_report()
            .is_some_and(|report| report.overrun)
        {
            self.overruns += 1;
        }
        self.clock.advance(self.period);
        Ok(())
    }

    pub fn run_for(&mut self, ticks: u64) -> Result<SimulationReport, CommandeerError> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(self.report())
    }

    /// Events the in-memory journal still holds, when no file journal is set.
    pub fn recent_events(&self) -> Vec<SchedulerEvent> {
        self.backlog
            .as_ref()
            .map(MemoryJournal::snapshot)
            .unwrap_or_default()
    }

    pub fn report(&self) -> SimulationReport {
        let events = self.events.borrow().clone();
        let mut event_counts = BTreeMap::new();
        for event in &events {
            *event_counts.entry(event.kind.as_str().to_string()).or_insert(0) += 1;
        }
        SimulationReport {
            ticks: self.scheduler.tick(),
            mode: self.scheduler.mode(),
            distance_m: self.drivetrain.borrow().distance_m,
            pieces: self.intake.borrow().pieces,
            overruns: self.overruns,
            event_counts,
            snapshot: self.scheduler.snapshot(),
            events,
        }
    }
}

/// Per-tick transcript plus a summary block.
pub(crate) fn render_text(report: &SimulationReport, recent: &[SchedulerEvent]) -> String {
    use colored::Colorize;

    let mut out = String::new();
    for event in &report.events {
        let kind = match event.kind {
            EventKind::Initialized => event.kind.as_str().bright_green(),
            EventKind::Finished => event.kind.as_str().bright_cyan(),
            EventKind::Interrupted => event.kind.as_str().bright_yellow(),
            EventKind::Rejected => event.kind.as_str().bright_red(),
            EventKind::Executed => event.kind.as_str().normal(),
        };
        out.push_str(&format!(
            "[tick {:>4} | {:>6}ms] {:<12} {}\n",
            event.tick, event.time_ms, kind, event.command
        ));
    }
    out.push('\n');
    out.push_str(&format!("{}\n", "SIMULATION SUMMARY".bold()));
    out.push_str(&format!("  ticks:       {}\n", report.ticks));
    out.push_str(&format!("  final mode:  {}\n", report.mode.as_str()));
    out.push_str(&format!("  distance:    {:.2} m\n", report.distance_m));
    out.push_str(&format!("  pieces:      {}\n", report.pieces));
    out.push_str(&format!("  overruns:    {}\n", report.overruns));
    for (kind, count) in &report.event_counts {
        out.push_str(&format!("  {:<12} {}\n", format!("{}:", kind), count));
    }
    let scheduled: Vec<&str> = report
        .snapshot
        .scheduled
        .iter()
        .map(|command| command.name.as_str())
        .collect();
    out.push_str(&format!(
        "  scheduled:   {}\n",
        if scheduled.is_empty() {
            "(none)".to_string()
        } else {
            scheduled.join(", ")
        }
    ));
    if !recent.is_empty() {
        out.push_str(&format!("  journal:     {} events in memory\n", recent.len()));
    }
    out
}
