#[path = "../common/mod.rs"]
mod common;

use commandeer::commands::{CommandExt, FunctionalCommand, InstantCommand};
use commandeer::core::clock::ManualClock;
use commandeer::core::command::{CommandHandle, Requirements};
use commandeer::core::config::SchedulerConfig;
use commandeer::core::error::CommandeerError;
use commandeer::core::journal::{EventKind, InterruptCause, MemoryJournal, SchedulerEvent, read_journal};
use commandeer::core::scheduler::{RobotMode, ScheduleOutcome, Scheduler};
use commandeer::core::subsystem::SubsystemId;
use common::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tempfile::tempdir;

fn recorded_events(scheduler: &Scheduler) -> Rc<RefCell<Vec<SchedulerEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    scheduler.on_event(move |event| sink.borrow_mut().push(event.clone()));
    events
}

#[test]
fn command_runs_until_finished_and_releases_its_subsystem() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let arm = scheduler.register_resource("arm");
    let c = Recorder::new("C", &log)
        .requiring(&[arm])
        .finishing_after(3)
        .into_handle();

    assert_eq!(scheduler.schedule(&c).expect("schedule"), ScheduleOutcome::Scheduled);
    run_ticks(&scheduler, &clock, 1);
    assert!(scheduler.is_scheduled(&c));
    assert_eq!(scheduler.requiring(arm), Some(c.clone()));

    run_ticks(&scheduler, &clock, 2);
    assert!(!scheduler.is_scheduled(&c));
    assert!(scheduler.requiring(arm).is_none());
    assert_eq!(
        entries(&log),
        vec!["C.init", "C.exec", "C.exec", "C.exec", "C.end(false)"]
    );
}

#[test]
fn default_command_takes_over_in_the_tick_a_command_finishes() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let arm = scheduler.register_resource("arm");
    let idle = Recorder::new("D", &log).requiring(&[arm]).into_handle();
    scheduler.set_default_command(arm, idle.clone()).expect("default");

    let c = Recorder::new("C", &log)
        .requiring(&[arm])
        .finishing_after(3)
        .into_handle();
    scheduler.schedule(&c).expect("schedule");
    run_ticks(&scheduler, &clock, 3);

    assert!(!scheduler.is_scheduled(&c));
    assert_eq!(scheduler.requiring(arm), Some(idle.clone()));
    assert_eq!(count(&log, "D.init"), 1);
    assert!(position(&log, "C.end(false)") < position(&log, "D.init"));
}

#[test]
fn default_command_starts_on_first_run_and_keeps_running() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let arm = scheduler.register_resource("arm");
    let idle = Recorder::new("D", &log).requiring(&[arm]).into_handle();
    scheduler.set_default_command(arm, idle.clone()).expect("default");
    assert!(!scheduler.is_scheduled(&idle));

    run_ticks(&scheduler, &clock, 1);
    assert!(scheduler.is_scheduled(&idle));
    run_ticks(&scheduler, &clock, 10);
    assert!(scheduler.is_scheduled(&idle));
    assert_eq!(count(&log, "D.init"), 1);
    assert_eq!(count(&log, "D.exec"), 10);
}

#[test]
fn conflicting_schedule_interrupts_a_cancel_self_incumbent() {
    let (scheduler, _clock) = enabled_scheduler();
    let log = new_log();
    let drive = scheduler.register_resource("drive");
    let a = Recorder::new("A", &log).requiring(&[drive]).into_handle();
    let b = Recorder::new("B", &log).requiring(&[drive]).into_handle();
    let events = recorded_events(&scheduler);

    scheduler.schedule(&a).expect("schedule a");
    assert_eq!(scheduler.schedule(&b).expect("schedule b"), ScheduleOutcome::Scheduled);

    assert!(!scheduler.is_scheduled(&a));
    assert!(scheduler.is_scheduled(&b));
    assert_eq!(entries(&log), vec!["A.init", "A.end(true)", "B.init"]);
    let interrupted = events
        .borrow()
        .iter()
        .find(|e| e.kind == EventKind::Interrupted)
        .cloned()
        .expect("interrupted event");
    assert_eq!(
        interrupted.cause,
        Some(InterruptCause::Conflict {
            by: b.id(),
            by_name: "B".to_string()
        })
    );
}

#[test]
fn cancel_incoming_incumbent_rejects_the_newcomer() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let drive = scheduler.register_resource("drive");
    let arm = scheduler.register_resource("arm");
    let a = Recorder::new("A", &log)
        .requiring(&[drive])
        .cancel_incoming()
        .into_handle();
    let b = Recorder::new("B", &log).requiring(&[arm, drive]).into_handle();
    let events = recorded_events(&scheduler);

    scheduler.schedule(&a).expect("schedule a");
    let outcome = scheduler.schedule(&b).expect("schedule b");
    assert_eq!(outcome, ScheduleOutcome::Rejected { by: a.id() });
    assert!(!outcome.is_accepted());

    run_ticks(&scheduler, &clock, 1);
    assert!(scheduler.is_scheduled(&a));
    assert!(!scheduler.is_scheduled(&b));
    assert!(scheduler.requiring(arm).is_none());
    assert_eq!(count(&log, "B.init"), 0);
    assert!(events.borrow().iter().any(|e| e.kind == EventKind::Rejected && e.command == "B"));
}

#[test]
fn duplicate_schedule_and_stray_cancel_are_no_ops() {
    let (scheduler, _clock) = enabled_scheduler();
    let log = new_log();
    let a = Recorder::new("A", &log).into_handle();
    let stray = Recorder::new("Stray", &log).into_handle();

    scheduler.schedule(&a).expect("schedule");
    assert_eq!(
        scheduler.schedule(&a).expect("schedule again"),
        ScheduleOutcome::AlreadyScheduled
    );
    scheduler.cancel(&stray);

    assert_eq!(entries(&log), vec!["A.init"]);
    assert_eq!(scheduler.scheduled_commands(), vec![a]);
}

#[test]
fn disabling_cancels_only_commands_that_cannot_run_disabled() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let a = Recorder::new("A", &log).into_handle();
    let b = Recorder::new("B", &log).runs_disabled().into_handle();
    scheduler.schedule_all(&[a.clone(), b.clone()]).expect("schedule");
    let events = recorded_events(&scheduler);

    scheduler.set_mode(RobotMode::Disabled);
    assert!(!scheduler.is_scheduled(&a));
    assert!(scheduler.is_scheduled(&b));
    assert_eq!(count(&log, "A.end(true)"), 1);
    assert_eq!(
        events.borrow()[0].cause,
        Some(InterruptCause::Disabled)
    );

    let c = Recorder::new("C", &log).into_handle();
    assert_eq!(scheduler.schedule(&c).expect("schedule"), ScheduleOutcome::Disabled);
    run_ticks(&scheduler, &clock, 2);
    assert_eq!(count(&log, "B.exec"), 2);
    assert_eq!(count(&log, "C.init"), 0);
}

#[test]
fn cancel_all_ends_each_command_once_even_when_called_mid_execute() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let a = Recorder::new("A", &log).into_handle();
    let b = Recorder::new("B", &log).into_handle();
    let late = Recorder::new("Late", &log).into_handle();

    let weak = scheduler.downgrade();
    let spawned = late.clone();
    let x_log = Rc::clone(&log);
    let x = FunctionalCommand::new(
        || {},
        move || {
            let scheduler = weak.upgrade().expect("scheduler alive");
            let outcome = scheduler.schedule(&spawned).expect("schedule late");
            assert_eq!(outcome, ScheduleOutcome::Deferred);
            assert!(scheduler.is_scheduled(&spawned));
            scheduler.cancel_all();
        },
        move |interrupted| x_log.borrow_mut().push(format!("X.end({interrupted})")),
        || false,
        &[],
    )
    .with_name("X")
    .into_handle();

    scheduler
        .schedule_all(&[a.clone(), x.clone(), b.clone()])
        .expect("schedule");
    run_ticks(&scheduler, &clock, 1);

    for label in ["A", "X", "B"] {
        assert_eq!(count(&log, &format!("{label}.end(true)")), 1, "{label}");
    }
    // B was already marked for cancellation when its turn came.
    assert_eq!(count(&log, "B.exec"), 0);
    assert_eq!(count(&log, "Late.init"), 1);
    assert!(scheduler.is_scheduled(&late));
    assert!(!scheduler.is_scheduled(&a));
    assert!(!scheduler.is_scheduled(&x));
}

/// Command that runs `requests` against the scheduler on its first execute.
fn requester(scheduler: &Scheduler, requests: impl Fn(&Scheduler) + 'static) -> CommandHandle {
    let weak = scheduler.downgrade();
    let fired = Cell::new(false);
    FunctionalCommand::new(
        || {},
        move || {
            if !fired.replace(true) {
                requests(&weak.upgrade().expect("scheduler alive"));
            }
        },
        |_| {},
        || false,
        &[],
    )
    .with_name("Requester")
    .into_handle()
}

#[test]
fn cancel_then_reschedule_mid_execute_restarts_the_command() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let b = Recorder::new("B", &log).into_handle();

    let target = b.clone();
    let x = requester(&scheduler, move |scheduler| {
        scheduler.cancel(&target);
        assert!(!scheduler.is_scheduled(&target));
        let outcome = scheduler.schedule(&target).expect("reschedule");
        assert_eq!(outcome, ScheduleOutcome::Deferred);
        assert!(scheduler.is_scheduled(&target));
    });

    scheduler.schedule_all(&[b.clone(), x]).expect("schedule");
    run_ticks(&scheduler, &clock, 1);

    assert!(scheduler.is_scheduled(&b));
    assert_eq!(entries(&log), vec!["B.init", "B.exec", "B.end(true)", "B.init"]);
}

#[test]
fn cancel_of_a_blocking_holder_mid_execute_frees_the_subsystem_for_the_next_request() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let drive = scheduler.register_resource("drive");
    let b = Recorder::new("B", &log)
        .requiring(&[drive])
        .cancel_incoming()
        .into_handle();
    let c = Recorder::new("C", &log).requiring(&[drive]).into_handle();

    let (holder, next) = (b.clone(), c.clone());
    let x = requester(&scheduler, move |scheduler| {
        scheduler.cancel(&holder);
        let outcome = scheduler.schedule(&next).expect("schedule c");
        assert_eq!(outcome, ScheduleOutcome::Deferred);
        assert!(outcome.is_accepted());
    });

    scheduler.schedule_all(&[b.clone(), x]).expect("schedule");
    run_ticks(&scheduler, &clock, 1);

    assert!(!scheduler.is_scheduled(&b));
    assert!(scheduler.is_scheduled(&c));
    assert_eq!(scheduler.requiring(drive), Some(c));
    assert!(position(&log, "B.end(true)") < position(&log, "C.init"));
}

#[test]
fn schedule_then_cancel_mid_execute_never_starts_the_command() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let late = Recorder::new("Late", &log).into_handle();

    let target = late.clone();
    let x = requester(&scheduler, move |scheduler| {
        scheduler.schedule(&target).expect("schedule late");
        scheduler.cancel(&target);
        assert!(!scheduler.is_scheduled(&target));
    });

    scheduler.schedule(&x).expect("schedule");
    run_ticks(&scheduler, &clock, 1);

    assert!(!scheduler.is_scheduled(&late));
    assert!(entries(&log).is_empty());
}

#[test]
fn command_canceling_itself_from_initialize_still_ends_once() {
    let (scheduler, _clock) = enabled_scheduler();
    let log = new_log();
    let slot: Rc<RefCell<Option<CommandHandle>>> = Rc::new(RefCell::new(None));

    let weak = scheduler.downgrade();
    let me = Rc::clone(&slot);
    let (init_log, end_log) = (Rc::clone(&log), Rc::clone(&log));
    let handle = FunctionalCommand::new(
        move || {
            init_log.borrow_mut().push("S.init".to_string());
            if let (Some(scheduler), Some(me)) = (weak.upgrade(), me.borrow().as_ref()) {
                scheduler.cancel(me);
            }
        },
        || {},
        move |interrupted| end_log.borrow_mut().push(format!("S.end({interrupted})")),
        || false,
        &[],
    )
    .into_handle();
    *slot.borrow_mut() = Some(handle.clone());

    scheduler.schedule(&handle).expect("schedule");
    assert_eq!(entries(&log), vec!["S.init", "S.end(true)"]);
    assert!(!scheduler.is_scheduled(&handle));
}

#[test]
fn rescheduling_from_inside_end_is_a_reentrancy_error() {
    let (scheduler, _clock) = enabled_scheduler();
    let slot: Rc<RefCell<Option<CommandHandle>>> = Rc::new(RefCell::new(None));
    let observed: Rc<RefCell<Option<Result<ScheduleOutcome, CommandeerError>>>> =
        Rc::new(RefCell::new(None));

    let weak = scheduler.downgrade();
    let me = Rc::clone(&slot);
    let result = Rc::clone(&observed);
    let handle = FunctionalCommand::new(
        || {},
        || {},
        move |_| {
            if let (Some(scheduler), Some(me)) = (weak.upgrade(), me.borrow().as_ref()) {
                *result.borrow_mut() = Some(scheduler.schedule(me));
            }
        },
        || false,
        &[],
    )
    .into_handle();
    *slot.borrow_mut() = Some(handle.clone());

    scheduler.schedule(&handle).expect("schedule");
    scheduler.cancel(&handle);
    assert!(matches!(
        observed.borrow().as_ref(),
        Some(Err(CommandeerError::ReentrantCommand(_)))
    ));
    assert!(!scheduler.is_scheduled(&handle));
}

#[test]
fn single_use_command_cannot_be_scheduled_after_it_ran() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let once = CommandHandle::single_use(Recorder::new("Once", &log).finishing_after(1));

    scheduler.schedule(&once).expect("first schedule");
    run_ticks(&scheduler, &clock, 1);
    assert!(once.is_consumed());

    let err = scheduler.schedule(&once).expect_err("consumed");
    assert!(matches!(err, CommandeerError::CommandConsumed(name) if name == "Once"));
    assert_eq!(count(&log, "Once.init"), 1);
}

#[test]
fn default_command_must_require_exactly_its_subsystem() {
    let (scheduler, _clock) = enabled_scheduler();
    let log = new_log();
    let drive = scheduler.register_resource("drive");
    let arm = scheduler.register_resource("arm");

    let both = Recorder::new("Both", &log).requiring(&[drive, arm]).into_handle();
    let err = scheduler
        .set_default_command(drive, both)
        .expect_err("two requirements");
    assert!(matches!(err, CommandeerError::DefaultCommandError(_)));

    let none = Recorder::new("None", &log).into_handle();
    assert!(scheduler.set_default_command(drive, none).is_err());

    let ghost = SubsystemId::next();
    let orphan = Recorder::new("Orphan", &log).requiring(&[ghost]).into_handle();
    let err = scheduler
        .set_default_command(ghost, orphan)
        .expect_err("unregistered");
    assert!(matches!(err, CommandeerError::UnknownSubsystem(_)));
    assert!(scheduler.default_command(drive).is_none());
}

#[test]
fn single_use_default_command_is_rejected() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let drive = scheduler.register_resource("drive");
    let once = CommandHandle::single_use(Recorder::new("Once", &log).requiring(&[drive]));

    let err = scheduler
        .set_default_command(drive, once)
        .expect_err("single-use default");
    assert!(matches!(err, CommandeerError::DefaultCommandError(msg) if msg.contains("single-use")));
    assert!(scheduler.default_command(drive).is_none());

    run_ticks(&scheduler, &clock, 3);
    assert!(entries(&log).is_empty());
}

#[test]
fn new_scheduler_is_disabled_until_a_mode_is_set() {
    let clock = ManualClock::new();
    let scheduler = Scheduler::new(clock.handle());
    let log = new_log();
    let cmd = Recorder::new("P", &log).into_handle();

    assert_eq!(scheduler.schedule(&cmd).expect("schedule"), ScheduleOutcome::Disabled);
    scheduler.set_mode(RobotMode::Teleop);
    assert_eq!(scheduler.schedule(&cmd).expect("schedule"), ScheduleOutcome::Scheduled);
}

#[test]
fn replacing_a_running_default_interrupts_the_old_one() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let drive = scheduler.register_resource("drive");
    let first = Recorder::new("D1", &log).requiring(&[drive]).into_handle();
    let second = Recorder::new("D2", &log).requiring(&[drive]).into_handle();

    scheduler.set_default_command(drive, first.clone()).expect("default");
    run_ticks(&scheduler, &clock, 1);
    scheduler.set_default_command(drive, second.clone()).expect("replace");
    assert_eq!(count(&log, "D1.end(true)"), 1);

    run_ticks(&scheduler, &clock, 1);
    assert_eq!(scheduler.requiring(drive), Some(second.clone()));
    assert_eq!(scheduler.default_command(drive), Some(second));

    assert!(scheduler.remove_default_command(drive).is_some());
    assert!(scheduler.requiring(drive).is_none());
}

#[test]
fn unregistering_a_subsystem_cancels_its_holder_and_forgets_the_default() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let drive = scheduler.register_resource("drive");
    let idle = Recorder::new("D", &log).requiring(&[drive]).into_handle();
    scheduler.set_default_command(drive, idle.clone()).expect("default");
    run_ticks(&scheduler, &clock, 1);
    let events = recorded_events(&scheduler);

    scheduler.unregister_subsystem(drive);
    assert!(!scheduler.is_registered(drive));
    assert!(!scheduler.is_scheduled(&idle));
    assert_eq!(events.borrow()[0].cause, Some(InterruptCause::Unregistered));

    run_ticks(&scheduler, &clock, 3);
    assert_eq!(count(&log, "D.init"), 1);
}

#[test]
fn no_subsystem_is_ever_held_twice() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let ids: Vec<SubsystemId> = (0..4)
        .map(|i| scheduler.register_resource(format!("s{i}")))
        .collect();
    let commands: Vec<CommandHandle> = (0..12)
        .map(|i| {
            let requires = [ids[i % 4], ids[(i * 7 + 1) % 4]];
            let recorder = Recorder::new(&format!("P{i}"), &log)
                .requiring(&requires)
                .finishing_after(1 + (i as u32 % 3));
            if i % 5 == 0 {
                recorder.cancel_incoming().into_handle()
            } else {
                recorder.into_handle()
            }
        })
        .collect();

    for round in 0..6 {
        for (i, command) in commands.iter().enumerate() {
            if (i + round) % 2 == 0 {
                scheduler.schedule(command).expect("schedule");
            }
            let mut held = Requirements::new();
            for scheduled in scheduler.scheduled_commands() {
                for requirement in scheduled.requirements() {
                    assert!(held.insert(*requirement), "{requirement} held twice");
                    assert_eq!(scheduler.requiring(*requirement), Some(scheduled.clone()));
                }
            }
        }
        run_ticks(&scheduler, &clock, 1);
    }

    for i in 0..12 {
        let inits = count(&log, &format!("P{i}.init"));
        let ends = count(&log, &format!("P{i}.end(false)")) + count(&log, &format!("P{i}.end(true)"));
        let running = usize::from(scheduler.is_scheduled(&commands[i]));
        assert_eq!(inits, ends + running, "P{i}");
    }
}

#[test]
fn memory_journal_skips_executed_events_by_default() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let journal = MemoryJournal::new(16);
    scheduler.set_journal(journal.clone());
    let a = Recorder::new("A", &log).into_handle();

    scheduler.schedule(&a).expect("schedule");
    run_ticks(&scheduler, &clock, 2);
    scheduler.cancel(&a);

    let kinds: Vec<EventKind> = journal.snapshot().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Initialized, EventKind::Interrupted]);
    assert_eq!(journal.snapshot()[1].cause, Some(InterruptCause::Canceled));
}

#[test]
fn configured_jsonl_journal_records_every_transition() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("logs").join("scheduler.events.jsonl");
    let mut config = SchedulerConfig::default();
    config.journal.path = Some(path.clone());
    config.journal.record_execute = true;

    let clock = ManualClock::new();
    let scheduler = Scheduler::with_config(config, clock.handle()).expect("scheduler");
    scheduler.set_mode(RobotMode::Autonomous);
    let log = new_log();
    let a = Recorder::new("A", &log).finishing_after(2).into_handle();
    scheduler.schedule(&a).expect("schedule");
    run_ticks(&scheduler, &clock, 2);

    let events = read_journal(&path).expect("read journal");
    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::Initialized,
            EventKind::Executed,
            EventKind::Executed,
            EventKind::Finished
        ]
    );
    assert_eq!(events[3].tick, 2);
    assert_eq!(events[3].time_ms, 20);
    assert!(events.iter().all(|e| e.command_id == a.id()));
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let mut config = SchedulerConfig::default();
    config.loop_period_ms = 0;
    let err = Scheduler::with_config(config, ManualClock::new().handle()).expect_err("zero period");
    assert!(matches!(err, CommandeerError::ConfigError(_)));
}

#[test]
fn snapshot_reports_holders_and_defaults() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let drive = scheduler.register_resource("drive");
    let arm = scheduler.register_resource("arm");
    let idle = Recorder::new("Idle", &log).requiring(&[drive]).into_handle();
    scheduler.set_default_command(drive, idle).expect("default");
    let lift = Recorder::new("Lift", &log).requiring(&[arm]).into_handle();
    scheduler.schedule(&lift).expect("schedule");
    run_ticks(&scheduler, &clock, 1);

    let snapshot = scheduler.snapshot();
    assert_eq!(snapshot.tick, 1);
    assert_eq!(snapshot.mode, RobotMode::Teleop);
    let names: Vec<&str> = snapshot.scheduled.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Lift", "Idle"]);
    assert_eq!(snapshot.scheduled[0].requirements, vec!["arm".to_string()]);

    let json = serde_json::to_value(&snapshot).expect("serialize");
    assert_eq!(json["subsystems"][0]["name"], "drive");
    assert_eq!(json["subsystems"][0]["holder"], "Idle");
    assert_eq!(json["subsystems"][0]["default_command"], "Idle");
    assert_eq!(json["subsystems"][1]["holder"], "Lift");
    assert_eq!(json["mode"], "teleop");
}

#[test]
fn slow_execute_is_reported_as_an_overrun() {
    let (scheduler, clock) = enabled_scheduler();
    let slow_clock = clock.clone();
    let slow = FunctionalCommand::new(
        || {},
        move || slow_clock.advance(Duration::from_millis(30)),
        |_| {},
        || false,
        &[],
    )
    .with_name("Slow")
    .into_handle();
    scheduler.schedule(&slow).expect("schedule");

    scheduler.run().expect("run");
    let report = scheduler.last_loop_report().expect("report");
    assert!(report.overrun);
    assert_eq!(report.period, Duration::from_millis(20));
    let slowest = report
        .epochs
        .iter()
        .max_by_key(|epoch| epoch.duration)
        .expect("epochs");
    assert_eq!(slowest.name, "Slow.execute()");
    assert!(report.render_epochs().contains("Slow.execute(): 30.000ms"));
}

#[test]
fn paused_scheduler_does_nothing() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let a = Recorder::new("A", &log).into_handle();
    scheduler.schedule(&a).expect("schedule");

    scheduler.pause();
    run_ticks(&scheduler, &clock, 3);
    assert_eq!(scheduler.tick(), 0);
    assert_eq!(count(&log, "A.exec"), 0);

    scheduler.resume();
    run_ticks(&scheduler, &clock, 1);
    assert_eq!(count(&log, "A.exec"), 1);
}

#[test]
fn subsystems_get_periodic_calls_every_tick() {
    let (scheduler, clock) = enabled_scheduler();
    let drive = CountingSubsystem::shared("drive");
    let id = scheduler.register_subsystem(&drive);
    assert_eq!(scheduler.subsystem_name(id), "drive");

    run_ticks(&scheduler, &clock, 2);
    scheduler.set_simulation(true);
    run_ticks(&scheduler, &clock, 3);

    assert_eq!(drive.borrow().periodic, 5);
    assert_eq!(drive.borrow().simulation_periodic, 3);
}

#[test]
fn commands_run_in_insertion_order() {
    let (scheduler, clock) = enabled_scheduler();
    let log = new_log();
    let handles: Vec<CommandHandle> = ["First", "Second", "Third"]
        .iter()
        .map(|label| Recorder::new(label, &log).into_handle())
        .collect();
    for handle in handles.iter().rev() {
        scheduler.schedule(handle).expect("schedule");
    }
    log.borrow_mut().clear();
    run_ticks(&scheduler, &clock, 1);
    assert_eq!(entries(&log), vec!["Third.exec", "Second.exec", "First.exec"]);
}

#[test]
fn instant_command_finishes_on_its_first_tick() {
    let (scheduler, clock) = enabled_scheduler();
    let fired = Rc::new(Cell::new(0));
    let counter = Rc::clone(&fired);
    let instant = InstantCommand::new(move || counter.set(counter.get() + 1), &[]).into_handle();

    scheduler.schedule(&instant).expect("schedule");
    assert_eq!(fired.get(), 1);
    assert!(scheduler.is_scheduled(&instant));
    run_ticks(&scheduler, &clock, 1);
    assert!(!scheduler.is_scheduled(&instant));

    scheduler.schedule(&instant).expect("reschedule");
    assert_eq!(fired.get(), 2);
}
