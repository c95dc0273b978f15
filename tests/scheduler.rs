//! Host-level tests for the cooperative task scheduler.
//!
//! `tick()` is called directly (one call = one scheduler millisecond), so
//! the tests stand in for the tick interrupt; `dispatch_all()` plays the
//! foreground loop.
#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use nixie_kit::{Error, Scheduler};

fn nop() {}

static CADENCE_TIMES: Mutex<Vec<u32>> = Mutex::new(Vec::new());
static CADENCE_NOW: AtomicU32 = AtomicU32::new(0);

fn cadence_task() {
    CADENCE_TIMES
        .lock()
        .unwrap()
        .push(CADENCE_NOW.load(Ordering::Relaxed));
}

#[test]
fn ready_cadence_matches_delay_and_period() {
    let sched = Scheduler::new();
    sched.register_task("cadence", cadence_task, 3, 7).unwrap();
    for now in 0..50_u32 {
        CADENCE_NOW.store(now, Ordering::Relaxed);
        sched.tick();
        sched.dispatch_all();
    }
    let times = CADENCE_TIMES.lock().unwrap();
    // floor((T - D) / P) + 1 ready events, each spaced exactly P apart.
    assert_eq!(times.len(), (50 - 3) / 7 + 1);
    for pair in times.windows(2) {
        assert_eq!(pair[1] - pair[0], 7);
    }
}

static SCENARIO_TIMES: Mutex<Vec<u32>> = Mutex::new(Vec::new());
static SCENARIO_NOW: AtomicU32 = AtomicU32::new(0);

fn scenario_task() {
    SCENARIO_TIMES
        .lock()
        .unwrap()
        .push(SCENARIO_NOW.load(Ordering::Relaxed));
}

#[test]
fn delay_zero_period_100_runs_at_0_100_200_only() {
    let sched = Scheduler::new();
    sched.register_task("A", scenario_task, 0, 100).unwrap();
    for now in 0..250_u32 {
        SCENARIO_NOW.store(now, Ordering::Relaxed);
        sched.tick();
        sched.dispatch_all();
    }
    assert_eq!(*SCENARIO_TIMES.lock().unwrap(), vec![0, 100, 200]);
}

#[test]
fn tenth_registration_fails_and_leaves_table_untouched() {
    let sched = Scheduler::new();
    for i in 0..9_u32 {
        sched
            .register_task(&format!("task{i}"), nop, 0, 10 + i)
            .unwrap();
    }
    let before = sched.list_tasks();
    assert_eq!(
        sched.register_task("one-too-many", nop, 0, 5),
        Err(Error::TaskTableFull)
    );
    let after = sched.list_tasks();
    assert_eq!(after, before);
    assert_eq!(after.len(), 9);
    assert!(after.iter().all(|report| report.enabled));
}

#[test]
fn duplicate_name_is_rejected() {
    let sched = Scheduler::new();
    sched.register_task("dup", nop, 0, 5).unwrap();
    assert_eq!(
        sched.register_task("dup", nop, 1, 9),
        Err(Error::TaskNameTaken)
    );
    assert_eq!(sched.list_tasks().len(), 1);
}

#[test]
fn unknown_name_lookup_fails_without_side_effects() {
    let sched = Scheduler::new();
    sched.register_task("real", nop, 2, 5).unwrap();
    let before = sched.list_tasks();
    assert_eq!(sched.enable_task("missing"), Err(Error::TaskNameUnknown));
    assert_eq!(sched.disable_task("missing"), Err(Error::TaskNameUnknown));
    assert_eq!(
        sched.set_task_period("missing", 10),
        Err(Error::TaskNameUnknown)
    );
    assert_eq!(sched.list_tasks(), before);
}

#[test]
fn invalid_name_and_timing_are_rejected() {
    let sched = Scheduler::new();
    assert_eq!(
        sched.register_task("much-too-long-name", nop, 0, 5),
        Err(Error::TaskNameTooLong)
    );
    assert_eq!(
        sched.register_task("zero", nop, 0, 0),
        Err(Error::TaskPeriodInvalid)
    );
    assert_eq!(
        sched.register_task("huge", nop, 0, 60_001),
        Err(Error::TaskPeriodInvalid)
    );
    assert_eq!(
        sched.register_task("late", nop, 60_001, 5),
        Err(Error::TaskPeriodInvalid)
    );
    assert!(sched.list_tasks().is_empty());
}

static TOGGLE_RUNS: AtomicU32 = AtomicU32::new(0);

fn toggle_task() {
    TOGGLE_RUNS.fetch_add(1, Ordering::Relaxed);
}

#[test]
fn disable_freezes_countdown_and_enable_resumes() {
    let sched = Scheduler::new();
    sched.register_task("blink", toggle_task, 0, 4).unwrap();
    for _ in 0..4 {
        sched.tick();
    }
    sched.dispatch_all();
    assert_eq!(TOGGLE_RUNS.load(Ordering::Relaxed), 1);

    sched.disable_task("blink").unwrap();
    for _ in 0..20 {
        sched.tick();
        sched.dispatch_all();
    }
    assert_eq!(TOGGLE_RUNS.load(Ordering::Relaxed), 1);

    // The countdown picks up exactly where it was frozen.
    sched.enable_task("blink").unwrap();
    sched.tick();
    sched.dispatch_all();
    assert_eq!(TOGGLE_RUNS.load(Ordering::Relaxed), 2);
}

static ORDER: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

fn order_zeta() {
    ORDER.lock().unwrap().push("zeta");
}

fn order_alpha() {
    ORDER.lock().unwrap().push("alpha");
}

#[test]
fn dispatch_order_is_registration_order() {
    let sched = Scheduler::new();
    sched.register_task("zeta", order_zeta, 0, 5).unwrap();
    sched.register_task("alpha", order_alpha, 0, 5).unwrap();
    sched.tick();
    sched.dispatch_all();
    assert_eq!(*ORDER.lock().unwrap(), vec!["zeta", "alpha"]);
}

static PERIOD_RUNS: AtomicU32 = AtomicU32::new(0);

fn period_task() {
    PERIOD_RUNS.fetch_add(1, Ordering::Relaxed);
}

#[test]
fn set_task_period_takes_effect_at_next_reload() {
    let sched = Scheduler::new();
    sched.register_task("p", period_task, 0, 10).unwrap();
    sched.tick();
    sched.dispatch_all();
    assert_eq!(PERIOD_RUNS.load(Ordering::Relaxed), 1);

    sched.set_task_period("p", 3).unwrap();
    // The countdown in flight keeps the old phase...
    for _ in 0..10 {
        sched.tick();
    }
    sched.dispatch_all();
    assert_eq!(PERIOD_RUNS.load(Ordering::Relaxed), 2);
    // ...and the new period applies from the reload on.
    for _ in 0..3 {
        sched.tick();
    }
    sched.dispatch_all();
    assert_eq!(PERIOD_RUNS.load(Ordering::Relaxed), 3);

    assert_eq!(sched.set_task_period("p", 0), Err(Error::TaskPeriodInvalid));
}

// Static so the task body can stand in for the tick interrupt preempting
// its own execution.
static BUSY_SCHED: Scheduler = Scheduler::new();
static BURN_MS: AtomicU32 = AtomicU32::new(0);

fn busy_task() {
    for _ in 0..BURN_MS.load(Ordering::Relaxed) {
        BUSY_SCHED.tick();
    }
}

#[test]
fn dispatch_records_last_and_max_duration() {
    BUSY_SCHED.register_task("busy", busy_task, 0, 50).unwrap();

    BURN_MS.store(5, Ordering::Relaxed);
    BUSY_SCHED.tick();
    BUSY_SCHED.dispatch_all();
    let report = &BUSY_SCHED.list_tasks()[0];
    assert_eq!(report.last_duration_ms, 5);
    assert_eq!(report.max_duration_ms, 5);

    BURN_MS.store(3, Ordering::Relaxed);
    for _ in 0..50 {
        BUSY_SCHED.tick();
    }
    BUSY_SCHED.dispatch_all();
    let report = &BUSY_SCHED.list_tasks()[0];
    assert_eq!(report.last_duration_ms, 3);
    assert_eq!(report.max_duration_ms, 5);
}

#[test]
fn millis_counts_tick_calls() {
    let sched = Scheduler::new();
    assert_eq!(sched.millis(), 0);
    for _ in 0..123 {
        sched.tick();
    }
    assert_eq!(sched.millis(), 123);
}
