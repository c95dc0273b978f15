//! Cooperative periodic task scheduler.
//!
//! A fixed table of at most [`MAX_TASKS`] named tasks, each with a delay,
//! a period, and ready/enabled bookkeeping. The tick interrupt advances
//! every enabled countdown once per millisecond; the foreground runs every
//! ready task to completion with [`Scheduler::dispatch_all`]. There are no
//! priorities: dispatch order is registration order, always.
//!
//! If a task overruns its period the schedule is not compensated; the next
//! ready event still fires on the original phase.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::{String, Vec};

use crate::shared_constants::{MAX_PERIOD_MS, MAX_TASKS, TASK_NAME_LEN};
use crate::{Error, Result};

/// A task body: zero arguments, runs to completion, only the hardware tick
/// may preempt it.
pub type TaskFn = fn();

/// Bounded task identifier.
pub type TaskName = String<TASK_NAME_LEN>;

struct Task {
    func: TaskFn,
    name: TaskName,
    period_ms: u32,
    delay_ms: u32,
    countdown_ms: u32,
    enabled: bool,
    ready: bool,
    last_duration_ms: u32,
    max_duration_ms: u32,
}

/// One task's statistics, as returned by [`Scheduler::list_tasks`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskReport {
    pub name: TaskName,
    pub period_ms: u32,
    pub delay_ms: u32,
    pub countdown_ms: u32,
    pub enabled: bool,
    pub ready: bool,
    /// Duration of the most recent run, in scheduler milliseconds.
    pub last_duration_ms: u32,
    /// Largest duration ever observed. Diagnostic only; never reset.
    pub max_duration_ms: u32,
}

// The table and its millisecond clock, one unit behind one lock. Methods
// here assume the caller already holds the critical section.
struct TaskTable {
    tasks: Vec<Task, MAX_TASKS>,
    clock_ms: u32,
}

impl TaskTable {
    const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            clock_ms: 0,
        }
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|task| task.name.as_str() == name)
            .ok_or(Error::TaskNameUnknown)
    }

    fn register(&mut self, name: &str, func: TaskFn, delay_ms: u32, period_ms: u32) -> Result<()> {
        if period_ms == 0 || period_ms > MAX_PERIOD_MS || delay_ms > MAX_PERIOD_MS {
            return Err(Error::TaskPeriodInvalid);
        }
        let name = TaskName::try_from(name).map_err(|()| Error::TaskNameTooLong)?;
        if self.tasks.iter().any(|task| task.name == name) {
            return Err(Error::TaskNameTaken);
        }
        let task = Task {
            func,
            name,
            period_ms,
            delay_ms,
            countdown_ms: delay_ms,
            enabled: true,
            ready: false,
            last_duration_ms: 0,
            max_duration_ms: 0,
        };
        self.tasks.push(task).map_err(|_| Error::TaskTableFull)
    }

    /// One millisecond has elapsed: advance every enabled countdown, in
    /// registration order. A countdown hitting zero marks the task ready
    /// and reloads the period; a zero delay fires on the first tick.
    fn tick(&mut self) {
        self.clock_ms = self.clock_ms.wrapping_add(1);
        for task in &mut self.tasks {
            if !task.enabled {
                continue;
            }
            if task.countdown_ms > 0 {
                task.countdown_ms -= 1;
            }
            if task.countdown_ms == 0 {
                task.ready = true;
                task.countdown_ms = task.period_ms;
            }
        }
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let index = self.position(name)?;
        self.tasks[index].enabled = enabled;
        Ok(())
    }

    fn set_period(&mut self, name: &str, period_ms: u32) -> Result<()> {
        if period_ms == 0 || period_ms > MAX_PERIOD_MS {
            return Err(Error::TaskPeriodInvalid);
        }
        let index = self.position(name)?;
        // Takes effect at the next reload; the countdown in flight keeps
        // its phase.
        self.tasks[index].period_ms = period_ms;
        Ok(())
    }
}

/// Shared owner of the task table.
///
/// `tick` is the interrupt side; everything else is the foreground side.
/// Suitable for a `static`: all methods take `&self`, and no critical
/// section is ever held across a task invocation.
pub struct Scheduler {
    table: Mutex<RefCell<TaskTable>>,
}

impl Scheduler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: Mutex::new(RefCell::new(TaskTable::new())),
        }
    }

    /// Append a task. It starts enabled, not ready, with its countdown
    /// loaded from `delay_ms`.
    ///
    /// # Errors
    /// [`Error::TaskTableFull`] when [`MAX_TASKS`] tasks are registered,
    /// [`Error::TaskNameTaken`] on a duplicate name,
    /// [`Error::TaskNameTooLong`] past [`TASK_NAME_LEN`] bytes, and
    /// [`Error::TaskPeriodInvalid`] outside `1..=`[`MAX_PERIOD_MS`].
    pub fn register_task(
        &self,
        name: &str,
        func: TaskFn,
        delay_ms: u32,
        period_ms: u32,
    ) -> Result<()> {
        critical_section::with(|cs| {
            self.table
                .borrow_ref_mut(cs)
                .register(name, func, delay_ms, period_ms)
        })?;
        trace!("task {} registered: delay={}ms period={}ms", name, delay_ms, period_ms);
        Ok(())
    }

    /// Interrupt side: called once per millisecond.
    pub fn tick(&self) {
        critical_section::with(|cs| self.table.borrow_ref_mut(cs).tick());
    }

    /// Milliseconds of scheduler time since startup (wraps at `u32`).
    #[must_use]
    pub fn millis(&self) -> u32 {
        critical_section::with(|cs| self.table.borrow_ref(cs).clock_ms)
    }

    /// Let a task's countdown run again.
    ///
    /// # Errors
    /// [`Error::TaskNameUnknown`] when no task has that name.
    pub fn enable_task(&self, name: &str) -> Result<()> {
        critical_section::with(|cs| self.table.borrow_ref_mut(cs).set_enabled(name, true))
    }

    /// Freeze a task's countdown and suppress future ready events. Does
    /// not touch the countdown or a ready flag already set.
    ///
    /// # Errors
    /// [`Error::TaskNameUnknown`] when no task has that name.
    pub fn disable_task(&self, name: &str) -> Result<()> {
        critical_section::with(|cs| self.table.borrow_ref_mut(cs).set_enabled(name, false))
    }

    /// Change a task's period. Takes effect at the next reload.
    ///
    /// # Errors
    /// [`Error::TaskNameUnknown`] or [`Error::TaskPeriodInvalid`].
    pub fn set_task_period(&self, name: &str, period_ms: u32) -> Result<()> {
        critical_section::with(|cs| self.table.borrow_ref_mut(cs).set_period(name, period_ms))
    }

    /// Foreground loop body: scan the table once and run every ready task
    /// to completion, in registration order.
    ///
    /// The ready flag is claimed and cleared under the lock, the task runs
    /// with the lock released (so the tick interrupt keeps the clock
    /// advancing), and the measured duration is written back afterwards.
    pub fn dispatch_all(&self) {
        for slot in 0..MAX_TASKS {
            let claimed = critical_section::with(|cs| {
                let mut table = self.table.borrow_ref_mut(cs);
                let started_ms = table.clock_ms;
                match table.tasks.get_mut(slot) {
                    Some(task) if task.ready => {
                        task.ready = false;
                        Some((task.func, started_ms))
                    }
                    _ => None,
                }
            });
            let Some((func, started_ms)) = claimed else {
                continue;
            };

            func();

            critical_section::with(|cs| {
                let mut table = self.table.borrow_ref_mut(cs);
                let elapsed_ms = table.clock_ms.wrapping_sub(started_ms);
                if let Some(task) = table.tasks.get_mut(slot) {
                    task.last_duration_ms = elapsed_ms;
                    if elapsed_ms > task.max_duration_ms {
                        task.max_duration_ms = elapsed_ms;
                    }
                }
            });
        }
    }

    /// Diagnostic enumeration of every task and its statistics. No
    /// mutation.
    #[must_use]
    pub fn list_tasks(&self) -> Vec<TaskReport, MAX_TASKS> {
        critical_section::with(|cs| {
            let table = self.table.borrow_ref(cs);
            table
                .tasks
                .iter()
                .map(|task| TaskReport {
                    name: task.name.clone(),
                    period_ms: task.period_ms,
                    delay_ms: task.delay_ms,
                    countdown_ms: task.countdown_ms,
                    enabled: task.enabled,
                    ready: task.ready,
                    last_duration_ms: task.last_duration_ms,
                    max_duration_ms: task.max_duration_ms,
                })
                .collect()
        })
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
