//! Timing relationships shared by the scheduler and the IR capture machine.
//!
//! Everything in this crate counts in hardware timer ticks; these constants
//! pin down the tick rate so the same logic ports across hardware timers.

/// Microseconds per hardware timer interrupt (20 kHz tick).
pub const TICK_MICROS: u32 = 50;

/// Hardware ticks per scheduler millisecond.
pub const TICKS_PER_MS: u32 = 1000 / TICK_MICROS;

/// Minimum silence between two IR transmissions, in microseconds.
pub const GAP_MICROS: u32 = 20_000;

/// The inter-frame gap expressed in hardware ticks.
pub const GAP_TICKS: u16 = (GAP_MICROS / TICK_MICROS) as u16;

/// Capacity of the raw IR capture buffer, in recorded run-lengths.
pub const RAW_CAPACITY: usize = 101;

/// Capacity of the task table.
pub const MAX_TASKS: usize = 9;

/// Longest accepted task name, in bytes.
pub const TASK_NAME_LEN: usize = 12;

/// Largest accepted task delay or period, in milliseconds.
pub const MAX_PERIOD_MS: u32 = 60_000;
