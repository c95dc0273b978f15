//! Real-time core for a Nixie-tube clock.
//!
//! One 50 µs hardware timer tick is multiplexed between two time-critical
//! jobs: advancing a cooperative millisecond task scheduler and sampling
//! an NEC infrared remote signal. [`TickDispatcher`] is the single
//! interrupt entry point; the foreground loop polls it for ready tasks and
//! decoded keys. All cross-context state lives behind one scoped
//! critical-section primitive, so the foreground never sees a torn read.
#![no_std]

// Must come first so the defmt/log shim macros are visible everywhere.
#[macro_use]
mod fmt;

mod dispatcher;
mod error;
mod ir;
mod ir_capture;
mod ir_mapping;
mod ir_nec;
mod scheduler;
mod shared_constants;

// Re-export commonly used items
pub use dispatcher::TickDispatcher;
pub use error::{Error, Result};
pub use ir::IrReceiver;
pub use ir_capture::{Capture, CaptureSnapshot, CaptureState, IrLevel};
pub use ir_mapping::IrKey;
pub use ir_nec::{
    NEC_BIT_MARK, NEC_BITS, NEC_HDR_MARK, NEC_HDR_SPACE, NEC_ONE_SPACE, NEC_RPT_SPACE,
    NEC_ZERO_SPACE, NecFrame, decode, matches, matches_mark, matches_space,
};
pub use scheduler::{Scheduler, TaskFn, TaskName, TaskReport};
pub use shared_constants::*;
