//! The interrupt tick dispatcher: one object owning everything the 20 kHz
//! hardware timer interrupt touches.
//!
//! Each tick, in fixed order: (1) sample the IR receiver and advance the
//! capture machine; (2) bump the 50 µs sub-tick counter and, every
//! [`TICKS_PER_MS`]-th tick, advance the scheduler by one millisecond.
//! The whole path is non-blocking and allocation-free; the hardware keeps
//! further tick interrupts masked until the call returns, so it is never
//! reentrant.

use embedded_hal::digital::InputPin;
use portable_atomic::{AtomicU32, Ordering};

use crate::ir::IrReceiver;
use crate::ir_capture::IrLevel;
use crate::ir_mapping::IrKey;
use crate::scheduler::Scheduler;
use crate::shared_constants::TICKS_PER_MS;
use crate::Result;

/// Owner of the scheduler and IR receiver shared between the tick
/// interrupt and the foreground loop.
///
/// Suitable for a `static`; the interrupt calls [`on_tick`](Self::on_tick)
/// and the foreground polls [`dispatch_all`](Self::dispatch_all) and
/// [`poll_key`](Self::poll_key).
pub struct TickDispatcher {
    scheduler: Scheduler,
    ir: IrReceiver,
    // Interrupt-owned 50µs counter; atomic so the struct stays shareable.
    subtick: AtomicU32,
}

impl TickDispatcher {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scheduler: Scheduler::new(),
            ir: IrReceiver::new(),
            subtick: AtomicU32::new(0),
        }
    }

    /// The task scheduler half.
    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The IR receiver half.
    #[must_use]
    pub const fn ir(&self) -> &IrReceiver {
        &self.ir
    }

    /// The hardware entry point. Call from the timer interrupt, once per
    /// 50 µs tick, with the receiver level sampled this tick.
    pub fn on_tick(&self, level: IrLevel) {
        self.ir.sample(level);

        let elapsed = self.subtick.load(Ordering::Relaxed) + 1;
        if elapsed >= TICKS_PER_MS {
            self.subtick.store(0, Ordering::Relaxed);
            self.scheduler.tick();
        } else {
            self.subtick.store(elapsed, Ordering::Relaxed);
        }
    }

    /// [`on_tick`](Self::on_tick), sampling an active-low receiver pin.
    ///
    /// # Errors
    /// Propagates the pin's read error.
    pub fn on_tick_from_pin<P: InputPin>(&self, pin: &mut P) -> Result<(), P::Error> {
        let level = IrLevel::from_pin_low(pin.is_low()?);
        self.on_tick(level);
        Ok(())
    }

    /// Foreground loop body: run every ready task to completion.
    pub fn dispatch_all(&self) {
        self.scheduler.dispatch_all();
    }

    /// Decode one pending IR transmission and map it to a remote key.
    ///
    /// Returns `None` when nothing is ready, the frame was malformed, or
    /// the code is not on the remote. The capture machine is resumed in
    /// every case except "still receiving".
    pub fn poll_key(&self) -> Option<IrKey> {
        if !self.ir.is_idle() {
            return None;
        }
        let frame = self.ir.decode_once().ok()?;
        let key = IrKey::from_frame(frame);
        self.ir.resume();
        if key.is_none() {
            trace!("ir: unrecognized remote code");
        }
        key
    }
}

impl Default for TickDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
