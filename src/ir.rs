//! Foreground hand-off for the IR capture machine.
//!
//! The interrupt exclusively owns and mutates the capture state; the
//! foreground reads it only through an atomic snapshot and resets it only
//! through [`IrReceiver::resume`]. Both sides go through the same
//! `critical-section` primitive, so a snapshot can never observe a
//! half-written capture.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::ir_capture::{Capture, CaptureSnapshot, IrLevel};
use crate::ir_nec::{self, NecFrame};
use crate::{Error, Result};

/// Shared owner of one [`Capture`] machine.
///
/// `sample` is the interrupt side; everything else is the foreground side.
/// Suitable for a `static`: all methods take `&self`.
pub struct IrReceiver {
    inner: Mutex<RefCell<Capture>>,
}

impl IrReceiver {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Capture::new())),
        }
    }

    /// Interrupt side: advance the capture machine by one hardware tick.
    pub fn sample(&self, level: IrLevel) {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).sample(level));
    }

    /// True iff the channel is quiescent (`Idle`) or a complete
    /// transmission is waiting (`Stop`).
    #[must_use]
    pub fn is_idle(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).state()).is_idle()
    }

    /// Atomically copy state, entries, count, and overflow flag as one unit.
    #[must_use]
    pub fn snapshot(&self) -> CaptureSnapshot {
        critical_section::with(|cs| self.inner.borrow_ref(cs).snapshot())
    }

    /// Snapshot and decode one pending transmission.
    ///
    /// On failure the pending capture is unconditionally discarded via
    /// [`resume`](Self::resume) so the machine is never left stuck. On
    /// success the frame stays buffered; the caller resumes after
    /// consuming it.
    ///
    /// # Errors
    /// [`Error::IrNoFrame`] when no transmission is ready or a pulse fell
    /// outside its tolerance window.
    pub fn decode_once(&self) -> Result<NecFrame> {
        let snapshot = self.snapshot();
        match ir_nec::decode(&snapshot) {
            Some(frame) => Ok(frame),
            None => {
                if snapshot.overflow() {
                    warn!("ir: capture overflow, frame discarded");
                }
                self.resume();
                Err(Error::IrNoFrame)
            }
        }
    }

    /// Atomically restart the capture machine (state `Idle`, count 0).
    /// Safe to call at any time.
    pub fn resume(&self) {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).resume());
    }
}

impl Default for IrReceiver {
    fn default() -> Self {
        Self::new()
    }
}
