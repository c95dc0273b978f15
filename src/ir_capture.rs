//! Edge-timing capture state machine for the infrared receiver.
//!
//! Runs inside the 50 µs tick interrupt: classifies the receiver level as
//! mark or space each tick and accumulates run-lengths (in ticks) into a
//! bounded buffer. Entry 0 is always the gap that preceded the
//! transmission. A sufficiently long space forces [`CaptureState::Stop`],
//! which is the foreground's cue that a complete transmission is waiting.
//!
//! This type is owned by the interrupt; the foreground only ever sees it
//! through [`CaptureSnapshot`] copies (see the `ir` module).

use heapless::Vec;

use crate::shared_constants::{GAP_TICKS, RAW_CAPACITY};

/// Receiver level for one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrLevel {
    /// Carrier present (receiver output low).
    Mark,
    /// Carrier absent (receiver output high).
    Space,
}

impl IrLevel {
    /// Classify a sampled pin level. The receiver is active-low: logic low
    /// means carrier present.
    #[must_use]
    pub const fn from_pin_low(is_low: bool) -> Self {
        if is_low { Self::Mark } else { Self::Space }
    }
}

/// Receiver state-machine states.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureState {
    /// In the middle of a gap; nothing recorded yet.
    Idle,
    /// Timing a mark.
    Mark,
    /// Timing a space.
    Space,
    /// A full transmission is buffered; timing the inter-frame gap.
    Stop,
    /// The raw buffer filled before the transmission ended.
    Overflow,
}

impl CaptureState {
    /// True for the two states in which the channel is quiescent and a
    /// frame may be waiting.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle | Self::Stop)
    }
}

/// Interrupt-owned capture bookkeeping: current state, the tick counter for
/// the run in progress, and the recorded run-lengths.
pub struct Capture {
    state: CaptureState,
    /// Ticks since the last recorded edge. Saturates during long silence
    /// so an hours-long gap still reads as "at least a gap".
    timer: u16,
    entries: Vec<u16, RAW_CAPACITY>,
    overflow: bool,
}

impl Capture {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            timer: 0,
            entries: Vec::new(),
            overflow: false,
        }
    }

    /// Advance the machine by one hardware tick.
    ///
    /// Must be called exactly once per tick, from the interrupt context
    /// only. Never blocks, never allocates.
    pub fn sample(&mut self, level: IrLevel) {
        self.timer = self.timer.saturating_add(1);

        // Buffer exhausted mid-transmission: self-heal by forcing Stop
        // below. No entry is recorded on this path.
        if self.entries.is_full() && self.state != CaptureState::Stop {
            self.state = CaptureState::Overflow;
        }

        match self.state {
            CaptureState::Idle => {
                if level == IrLevel::Mark {
                    if self.timer < GAP_TICKS {
                        // Not long enough to be a gap; just noise.
                        self.timer = 0;
                    } else {
                        // Gap just ended: record its length as entry 0 and
                        // start logging the transmission.
                        self.overflow = false;
                        self.entries.clear();
                        let _ = self.entries.push(self.timer);
                        self.timer = 0;
                        self.state = CaptureState::Mark;
                    }
                }
            }
            CaptureState::Mark => {
                if level == IrLevel::Space {
                    let _ = self.entries.push(self.timer);
                    self.timer = 0;
                    self.state = CaptureState::Space;
                }
            }
            CaptureState::Space => match level {
                IrLevel::Mark => {
                    let _ = self.entries.push(self.timer);
                    self.timer = 0;
                    self.state = CaptureState::Mark;
                }
                IrLevel::Space => {
                    if self.timer > GAP_TICKS {
                        // A long space marks the end of the transmission.
                        // Keep counting: Stop times the inter-frame gap.
                        self.state = CaptureState::Stop;
                    }
                }
            },
            CaptureState::Stop => {
                if level == IrLevel::Mark {
                    self.timer = 0;
                }
            }
            CaptureState::Overflow => {
                self.overflow = true;
                self.state = CaptureState::Stop;
            }
        }
    }

    /// Restart the machine. Safe at any time; the buffer is only rewound,
    /// never handed out, so the interrupt can't write entries the
    /// foreground is still reading.
    pub fn resume(&mut self) {
        self.state = CaptureState::Idle;
        self.entries.clear();
        self.overflow = false;
    }

    #[must_use]
    pub const fn state(&self) -> CaptureState {
        self.state
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn overflow(&self) -> bool {
        self.overflow
    }

    /// Copy out everything the decoder needs, as one unit. The caller is
    /// responsible for doing this inside a critical section.
    #[must_use]
    pub fn snapshot(&self) -> CaptureSnapshot {
        let mut buf = [0_u16; RAW_CAPACITY];
        buf[..self.entries.len()].copy_from_slice(&self.entries);
        CaptureSnapshot {
            state: self.state,
            len: self.entries.len(),
            overflow: self.overflow,
            buf,
        }
    }
}

impl Default for Capture {
    fn default() -> Self {
        Self::new()
    }
}

/// An immutable copy of the capture fields the decoder reads, taken
/// atomically so the interrupt cannot mutate mid-copy.
#[derive(Clone)]
pub struct CaptureSnapshot {
    state: CaptureState,
    len: usize,
    overflow: bool,
    buf: [u16; RAW_CAPACITY],
}

impl CaptureSnapshot {
    /// Build a snapshot from raw run-lengths. Entries beyond the buffer
    /// capacity are ignored.
    #[must_use]
    pub fn from_entries(state: CaptureState, entries: &[u16], overflow: bool) -> Self {
        let len = entries.len().min(RAW_CAPACITY);
        let mut buf = [0_u16; RAW_CAPACITY];
        buf[..len].copy_from_slice(&entries[..len]);
        Self {
            state,
            len,
            overflow,
            buf,
        }
    }

    #[must_use]
    pub const fn state(&self) -> CaptureState {
        self.state
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn overflow(&self) -> bool {
        self.overflow
    }

    /// The recorded run-lengths, in ticks.
    #[must_use]
    pub fn entries(&self) -> &[u16] {
        &self.buf[..self.len]
    }
}
