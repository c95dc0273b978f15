//! NEC protocol decoder.
//!
//! Converts a finished capture (a [`CaptureSnapshot`] whose state is
//! [`CaptureState::Stop`]) into a 32-bit value or the repeat marker.
//!
//! Frame layout, as run-lengths starting at entry 1 (entry 0 is the gap):
//! a 9000 µs header mark, then either a 2250 µs repeat space plus a 560 µs
//! bit mark (4 entries total, "repeat the previous key"), or a 4500 µs
//! header space followed by 32 × (560 µs bit mark + 1690/560 µs one/zero
//! space), shifted in MSB-first.

use crate::ir_capture::{CaptureSnapshot, CaptureState};
use crate::shared_constants::TICK_MICROS;

// ===== NEC pulse parameters, in microseconds ================================

pub const NEC_BITS: usize = 32;
pub const NEC_HDR_MARK: u32 = 9000;
pub const NEC_HDR_SPACE: u32 = 4500;
pub const NEC_BIT_MARK: u32 = 560;
pub const NEC_ONE_SPACE: u32 = 1690;
pub const NEC_ZERO_SPACE: u32 = 560;
pub const NEC_RPT_SPACE: u32 = 2250;

/// Sensor lag: received marks read ~100 µs short, spaces ~100 µs long.
const MARK_EXCESS_MICROS: u32 = 100;

/// Accepted deviation either side of a nominal duration, in percent.
const TOLERANCE_PCT: u32 = 50;

// ===== Tolerance matching ===================================================

const fn ticks_low(desired_us: u32) -> u16 {
    (desired_us * (100 - TOLERANCE_PCT) / (100 * TICK_MICROS)) as u16
}

const fn ticks_high(desired_us: u32) -> u16 {
    // One extra tick of rounding slack on the high side.
    (desired_us * (100 + TOLERANCE_PCT) / (100 * TICK_MICROS) + 1) as u16
}

/// Does a measured run-length (in ticks) match a desired duration (in µs)?
#[must_use]
pub const fn matches(measured_ticks: u16, desired_us: u32) -> bool {
    measured_ticks >= ticks_low(desired_us) && measured_ticks <= ticks_high(desired_us)
}

/// Mark variant of [`matches`], compensating for sensor lag.
#[must_use]
pub const fn matches_mark(measured_ticks: u16, desired_us: u32) -> bool {
    matches(measured_ticks, desired_us - MARK_EXCESS_MICROS)
}

/// Space variant of [`matches`], compensating for sensor lag.
#[must_use]
pub const fn matches_space(measured_ticks: u16, desired_us: u32) -> bool {
    matches(measured_ticks, desired_us + MARK_EXCESS_MICROS)
}

// ===== Decode result ========================================================

/// A successfully decoded NEC transmission.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NecFrame {
    /// A full 32-bit frame, MSB-first as transmitted.
    Data(u32),
    /// The short "repeat the previous key" frame.
    Repeat,
}

impl NecFrame {
    /// Number of decoded data bits: 32 for a data frame, 0 for a repeat.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        match self {
            Self::Data(_) => NEC_BITS as u8,
            Self::Repeat => 0,
        }
    }

    /// The raw 32-bit value; a repeat frame carries the all-ones sentinel.
    #[must_use]
    pub const fn value(&self) -> u32 {
        match self {
            Self::Data(value) => *value,
            Self::Repeat => 0xFFFF_FFFF,
        }
    }
}

/// Decode one snapshot. Returns `None` unless the snapshot state is `Stop`
/// and every pulse falls inside its tolerance window.
#[must_use]
pub fn decode(snapshot: &CaptureSnapshot) -> Option<NecFrame> {
    if snapshot.state() != CaptureState::Stop {
        return None;
    }
    let raw = snapshot.entries();

    // Entry 0 is the gap before the transmission; decoding starts at 1.
    if !matches_mark(*raw.get(1)?, NEC_HDR_MARK) {
        return None;
    }

    if raw.len() == 4 && matches_space(raw[2], NEC_RPT_SPACE) && matches_mark(raw[3], NEC_BIT_MARK)
    {
        return Some(NecFrame::Repeat);
    }

    if raw.len() < 2 * NEC_BITS + 4 {
        return None;
    }
    if !matches_space(raw[2], NEC_HDR_SPACE) {
        return None;
    }

    let mut data: u32 = 0;
    let mut offset = 3;
    for _ in 0..NEC_BITS {
        if !matches_mark(raw[offset], NEC_BIT_MARK) {
            return None;
        }
        offset += 1;
        if matches_space(raw[offset], NEC_ONE_SPACE) {
            data = (data << 1) | 1;
        } else if matches_space(raw[offset], NEC_ZERO_SPACE) {
            data <<= 1;
        } else {
            return None;
        }
        offset += 1;
    }
    Some(NecFrame::Data(data))
}
