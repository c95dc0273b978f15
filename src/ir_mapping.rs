//! Maps decoded NEC frames to the clock's remote-control keys.
//!
//! The code table is fixed for the 17-key remote shipped with the clock.
//! What each key *means* (command modes, time entry, colour selection) is
//! the application's business, not this crate's.

use crate::ir_nec::NecFrame;

/// A button on the remote.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrKey {
    /// One of the `0`-`9` digit keys.
    Digit(u8),
    Up,
    Down,
    Left,
    Right,
    Ok,
    Asterisk,
    Hash,
    /// The previous key is still held down.
    Repeat,
}

impl IrKey {
    /// Look up a decoded 32-bit code.
    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0x00FF_4AB5 => Self::Digit(0),
            0x00FF_6897 => Self::Digit(1),
            0x00FF_9867 => Self::Digit(2),
            0x00FF_B04F => Self::Digit(3),
            0x00FF_30CF => Self::Digit(4),
            0x00FF_18E7 => Self::Digit(5),
            0x00FF_7A85 => Self::Digit(6),
            0x00FF_10EF => Self::Digit(7),
            0x00FF_38C7 => Self::Digit(8),
            0x00FF_5AA5 => Self::Digit(9),
            0x00FF_629D => Self::Up,
            0x00FF_A857 => Self::Down,
            0x00FF_22DD => Self::Left,
            0x00FF_C23D => Self::Right,
            0x00FF_02FD => Self::Ok,
            0x00FF_42BD => Self::Asterisk,
            0x00FF_52AD => Self::Hash,
            _ => return None,
        })
    }

    /// Map a decoded frame: repeat frames become [`IrKey::Repeat`], data
    /// frames go through the code table.
    #[must_use]
    pub const fn from_frame(frame: NecFrame) -> Option<Self> {
        match frame {
            NecFrame::Repeat => Some(Self::Repeat),
            NecFrame::Data(code) => Self::from_code(code),
        }
    }
}
