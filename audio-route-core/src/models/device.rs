use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use serde::{Deserialize, Serialize};

/// Set of logical audio endpoints participating in a route.
///
/// Output devices occupy the low 16-bit word, input devices the high word.
/// Bit values follow the platform audio system's device constants, plus the
/// two FM outputs that boards with an FM transmitter add back in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceMask(pub u32);

impl DeviceMask {
    pub const NONE: Self = Self(0);

    // Output devices
    pub const OUT_EARPIECE: Self = Self(0x1);
    pub const OUT_SPEAKER: Self = Self(0x2);
    pub const OUT_WIRED_HEADSET: Self = Self(0x4);
    pub const OUT_WIRED_HEADPHONE: Self = Self(0x8);
    pub const OUT_BLUETOOTH_SCO: Self = Self(0x10);
    pub const OUT_BLUETOOTH_SCO_HEADSET: Self = Self(0x20);
    pub const OUT_BLUETOOTH_SCO_CARKIT: Self = Self(0x40);
    pub const OUT_BLUETOOTH_A2DP: Self = Self(0x80);
    pub const OUT_BLUETOOTH_A2DP_HEADPHONES: Self = Self(0x100);
    pub const OUT_BLUETOOTH_A2DP_SPEAKER: Self = Self(0x200);
    pub const OUT_AUX_DIGITAL: Self = Self(0x400);
    pub const OUT_FM_HEADPHONE: Self = Self(0x800);
    pub const OUT_FM_SPEAKER: Self = Self(0x1000);
    pub const OUT_DEFAULT: Self = Self(0x8000);
    pub const OUT_ALL: Self = Self(0x9FFF);

    // Input devices
    pub const IN_COMMUNICATION: Self = Self(0x1_0000);
    pub const IN_AMBIENT: Self = Self(0x2_0000);
    pub const IN_BUILTIN_MIC: Self = Self(0x4_0000);
    pub const IN_BLUETOOTH_SCO_HEADSET: Self = Self(0x8_0000);
    pub const IN_WIRED_HEADSET: Self = Self(0x10_0000);
    pub const IN_AUX_DIGITAL: Self = Self(0x20_0000);
    pub const IN_VOICE_CALL: Self = Self(0x40_0000);
    pub const IN_BACK_MIC: Self = Self(0x80_0000);
    pub const IN_DEFAULT: Self = Self(0x8000_0000);
    pub const IN_ALL: Self = Self(0x80FF_0000);

    const OUTPUT_WORD: u32 = 0x0000_FFFF;

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if `self` and `other` share at least one bit.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Any bit in the low (output) word.
    pub const fn has_output(self) -> bool {
        self.0 & Self::OUTPUT_WORD != 0
    }

    /// Any bit in the high (input) word.
    pub const fn has_input(self) -> bool {
        self.0 >> 16 != 0
    }
}

impl BitOr for DeviceMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for DeviceMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for DeviceMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl fmt::Display for DeviceMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Audio mode of the platform (normal playback, ringtone, call, ...).
///
/// Unknown values are carried verbatim; the core only compares modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioMode(pub i32);

impl AudioMode {
    pub const NORMAL: Self = Self(0);
    pub const RINGTONE: Self = Self(1);
    pub const IN_CALL: Self = Self(2);
    pub const IN_COMMUNICATION: Self = Self(3);
}

impl fmt::Display for AudioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamDirection {
    Playback,
    Capture,
}

impl StreamDirection {
    /// Playback if the mask carries any output device, capture otherwise.
    pub fn of(devices: DeviceMask) -> Self {
        if devices.intersects(DeviceMask::OUT_ALL) {
            Self::Playback
        } else {
            Self::Capture
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Playback => "PLAYBACK",
            Self::Capture => "CAPTURE",
        }
    }

    /// Every device bit belonging to this direction.
    pub fn all_devices(self) -> DeviceMask {
        match self {
            Self::Playback => DeviceMask::OUT_ALL,
            Self::Capture => DeviceMask::IN_ALL,
        }
    }
}

impl fmt::Display for StreamDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
