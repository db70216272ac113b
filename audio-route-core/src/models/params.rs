use serde::{Deserialize, Serialize};

/// PCM sample format, carried as the transport's raw format code.
///
/// Codes follow the ALSA `snd_pcm_format_t` numbering for the linear, float,
/// IEC958 and compressed formats (S8 through GSM). Later codes such as the
/// packed 3-byte formats are not named here and, like any code outside that
/// range, are described with a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleFormat(pub i32);

/// (name, description) pairs indexed by format code.
const FORMAT_NAMES: [(&str, &str); 25] = [
    ("S8", "Signed 8 bit"),
    ("U8", "Unsigned 8 bit"),
    ("S16_LE", "Signed 16 bit Little Endian"),
    ("S16_BE", "Signed 16 bit Big Endian"),
    ("U16_LE", "Unsigned 16 bit Little Endian"),
    ("U16_BE", "Unsigned 16 bit Big Endian"),
    ("S24_LE", "Signed 24 bit Little Endian"),
    ("S24_BE", "Signed 24 bit Big Endian"),
    ("U24_LE", "Unsigned 24 bit Little Endian"),
    ("U24_BE", "Unsigned 24 bit Big Endian"),
    ("S32_LE", "Signed 32 bit Little Endian"),
    ("S32_BE", "Signed 32 bit Big Endian"),
    ("U32_LE", "Unsigned 32 bit Little Endian"),
    ("U32_BE", "Unsigned 32 bit Big Endian"),
    ("FLOAT_LE", "Float 32 bit Little Endian"),
    ("FLOAT_BE", "Float 32 bit Big Endian"),
    ("FLOAT64_LE", "Float 64 bit Little Endian"),
    ("FLOAT64_BE", "Float 64 bit Big Endian"),
    ("IEC958_SUBFRAME_LE", "IEC-958 Little Endian"),
    ("IEC958_SUBFRAME_BE", "IEC-958 Big Endian"),
    ("MU_LAW", "Mu-Law"),
    ("A_LAW", "A-Law"),
    ("IMA_ADPCM", "Ima-ADPCM"),
    ("MPEG", "MPEG"),
    ("GSM", "GSM"),
];

impl SampleFormat {
    pub const UNKNOWN: Self = Self(-1);
    pub const S8: Self = Self(0);
    pub const U8: Self = Self(1);
    pub const S16_LE: Self = Self(2);
    pub const S16_BE: Self = Self(3);
    pub const S24_LE: Self = Self(6);
    pub const S32_LE: Self = Self(10);
    pub const FLOAT_LE: Self = Self(14);
    pub const LAST: Self = Self(FORMAT_NAMES.len() as i32 - 1);

    /// True if the code names a known format (`UNKNOWN < code <= LAST`).
    pub fn is_valid(self) -> bool {
        self.0 > Self::UNKNOWN.0 && self.0 <= Self::LAST.0
    }

    pub fn name(self) -> &'static str {
        self.lookup().map_or("UNKNOWN", |(name, _)| name)
    }

    pub fn description(self) -> &'static str {
        self.lookup().map_or("Invalid Format", |(_, desc)| desc)
    }

    fn lookup(self) -> Option<(&'static str, &'static str)> {
        if !self.is_valid() {
            return None;
        }
        FORMAT_NAMES.get(self.0 as usize).copied()
    }
}

/// Sample access layout requested from the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    RwInterleaved,
}

/// How the transport is opened. Routing always opens in blocking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Blocking,
}

/// Hardware parameters the transport accepted for an open path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatedParams {
    pub format: SampleFormat,
    pub channels: u32,
    pub sample_rate: u32,
    pub buffer_frames: u64,
    pub period_frames: u64,
    pub latency_us: u32,
}

/// Flow-control thresholds committed for an open path, in frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftwareParams {
    pub start_threshold: u64,
    pub stop_threshold: u64,
    pub avail_min: u64,
}
