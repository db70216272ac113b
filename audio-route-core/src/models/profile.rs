use serde::{Deserialize, Serialize};

use super::device::{DeviceMask, StreamDirection};
use super::error::RouteError;
use super::params::SampleFormat;

/// Routing class of a profile. Lookup tests classes in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    BluetoothSco,
    Fm,
    Hdmi,
    Default,
}

impl DeviceClass {
    /// Special-case classes in lookup precedence order.
    const SPECIAL: [Self; 3] = [Self::BluetoothSco, Self::Fm, Self::Hdmi];

    fn allowed_for(self, direction: StreamDirection) -> bool {
        match self {
            Self::Fm | Self::Hdmi => direction == StreamDirection::Playback,
            Self::BluetoothSco | Self::Default => true,
        }
    }
}

/// Which mixer control sequence a profile programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStrategy {
    BluetoothSco,
    Fm,
    Hdmi,
    Default,
}

/// Static configuration for one routing class of one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub class: DeviceClass,
    /// Device bits this profile serves.
    pub devices: DeviceMask,
    /// Transport device name opened for this profile (e.g. `plughw:0,0`).
    pub pcm_device: String,
    pub format: SampleFormat,
    pub channels: u32,
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Target buffer latency in microseconds.
    pub latency_us: u32,
    /// Desired buffer size in frames. Normalized when the table is built.
    pub buffer_frames: u64,
    pub strategy: ControlStrategy,
}

impl DeviceProfile {
    pub fn direction(&self) -> StreamDirection {
        StreamDirection::of(self.devices)
    }
}

/// Round a frame count down to the largest power of two not above it.
///
/// Clears low set bits until a single bit remains; zero stays zero.
pub fn normalize_buffer_frames(frames: u64) -> u64 {
    frames.checked_ilog2().map_or(0, |exp| 1u64 << exp)
}

/// Immutable catalog of device profiles for a board.
///
/// Built once; every direction has exactly one `Default` profile, so
/// [`ProfileTable::lookup`] is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileTable {
    profiles: Vec<DeviceProfile>,
    playback_default: usize,
    capture_default: usize,
}

impl ProfileTable {
    /// Normalize buffer sizes and check that each direction's masks
    /// partition that direction's device bits.
    pub fn new(mut profiles: Vec<DeviceProfile>) -> Result<Self, RouteError> {
        for profile in &mut profiles {
            profile.buffer_frames = normalize_buffer_frames(profile.buffer_frames);
        }

        let playback_default = Self::validate_direction(&profiles, StreamDirection::Playback)?;
        let capture_default = Self::validate_direction(&profiles, StreamDirection::Capture)?;

        Ok(Self {
            profiles,
            playback_default,
            capture_default,
        })
    }

    /// Parse a table from a JSON array of profiles.
    pub fn from_json(json: &str) -> Result<Self, RouteError> {
        let profiles: Vec<DeviceProfile> = serde_json::from_str(json)
            .map_err(|e| RouteError::Configuration(format!("failed to parse profile table: {}", e)))?;
        Self::new(profiles)
    }

    pub fn to_json(&self) -> Result<String, RouteError> {
        serde_json::to_string_pretty(&self.profiles)
            .map_err(|e| RouteError::Configuration(format!("failed to serialize profile table: {}", e)))
    }

    pub fn profiles(&self) -> &[DeviceProfile] {
        &self.profiles
    }

    /// Index of the profile `lookup` would return.
    pub fn lookup_index(&self, direction: StreamDirection, devices: DeviceMask) -> usize {
        DeviceClass::SPECIAL
            .iter()
            .find_map(|class| {
                self.profiles.iter().position(|p| {
                    p.class == *class && p.direction() == direction && p.devices.intersects(devices)
                })
            })
            .unwrap_or(match direction {
                StreamDirection::Playback => self.playback_default,
                StreamDirection::Capture => self.capture_default,
            })
    }

    /// Select the profile serving `devices` in `direction`.
    ///
    /// Special cases win in the order SCO, FM, HDMI; anything else resolves
    /// to the direction's default profile.
    pub fn lookup(&self, direction: StreamDirection, devices: DeviceMask) -> &DeviceProfile {
        &self.profiles[self.lookup_index(direction, devices)]
    }

    fn validate_direction(profiles: &[DeviceProfile], direction: StreamDirection) -> Result<usize, RouteError> {
        let universe = direction.all_devices();
        let mut covered = DeviceMask::NONE;
        let mut default = None;

        for (index, profile) in profiles.iter().enumerate() {
            if profile.devices.is_empty() {
                return Err(RouteError::Configuration(format!(
                    "profile '{}' has an empty device mask",
                    profile.pcm_device
                )));
            }
            if profile.direction() != direction {
                continue;
            }
            if !universe.contains(profile.devices) {
                return Err(RouteError::Configuration(format!(
                    "profile mask {} mixes input and output devices",
                    profile.devices
                )));
            }
            if !profile.class.allowed_for(direction) {
                return Err(RouteError::Configuration(format!(
                    "{:?} profiles are not supported for {}",
                    profile.class, direction
                )));
            }
            if covered.intersects(profile.devices) {
                return Err(RouteError::Configuration(format!(
                    "{} profile mask {} overlaps another profile",
                    direction, profile.devices
                )));
            }
            covered = covered | profile.devices;

            if profile.class == DeviceClass::Default {
                if default.is_some() {
                    return Err(RouteError::Configuration(format!(
                        "more than one default {} profile",
                        direction
                    )));
                }
                default = Some(index);
            } else if profiles[..index]
                .iter()
                .any(|p| p.class == profile.class && p.direction() == direction)
            {
                return Err(RouteError::Configuration(format!(
                    "duplicate {:?} profile for {}",
                    profile.class, direction
                )));
            }
        }

        if covered != universe {
            return Err(RouteError::Configuration(format!(
                "{} profiles leave devices {} unclaimed",
                direction,
                universe & !covered
            )));
        }

        default.ok_or_else(|| RouteError::Configuration(format!("no default {} profile", direction)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUT_SCO: DeviceMask = DeviceMask(0x70);
    const OUT_HDMI: DeviceMask = DeviceMask(0x400);
    const IN_SCO: DeviceMask = DeviceMask::IN_BLUETOOTH_SCO_HEADSET;

    fn profile(class: DeviceClass, devices: DeviceMask, name: &str) -> DeviceProfile {
        DeviceProfile {
            class,
            devices,
            pcm_device: name.into(),
            format: SampleFormat::S16_LE,
            channels: 2,
            sample_rate: 44100,
            latency_us: 200_000,
            buffer_frames: 44100 / 5,
            strategy: ControlStrategy::Default,
        }
    }

    fn table() -> ProfileTable {
        ProfileTable::new(vec![
            profile(DeviceClass::BluetoothSco, OUT_SCO, "sco"),
            profile(DeviceClass::Hdmi, OUT_HDMI, "hdmi"),
            profile(
                DeviceClass::Default,
                DeviceMask::OUT_ALL & !OUT_SCO & !OUT_HDMI,
                "out",
            ),
            profile(DeviceClass::BluetoothSco, IN_SCO, "in-sco"),
            profile(DeviceClass::Default, DeviceMask::IN_ALL & !IN_SCO, "in"),
        ])
        .unwrap()
    }

    #[test]
    fn normalize_rounds_down_to_power_of_two() {
        assert_eq!(normalize_buffer_frames(8820), 8192);
        assert_eq!(normalize_buffer_frames(4410), 4096);
        assert_eq!(normalize_buffer_frames(2048), 2048);
        assert_eq!(normalize_buffer_frames(1), 1);
        assert_eq!(normalize_buffer_frames(0), 0);
    }

    #[test]
    fn normalize_is_idempotent_and_never_grows() {
        for frames in [0u64, 1, 3, 255, 256, 1000, 8820, 65535, 1 << 40] {
            let once = normalize_buffer_frames(frames);
            assert!(once <= frames);
            assert_eq!(normalize_buffer_frames(once), once);
            assert!(once == 0 || once.is_power_of_two());
        }
    }

    #[test]
    fn table_normalizes_buffer_frames() {
        let table = table();
        assert!(table.profiles().iter().all(|p| p.buffer_frames == 8192));
    }

    #[test]
    fn lookup_prefers_special_cases() {
        let table = table();
        let sco = table.lookup(StreamDirection::Playback, DeviceMask::OUT_BLUETOOTH_SCO | DeviceMask::OUT_SPEAKER);
        assert_eq!(sco.pcm_device, "sco");

        let hdmi = table.lookup(StreamDirection::Playback, DeviceMask::OUT_AUX_DIGITAL | DeviceMask::OUT_SPEAKER);
        assert_eq!(hdmi.pcm_device, "hdmi");

        let default = table.lookup(StreamDirection::Playback, DeviceMask::OUT_SPEAKER);
        assert_eq!(default.pcm_device, "out");

        let in_sco = table.lookup(StreamDirection::Capture, IN_SCO | DeviceMask::IN_BUILTIN_MIC);
        assert_eq!(in_sco.pcm_device, "in-sco");
    }

    #[test]
    fn lookup_falls_back_to_default_for_unclaimed_bits() {
        let table = table();
        assert_eq!(table.lookup(StreamDirection::Playback, DeviceMask::NONE).pcm_device, "out");
        // A capture lookup never returns an output profile.
        assert_eq!(table.lookup(StreamDirection::Capture, DeviceMask::OUT_SPEAKER).pcm_device, "in");
    }

    #[test]
    fn every_profile_serves_its_own_subsets() {
        let table = table();
        for p in table.profiles() {
            for bit in 0..32 {
                let d = DeviceMask(1 << bit);
                if p.devices.contains(d) {
                    assert_eq!(table.lookup(p.direction(), d), p);
                }
            }
        }
    }

    #[test]
    fn rejects_overlapping_masks() {
        let err = ProfileTable::new(vec![
            profile(DeviceClass::BluetoothSco, OUT_SCO, "sco"),
            profile(DeviceClass::Default, DeviceMask::OUT_ALL, "out"),
            profile(DeviceClass::Default, DeviceMask::IN_ALL, "in"),
        ])
        .unwrap_err();
        assert!(matches!(err, RouteError::Configuration(_)));
    }

    #[test]
    fn rejects_missing_default_and_gaps() {
        let missing_input = ProfileTable::new(vec![profile(DeviceClass::Default, DeviceMask::OUT_ALL, "out")]);
        assert!(missing_input.is_err());

        let gap = ProfileTable::new(vec![
            profile(DeviceClass::Default, DeviceMask::OUT_ALL & !OUT_SCO, "out"),
            profile(DeviceClass::Default, DeviceMask::IN_ALL, "in"),
        ]);
        assert!(gap.is_err());
    }

    #[test]
    fn rejects_fm_capture_profile() {
        let err = ProfileTable::new(vec![
            profile(DeviceClass::Default, DeviceMask::OUT_ALL, "out"),
            profile(DeviceClass::Fm, IN_SCO, "fm-in"),
            profile(DeviceClass::Default, DeviceMask::IN_ALL & !IN_SCO, "in"),
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn json_round_trip_keeps_lookup_behaviour() {
        let table = table();
        let json = table.to_json().unwrap();
        let parsed = ProfileTable::from_json(&json).unwrap();
        assert_eq!(parsed, table);
        assert!(ProfileTable::from_json("not json").is_err());
    }
}
