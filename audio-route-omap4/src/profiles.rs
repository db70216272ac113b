//! OMAP4 profile table.
//!
//! Six profiles: SCO, FM, HDMI and default for playback; SCO and default for
//! capture. SCO and FM share the ABE voice/modem backend at `hw:0,2`; HDMI has
//! its own PCM, and everything else goes through the multimedia PCM.

use audio_route_core::{
    ControlStrategy, DeviceClass, DeviceMask, DeviceProfile, ProfileTable, RouteError, RouterConfig, SampleFormat,
};

pub const OUT_SCO: DeviceMask = DeviceMask(
    DeviceMask::OUT_BLUETOOTH_SCO.0 | DeviceMask::OUT_BLUETOOTH_SCO_HEADSET.0 | DeviceMask::OUT_BLUETOOTH_SCO_CARKIT.0,
);
pub const OUT_FM: DeviceMask = DeviceMask(DeviceMask::OUT_FM_HEADPHONE.0 | DeviceMask::OUT_FM_SPEAKER.0);
pub const OUT_HDMI: DeviceMask = DeviceMask::OUT_AUX_DIGITAL;
pub const OUT_DEFAULT: DeviceMask = DeviceMask(DeviceMask::OUT_ALL.0 & !(OUT_SCO.0 | OUT_FM.0 | OUT_HDMI.0));

pub const IN_SCO: DeviceMask = DeviceMask::IN_BLUETOOTH_SCO_HEADSET;
pub const IN_DEFAULT: DeviceMask = DeviceMask(DeviceMask::IN_ALL.0 & !IN_SCO.0);

pub const PCM_VOICE: &str = "hw:0,2";
pub const PCM_HDMI: &str = "plughw:0,7";
pub const PCM_MULTIMEDIA: &str = "plughw:0,0";

/// Name of the mixer card the control sequences target.
pub const MIXER_CARD: &str = "hw:00";

const OUTPUT_CHANNELS: u32 = 2;
const INPUT_CHANNELS: u32 = 1;

/// Build the OMAP4 table for `config`.
///
/// Output profiles ask for 1/5 s of buffer on the SCO, FM and HDMI paths
/// and 1/10 s on the multimedia path; buffer sizes are normalized by
/// [`ProfileTable::new`].
pub fn profile_table(config: &RouterConfig) -> Result<ProfileTable, RouteError> {
    config.validate()?;

    let playback_rate = config.playback_sample_rate;
    let output = |class, devices, pcm: &str, buffer_frames: u64, strategy| DeviceProfile {
        class,
        devices,
        pcm_device: pcm.to_string(),
        format: SampleFormat::S16_LE,
        channels: OUTPUT_CHANNELS,
        sample_rate: playback_rate,
        latency_us: config.playback_latency_us,
        buffer_frames,
        strategy,
    };
    let input = |class, devices, pcm: &str, strategy| DeviceProfile {
        class,
        devices,
        pcm_device: pcm.to_string(),
        format: SampleFormat::S16_LE,
        channels: INPUT_CHANNELS,
        sample_rate: config.capture_sample_rate,
        latency_us: config.capture_latency_us,
        buffer_frames: config.capture_buffer_frames,
        strategy,
    };

    let special_buffer = u64::from(playback_rate / 5);
    let default_buffer = u64::from(playback_rate / 10);

    ProfileTable::new(vec![
        output(DeviceClass::BluetoothSco, OUT_SCO, PCM_VOICE, special_buffer, ControlStrategy::BluetoothSco),
        output(DeviceClass::Fm, OUT_FM, PCM_VOICE, special_buffer, ControlStrategy::Fm),
        output(DeviceClass::Hdmi, OUT_HDMI, PCM_HDMI, special_buffer, ControlStrategy::Hdmi),
        output(DeviceClass::Default, OUT_DEFAULT, PCM_MULTIMEDIA, default_buffer, ControlStrategy::Default),
        input(DeviceClass::BluetoothSco, IN_SCO, PCM_VOICE, ControlStrategy::BluetoothSco),
        input(DeviceClass::Default, IN_DEFAULT, PCM_MULTIMEDIA, ControlStrategy::Default),
    ])
}
