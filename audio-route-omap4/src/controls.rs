//! OMAP4 mixer programming: ABE (downlink/uplink mixers) and TWL6040
//! (analog outputs and microphone routing).

use audio_route_core::{AudioMode, ControlSequence, ControlSetting, ControlStrategy, DeviceMask};

/// Volume for the ABE DL1/DL2 gain stages when a path is active (0 dB).
const ABE_VOLUME_ON: i64 = 118;
const HANDSFREE_VOLUME_ON: i64 = 29;
const HEADSET_VOLUME_ON: i64 = 15;
const EARPIECE_VOLUME_ON: i64 = 15;
const CAPTURE_PREAMP_ON: i64 = 1;
const CAPTURE_VOLUME_ON: i64 = 4;

/// Fallbacks written when a disabling write is refused.
const VOLUME_FALLBACK: i64 = -1;
const SWITCH_FALLBACK: i64 = 0;

/// Control sequences for the OMAP4 ABE + TWL6040 board.
///
/// Only the default strategy programs anything; the SCO, FM and HDMI paths
/// are configured outside the mixer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Omap4Controls;

impl ControlSequence for Omap4Controls {
    fn settings(&self, strategy: ControlStrategy, devices: DeviceMask, mode: AudioMode) -> Vec<ControlSetting> {
        match strategy {
            ControlStrategy::Default => default_settings(devices),
            ControlStrategy::BluetoothSco | ControlStrategy::Fm | ControlStrategy::Hdmi => {
                log::trace!("No {:?} controls for devices {} in mode {}", strategy, devices, mode);
                Vec::new()
            }
        }
    }
}

fn default_settings(devices: DeviceMask) -> Vec<ControlSetting> {
    let mut settings = Vec::new();
    if devices.has_output() {
        output_settings(devices, &mut settings);
    }
    if devices.has_input() {
        input_settings(devices, &mut settings);
    }
    settings
}

fn output_settings(devices: DeviceMask, out: &mut Vec<ControlSetting>) {
    let speaker = devices.intersects(DeviceMask::OUT_SPEAKER);
    let headset = devices.intersects(DeviceMask::OUT_WIRED_HEADSET);
    let earpiece = devices.intersects(DeviceMask::OUT_EARPIECE);

    // ABE DL2 -> TWL6040 handsfree
    if speaker {
        out.extend(volumes(&["DL2 Media", "DL2 Tones", "DL2 Voice"], ABE_VOLUME_ON));
        out.push(ControlSetting::enumerated("HF Left Playback", "HF DAC"));
        out.push(ControlSetting::enumerated("HF Right Playback", "HF DAC"));
        out.push(ControlSetting::numeric("Handsfree Playback Volume", HANDSFREE_VOLUME_ON));
    } else {
        out.extend(muted(&["DL2 Media", "DL2 Tones", "DL2 Voice"]));
        out.push(ControlSetting::enumerated("HF Left Playback", "Off"));
        out.push(ControlSetting::enumerated("HF Right Playback", "Off"));
        out.push(ControlSetting::numeric_or("Handsfree Playback Volume", 0, VOLUME_FALLBACK));
    }

    if headset {
        out.push(ControlSetting::enumerated("HS Left Playback", "HS DAC"));
        out.push(ControlSetting::enumerated("HS Right Playback", "HS DAC"));
        out.push(ControlSetting::numeric("Headset Playback Volume", HEADSET_VOLUME_ON));
    } else {
        out.push(ControlSetting::enumerated("HS Left Playback", "Off"));
        out.push(ControlSetting::enumerated("HS Right Playback", "Off"));
        out.push(ControlSetting::numeric_or("Headset Playback Volume", 0, VOLUME_FALLBACK));
    }

    // HSDAC L -> earpiece
    if earpiece {
        out.push(ControlSetting::numeric("Earphone Driver Switch", 1));
        out.push(ControlSetting::numeric("Earphone Playback Volume", EARPIECE_VOLUME_ON));
    } else {
        out.push(ControlSetting::numeric_or("Earphone Driver Switch", 0, SWITCH_FALLBACK));
        out.push(ControlSetting::numeric_or("Earphone Playback Volume", 0, VOLUME_FALLBACK));
    }

    // The ABE backends cannot be enabled on the fly, so both downlink
    // mixers stay up while any analog leg is active.
    let dl1_switches = [
        "DL1 Mixer Multimedia",
        "DL1 Mixer Tones",
        "DL1 Mixer Voice",
        "Sidetone Mixer Playback",
        "DL1 PDM Switch",
    ];
    let dl1_volumes = ["DL1 Media", "DL1 Tones", "DL1 Voice"];
    let dl2_switches = ["DL2 Mixer Multimedia", "DL2 Mixer Tones", "DL2 Mixer Voice"];

    if speaker || earpiece || headset {
        out.extend(switches(&dl1_switches, true));
        out.extend(volumes(&dl1_volumes, ABE_VOLUME_ON));
        out.extend(switches(&dl2_switches, true));
    } else {
        out.extend(switches(&dl1_switches, false));
        out.extend(muted(&dl1_volumes));
        out.extend(switches(&dl2_switches, false));
    }
}

fn input_settings(devices: DeviceMask, out: &mut Vec<ControlSetting>) {
    let builtin = devices.intersects(DeviceMask::IN_BUILTIN_MIC);
    let headset = devices.intersects(DeviceMask::IN_WIRED_HEADSET);

    // The built-in mic wins when both are requested.
    let routes = if builtin {
        Some(("Main Mic", "Sub Mic"))
    } else if headset {
        Some(("Headset Mic", "Headset Mic"))
    } else {
        None
    };

    match routes {
        Some((left, right)) => {
            out.push(ControlSetting::enumerated("Analog Left Capture Route", left));
            out.push(ControlSetting::enumerated("Analog Right Capture Route", right));
            out.push(ControlSetting::numeric("Capture Preamplifier Volume", CAPTURE_PREAMP_ON));
            out.push(ControlSetting::numeric("Capture Volume", CAPTURE_VOLUME_ON));
        }
        None => {
            out.push(ControlSetting::enumerated("Analog Left Capture Route", "Off"));
            out.push(ControlSetting::enumerated("Analog Right Capture Route", "Off"));
            out.push(ControlSetting::numeric_or("Capture Preamplifier Volume", 0, VOLUME_FALLBACK));
            out.push(ControlSetting::numeric_or("Capture Volume", 0, VOLUME_FALLBACK));
        }
    }

    // PDM_UL1 -> AMIC_UL -> MM_UL and VX_UL
    let uplink = [
        ("MUX_UL00", "AMic1"),
        ("MUX_UL01", "AMic0"),
        ("MUX_UL10", "AMic1"),
        ("MUX_UL11", "AMic0"),
    ];
    let voice = [("MUX_VX0", "AMic1"), ("MUX_VX1", "AMic0")];
    let active = routes.is_some();

    out.extend(switches(&["AMIC_UL PDM Switch"], active));
    out.extend(
        uplink
            .iter()
            .map(|&(mux, source)| ControlSetting::enumerated(mux, if active { source } else { "None" })),
    );
    out.extend(switches(&["Voice Capture Mixer Capture"], active));
    out.extend(
        voice
            .iter()
            .map(|&(mux, source)| ControlSetting::enumerated(mux, if active { source } else { "None" })),
    );
}

fn volumes<'a>(stages: &'a [&'a str], value: i64) -> impl Iterator<Item = ControlSetting> + 'a {
    stages
        .iter()
        .map(move |stage| ControlSetting::numeric(format!("{} Playback Volume", stage), value))
}

fn muted<'a>(stages: &'a [&'a str]) -> impl Iterator<Item = ControlSetting> + 'a {
    stages
        .iter()
        .map(|stage| ControlSetting::numeric_or(format!("{} Playback Volume", stage), 0, VOLUME_FALLBACK))
}

fn switches<'a>(names: &'a [&'a str], on: bool) -> impl Iterator<Item = ControlSetting> + 'a {
    names.iter().map(move |&name| {
        if on {
            ControlSetting::numeric(name, 1)
        } else {
            ControlSetting::numeric_or(name, 0, SWITCH_FALLBACK)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(settings: &[ControlSetting]) -> Vec<&str> {
        settings.iter().map(ControlSetting::name).collect()
    }

    fn find<'a>(settings: &'a [ControlSetting], name: &str) -> &'a ControlSetting {
        settings
            .iter()
            .find(|s| s.name() == name)
            .unwrap_or_else(|| panic!("missing control {}", name))
    }

    fn default(devices: DeviceMask) -> Vec<ControlSetting> {
        Omap4Controls.settings(ControlStrategy::Default, devices, AudioMode::NORMAL)
    }

    #[test]
    fn speaker_enables_handsfree_and_shared_downlink() {
        let settings = default(DeviceMask::OUT_SPEAKER);

        assert_eq!(*find(&settings, "HF Left Playback"), ControlSetting::enumerated("HF Left Playback", "HF DAC"));
        assert_eq!(
            *find(&settings, "Handsfree Playback Volume"),
            ControlSetting::numeric("Handsfree Playback Volume", 29)
        );
        assert_eq!(
            *find(&settings, "Headset Playback Volume"),
            ControlSetting::numeric_or("Headset Playback Volume", 0, -1)
        );
        assert_eq!(
            *find(&settings, "Earphone Driver Switch"),
            ControlSetting::numeric_or("Earphone Driver Switch", 0, 0)
        );
        assert_eq!(*find(&settings, "DL1 PDM Switch"), ControlSetting::numeric("DL1 PDM Switch", 1));
        assert_eq!(
            *find(&settings, "DL1 Voice Playback Volume"),
            ControlSetting::numeric("DL1 Voice Playback Volume", 118)
        );
        assert_eq!(*find(&settings, "DL2 Mixer Tones"), ControlSetting::numeric("DL2 Mixer Tones", 1));
        assert!(!names(&settings).contains(&"Capture Volume"));
    }

    #[test]
    fn no_analog_leg_disables_shared_downlink() {
        let settings = default(DeviceMask::OUT_WIRED_HEADPHONE);

        assert_eq!(
            *find(&settings, "Sidetone Mixer Playback"),
            ControlSetting::numeric_or("Sidetone Mixer Playback", 0, 0)
        );
        assert_eq!(
            *find(&settings, "DL1 Media Playback Volume"),
            ControlSetting::numeric_or("DL1 Media Playback Volume", 0, -1)
        );
        assert_eq!(*find(&settings, "HS Left Playback"), ControlSetting::enumerated("HS Left Playback", "Off"));
    }

    #[test]
    fn every_output_leg_is_always_programmed() {
        let on_settings = default(DeviceMask::OUT_SPEAKER | DeviceMask::OUT_EARPIECE | DeviceMask::OUT_WIRED_HEADSET);
        let off_settings = default(DeviceMask::OUT_WIRED_HEADPHONE);
        let on = names(&on_settings);
        let off = names(&off_settings);
        assert_eq!(on, off);
        assert_eq!(on.len(), 6 + 3 + 2 + 11);
    }

    #[test]
    fn builtin_mic_wins_over_headset_mic() {
        let settings = default(DeviceMask::IN_BUILTIN_MIC | DeviceMask::IN_WIRED_HEADSET);

        assert_eq!(
            *find(&settings, "Analog Left Capture Route"),
            ControlSetting::enumerated("Analog Left Capture Route", "Main Mic")
        );
        assert_eq!(
            *find(&settings, "Analog Right Capture Route"),
            ControlSetting::enumerated("Analog Right Capture Route", "Sub Mic")
        );
        assert_eq!(*find(&settings, "Capture Volume"), ControlSetting::numeric("Capture Volume", 4));
    }

    #[test]
    fn headset_mic_routes_both_channels_and_uplink() {
        let settings = default(DeviceMask::IN_WIRED_HEADSET);

        assert_eq!(
            *find(&settings, "Analog Left Capture Route"),
            ControlSetting::enumerated("Analog Left Capture Route", "Headset Mic")
        );
        assert_eq!(
            *find(&settings, "Analog Right Capture Route"),
            ControlSetting::enumerated("Analog Right Capture Route", "Headset Mic")
        );
        assert_eq!(*find(&settings, "AMIC_UL PDM Switch"), ControlSetting::numeric("AMIC_UL PDM Switch", 1));
        assert_eq!(*find(&settings, "MUX_UL00"), ControlSetting::enumerated("MUX_UL00", "AMic1"));
        assert_eq!(*find(&settings, "MUX_VX1"), ControlSetting::enumerated("MUX_VX1", "AMic0"));
        assert!(!names(&settings).contains(&"HF Left Playback"));
    }

    #[test]
    fn other_inputs_disable_capture_chain() {
        let settings = default(DeviceMask::IN_BACK_MIC);

        assert_eq!(
            *find(&settings, "Analog Left Capture Route"),
            ControlSetting::enumerated("Analog Left Capture Route", "Off")
        );
        assert_eq!(
            *find(&settings, "Capture Preamplifier Volume"),
            ControlSetting::numeric_or("Capture Preamplifier Volume", 0, -1)
        );
        assert_eq!(*find(&settings, "MUX_UL11"), ControlSetting::enumerated("MUX_UL11", "None"));
        assert_eq!(
            *find(&settings, "Voice Capture Mixer Capture"),
            ControlSetting::numeric_or("Voice Capture Mixer Capture", 0, 0)
        );
    }

    #[test]
    fn special_strategies_program_nothing() {
        for strategy in [ControlStrategy::BluetoothSco, ControlStrategy::Fm, ControlStrategy::Hdmi] {
            assert!(Omap4Controls
                .settings(strategy, DeviceMask::OUT_SPEAKER, AudioMode::IN_CALL)
                .is_empty());
            assert!(!Omap4Controls.wants_call_routing(strategy));
        }
        assert!(Omap4Controls.wants_call_routing(ControlStrategy::Default));
    }
}
