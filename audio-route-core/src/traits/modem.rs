use crate::models::device::{AudioMode, DeviceMask};
use crate::traits::mixer::MixerControl;

/// Optional voice-modem extension that applies call-routing mixer state.
///
/// Invoked before device-specific controls during programming and again
/// after a path is fully reopened.
pub trait VoiceModem {
    fn apply_call_routing(
        &mut self,
        devices: DeviceMask,
        mode: AudioMode,
        mixer: &mut dyn MixerControl,
    ) -> Result<(), String>;
}
