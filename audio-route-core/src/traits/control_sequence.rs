use crate::control::setting::ControlSetting;
use crate::models::device::{AudioMode, DeviceMask};
use crate::models::profile::ControlStrategy;

/// Board-specific mixer programming for each control strategy.
///
/// Boards add real sequences for a strategy here without touching the router.
pub trait ControlSequence {
    /// Ordered settings connecting `devices` in `mode` for `strategy`.
    fn settings(&self, strategy: ControlStrategy, devices: DeviceMask, mode: AudioMode) -> Vec<ControlSetting>;

    /// Whether the voice modem hook runs before this strategy's settings.
    fn wants_call_routing(&self, strategy: ControlStrategy) -> bool {
        strategy == ControlStrategy::Default
    }
}
