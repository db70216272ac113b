use std::fmt;

use super::device::{AudioMode, DeviceMask};
use super::error::ControlError;

/// Non-fatal conditions raised while routing.
///
/// Each warning is logged where it occurs and, if the router has a
/// [`RouteObserver`](crate::traits::observer::RouteObserver), delivered to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteWarning {
    /// A named mixer control could not be found or written.
    ControlNotApplied { control: String, error: ControlError },

    /// The transport granted a different sample rate than requested.
    /// Callers may need to resample.
    RateMismatch { requested: u32, actual: u32 },

    /// A route targeted an open handle whose profile does not serve the
    /// requested devices. The handle is reopened.
    UnexpectedRoute { served: DeviceMask, requested: DeviceMask },

    /// The voice modem failed to apply call routing during control programming.
    ModemFailed { devices: DeviceMask, mode: AudioMode, reason: String },
}

impl fmt::Display for RouteWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ControlNotApplied { control, error } => {
                write!(f, "control '{}' not applied: {}", control, error)
            }
            Self::RateMismatch { requested, actual } => write!(
                f,
                "requested rate ({} HZ) does not match actual rate ({} HZ)",
                requested, actual
            ),
            Self::UnexpectedRoute { served, requested } => write!(
                f,
                "routing to devices {} that are not served by this handle ({})",
                requested, served
            ),
            Self::ModemFailed { devices, mode, reason } => write!(
                f,
                "voice modem call routing failed for devices {} in mode {}: {}",
                devices, mode, reason
            ),
        }
    }
}
