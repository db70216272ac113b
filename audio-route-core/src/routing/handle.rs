use std::fmt;

use crate::models::device::{AudioMode, DeviceMask, StreamDirection};
use crate::models::params::{NegotiatedParams, SoftwareParams};
use crate::models::profile::DeviceProfile;

/// Index of a handle within its router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(pub usize);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Live state of one profile's audio path.
///
/// Closed when `stream` is `None`. The current devices, mode and negotiated
/// parameters are only meaningful while open and are cleared on close.
#[derive(Debug)]
pub struct RouteHandle<S> {
    profile: DeviceProfile,
    pub(crate) current_devices: DeviceMask,
    pub(crate) current_mode: AudioMode,
    pub(crate) stream: Option<S>,
    pub(crate) negotiated: Option<NegotiatedParams>,
    pub(crate) software: Option<SoftwareParams>,
}

impl<S> RouteHandle<S> {
    pub(crate) fn new(profile: DeviceProfile) -> Self {
        Self {
            profile,
            current_devices: DeviceMask::NONE,
            current_mode: AudioMode::NORMAL,
            stream: None,
            negotiated: None,
            software: None,
        }
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Devices this handle's profile serves.
    pub fn devices(&self) -> DeviceMask {
        self.profile.devices
    }

    pub fn direction(&self) -> StreamDirection {
        self.profile.direction()
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn current_devices(&self) -> DeviceMask {
        self.current_devices
    }

    pub fn current_mode(&self) -> AudioMode {
        self.current_mode
    }

    pub fn stream(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    pub fn negotiated(&self) -> Option<&NegotiatedParams> {
        self.negotiated.as_ref()
    }

    pub fn software(&self) -> Option<&SoftwareParams> {
        self.software.as_ref()
    }

    /// Detach the stream and reset every live field.
    pub(crate) fn take_stream(&mut self) -> Option<S> {
        self.current_devices = DeviceMask::NONE;
        self.current_mode = AudioMode::NORMAL;
        self.negotiated = None;
        self.software = None;
        self.stream.take()
    }
}
