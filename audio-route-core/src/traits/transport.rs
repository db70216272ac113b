use crate::models::device::StreamDirection;
use crate::models::error::TransportError;
use crate::models::params::{Access, OpenMode, SampleFormat};

/// PCM transport capable of opening streams by device name.
///
/// Implemented by:
/// - `mock::MockTransport` (in-memory, for tests)
/// - Board integrations wrapping the platform PCM library
pub trait PcmTransport {
    type Stream: PcmStream;

    /// Open `name` for `direction`. Routing always passes `OpenMode::Blocking`.
    fn open(&mut self, name: &str, direction: StreamDirection, mode: OpenMode) -> Result<Self::Stream, TransportError>;
}

/// An open PCM stream.
///
/// The stream owns the underlying transport resource; `close` consumes it.
pub trait PcmStream {
    /// Start a hardware parameter space covering every configuration the
    /// device supports. The space is released when dropped.
    fn hw_params(&mut self) -> Result<Box<dyn HwParams + '_>, TransportError>;

    /// Start a software parameter space from the stream's current settings.
    fn sw_params(&mut self) -> Result<Box<dyn SwParams + '_>, TransportError>;

    /// Committed `(buffer_frames, period_frames)`.
    fn buffer_and_period(&self) -> Result<(u64, u64), TransportError>;

    /// Block until pending frames have been played or captured.
    fn drain(&mut self) -> Result<(), TransportError>;

    fn close(self) -> Result<(), TransportError>
    where
        Self: Sized;
}

/// Hardware parameter negotiation primitives.
///
/// `*_near` methods return the value the device actually accepted.
pub trait HwParams {
    fn set_access(&mut self, access: Access) -> Result<(), TransportError>;
    fn set_format(&mut self, format: SampleFormat) -> Result<(), TransportError>;
    fn set_channels(&mut self, channels: u32) -> Result<(), TransportError>;
    fn set_rate_near(&mut self, rate: u32) -> Result<u32, TransportError>;
    fn set_buffer_size_near(&mut self, frames: u64) -> Result<u64, TransportError>;
    fn set_buffer_time_near(&mut self, us: u32) -> Result<u32, TransportError>;
    fn set_period_time_near(&mut self, us: u32) -> Result<u32, TransportError>;
    fn period_size(&self) -> Result<u64, TransportError>;
    fn buffer_size(&self) -> Result<u64, TransportError>;
    fn buffer_time(&self) -> Result<u32, TransportError>;

    /// Install the negotiated parameters on the stream.
    fn commit(self: Box<Self>) -> Result<(), TransportError>;
}

/// Software (flow control) parameter primitives, all in frames.
pub trait SwParams {
    fn set_start_threshold(&mut self, frames: u64) -> Result<(), TransportError>;
    fn set_stop_threshold(&mut self, frames: u64) -> Result<(), TransportError>;
    fn set_avail_min(&mut self, frames: u64) -> Result<(), TransportError>;

    /// Install the thresholds on the stream.
    fn commit(self: Box<Self>) -> Result<(), TransportError>;
}
