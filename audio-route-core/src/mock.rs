//! In-memory collaborators for testing routing without hardware.
//!
//! Each mock shares its recorded state behind an `Arc<Mutex<_>>`, so a test
//! can keep a clone for assertions after handing the original to a router.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::device::{AudioMode, DeviceMask, StreamDirection};
use crate::models::error::{ControlError, TransportError};
use crate::models::params::{Access, NegotiatedParams, OpenMode, SampleFormat, SoftwareParams};
use crate::traits::mixer::MixerControl;
use crate::traits::modem::VoiceModem;
use crate::traits::transport::{HwParams, PcmStream, PcmTransport, SwParams};

const EINVAL: i32 = -22;
const ENODEV: i32 = -19;
const EBADFD: i32 = -77;

/// Rate a mock device runs at before any rate is negotiated.
const DEVICE_DEFAULT_RATE: u32 = 48000;

/// Something the mock transport was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Open {
        stream: u32,
        name: String,
        direction: StreamDirection,
        mode: OpenMode,
        /// Write attempts the attached mixer had seen when the stream opened.
        mixer_attempts: usize,
    },
    HwCommit { stream: u32, params: NegotiatedParams },
    SwCommit { stream: u32, params: SoftwareParams },
    Drain { stream: u32 },
    Close { stream: u32 },
}

#[derive(Debug, Default)]
struct TransportState {
    next_stream: u32,
    events: Vec<TransportEvent>,
    failing: HashSet<&'static str>,
    reject_buffer_time: bool,
    forced_rate: Option<u32>,
    mixer: Option<Arc<Mutex<MixerState>>>,
}

impl TransportState {
    fn check(&self, step: &'static str) -> Result<(), TransportError> {
        if self.failing.contains(step) {
            Err(TransportError::new(EINVAL, format!("Invalid argument ({})", step)))
        } else {
            Ok(())
        }
    }
}

/// Mock PCM transport.
///
/// Steps can be made to fail by name: `open`, `hw_params`, `access`,
/// `format`, `channels`, `rate`, `buffer_size`, `buffer_time`,
/// `period_time`, `period_size`, `hw_commit`, `sw_params`,
/// `start_threshold`, `stop_threshold`, `avail_min`, `sw_commit`,
/// `drain`, `close`.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<TransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_step(&self, step: &'static str) {
        self.state.lock().failing.insert(step);
    }

    /// Stamp each `Open` event with `mixer`'s write attempts so far, so a
    /// test can tell whether controls were programmed before the open.
    pub fn attach_mixer(&self, mixer: &MockMixer) {
        self.state.lock().mixer = Some(Arc::clone(&mixer.state));
    }

    /// Make the device refuse buffer-time requests (fixed-period hardware).
    pub fn reject_buffer_time(&self) {
        self.state.lock().reject_buffer_time = true;
    }

    /// Make the device grant `rate` whatever rate is requested.
    pub fn force_rate(&self, rate: u32) {
        self.state.lock().forced_rate = Some(rate);
    }

    pub fn events(&self) -> Vec<TransportEvent> {
        self.state.lock().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }

    /// Shared view of the event log for tests that move the transport.
    pub fn events_handle(&self) -> EventLog {
        EventLog {
            state: Arc::clone(&self.state),
        }
    }
}

/// Shared read access to a [`MockTransport`]'s event log.
#[derive(Debug, Clone)]
pub struct EventLog {
    state: Arc<Mutex<TransportState>>,
}

impl EventLog {
    pub fn lock(&self) -> parking_lot::MappedMutexGuard<'_, Vec<TransportEvent>> {
        parking_lot::MutexGuard::map(self.state.lock(), |state| &mut state.events)
    }
}

impl PcmTransport for MockTransport {
    type Stream = MockStream;

    fn open(&mut self, name: &str, direction: StreamDirection, mode: OpenMode) -> Result<MockStream, TransportError> {
        let mut state = self.state.lock();
        if state.failing.contains("open") {
            return Err(TransportError::new(ENODEV, "No such device"));
        }

        state.next_stream += 1;
        let id = state.next_stream;
        let mixer_attempts = state.mixer.as_ref().map_or(0, |mixer| mixer.lock().attempts);
        state.events.push(TransportEvent::Open {
            stream: id,
            name: name.to_string(),
            direction,
            mode,
            mixer_attempts,
        });

        Ok(MockStream {
            id,
            state: Arc::clone(&self.state),
            committed_hw: None,
            committed_sw: None,
            preset_sizes: None,
        })
    }
}

/// Stream handed out by [`MockTransport`].
#[derive(Debug)]
pub struct MockStream {
    id: u32,
    state: Arc<Mutex<TransportState>>,
    committed_hw: Option<NegotiatedParams>,
    committed_sw: Option<SoftwareParams>,
    preset_sizes: Option<(u64, u64)>,
}

impl MockStream {
    /// Identity of this stream; a reopen yields a new id.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn committed_hw(&self) -> Option<NegotiatedParams> {
        self.committed_hw
    }

    pub fn committed_sw(&self) -> Option<SoftwareParams> {
        self.committed_sw
    }

    /// Pretend hardware parameters committing `(buffer, period)` frames.
    pub fn preset_committed_sizes(&mut self, buffer_frames: u64, period_frames: u64) {
        self.preset_sizes = Some((buffer_frames, period_frames));
    }
}

impl PcmStream for MockStream {
    fn hw_params(&mut self) -> Result<Box<dyn HwParams + '_>, TransportError> {
        self.state.lock().check("hw_params")?;
        Ok(Box::new(MockHwParams {
            stream: self,
            format: SampleFormat::UNKNOWN,
            channels: 0,
            rate: DEVICE_DEFAULT_RATE,
            buffer_frames: 0,
            period_frames: 0,
        }))
    }

    fn sw_params(&mut self) -> Result<Box<dyn SwParams + '_>, TransportError> {
        self.state.lock().check("sw_params")?;
        Ok(Box::new(MockSwParams {
            stream: self,
            start_threshold: 0,
            stop_threshold: 0,
            avail_min: 0,
        }))
    }

    fn buffer_and_period(&self) -> Result<(u64, u64), TransportError> {
        self.committed_hw
            .map(|hw| (hw.buffer_frames, hw.period_frames))
            .or(self.preset_sizes)
            .ok_or_else(|| TransportError::new(EBADFD, "File descriptor in bad state"))
    }

    fn drain(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.check("drain")?;
        state.events.push(TransportEvent::Drain { stream: self.id });
        Ok(())
    }

    fn close(self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.events.push(TransportEvent::Close { stream: self.id });
        state.check("close")
    }
}

struct MockHwParams<'a> {
    stream: &'a mut MockStream,
    format: SampleFormat,
    channels: u32,
    rate: u32,
    buffer_frames: u64,
    period_frames: u64,
}

impl MockHwParams<'_> {
    fn check(&self, step: &'static str) -> Result<(), TransportError> {
        self.stream.state.lock().check(step)
    }

    fn frames_for(&self, us: u32) -> u64 {
        u64::from(us) * u64::from(self.rate) / 1_000_000
    }

    fn time_for(&self, frames: u64) -> u32 {
        (frames * 1_000_000 / u64::from(self.rate.max(1))) as u32
    }
}

impl HwParams for MockHwParams<'_> {
    fn set_access(&mut self, _access: Access) -> Result<(), TransportError> {
        self.check("access")
    }

    fn set_format(&mut self, format: SampleFormat) -> Result<(), TransportError> {
        self.check("format")?;
        if !format.is_valid() {
            return Err(TransportError::new(EINVAL, "Invalid argument"));
        }
        self.format = format;
        Ok(())
    }

    fn set_channels(&mut self, channels: u32) -> Result<(), TransportError> {
        self.check("channels")?;
        self.channels = channels;
        Ok(())
    }

    fn set_rate_near(&mut self, rate: u32) -> Result<u32, TransportError> {
        self.check("rate")?;
        self.rate = self.stream.state.lock().forced_rate.unwrap_or(rate);
        Ok(self.rate)
    }

    fn set_buffer_size_near(&mut self, frames: u64) -> Result<u64, TransportError> {
        self.check("buffer_size")?;
        self.buffer_frames = frames;
        Ok(frames)
    }

    fn set_buffer_time_near(&mut self, us: u32) -> Result<u32, TransportError> {
        self.check("buffer_time")?;
        if self.stream.state.lock().reject_buffer_time {
            return Err(TransportError::new(EINVAL, "Invalid argument"));
        }
        self.buffer_frames = self.frames_for(us);
        Ok(self.time_for(self.buffer_frames))
    }

    fn set_period_time_near(&mut self, us: u32) -> Result<u32, TransportError> {
        self.check("period_time")?;
        self.period_frames = self.frames_for(us);
        Ok(self.time_for(self.period_frames))
    }

    fn period_size(&self) -> Result<u64, TransportError> {
        self.check("period_size")?;
        Ok(self.period_frames)
    }

    fn buffer_size(&self) -> Result<u64, TransportError> {
        Ok(self.buffer_frames)
    }

    fn buffer_time(&self) -> Result<u32, TransportError> {
        Ok(self.time_for(self.buffer_frames))
    }

    fn commit(self: Box<Self>) -> Result<(), TransportError> {
        self.check("hw_commit")?;
        let params = NegotiatedParams {
            format: self.format,
            channels: self.channels,
            sample_rate: self.rate,
            buffer_frames: self.buffer_frames,
            period_frames: self.period_frames,
            latency_us: self.time_for(self.buffer_frames),
        };
        self.stream.committed_hw = Some(params);
        self.stream.state.lock().events.push(TransportEvent::HwCommit {
            stream: self.stream.id,
            params,
        });
        Ok(())
    }
}

struct MockSwParams<'a> {
    stream: &'a mut MockStream,
    start_threshold: u64,
    stop_threshold: u64,
    avail_min: u64,
}

impl MockSwParams<'_> {
    fn check(&self, step: &'static str) -> Result<(), TransportError> {
        self.stream.state.lock().check(step)
    }
}

impl SwParams for MockSwParams<'_> {
    fn set_start_threshold(&mut self, frames: u64) -> Result<(), TransportError> {
        self.check("start_threshold")?;
        self.start_threshold = frames;
        Ok(())
    }

    fn set_stop_threshold(&mut self, frames: u64) -> Result<(), TransportError> {
        self.check("stop_threshold")?;
        self.stop_threshold = frames;
        Ok(())
    }

    fn set_avail_min(&mut self, frames: u64) -> Result<(), TransportError> {
        self.check("avail_min")?;
        self.avail_min = frames;
        Ok(())
    }

    fn commit(self: Box<Self>) -> Result<(), TransportError> {
        self.check("sw_commit")?;
        let params = SoftwareParams {
            start_threshold: self.start_threshold,
            stop_threshold: self.stop_threshold,
            avail_min: self.avail_min,
        };
        self.stream.committed_sw = Some(params);
        self.stream.state.lock().events.push(TransportEvent::SwCommit {
            stream: self.stream.id,
            params,
        });
        Ok(())
    }
}

/// A successful write recorded by [`MockMixer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MixerWrite {
    Enumerated(String, String),
    Integer(String, i64),
}

impl MixerWrite {
    pub fn name(&self) -> &str {
        match self {
            Self::Enumerated(name, _) | Self::Integer(name, _) => name,
        }
    }
}

#[derive(Debug, Default)]
struct MixerState {
    writes: Vec<MixerWrite>,
    missing: HashSet<String>,
    rejected: HashSet<(String, i64)>,
    attempts: usize,
}

/// Mock mixer card accepting every control name unless told otherwise.
#[derive(Debug, Clone)]
pub struct MockMixer {
    card: String,
    state: Arc<Mutex<MixerState>>,
}

impl MockMixer {
    pub fn new(card: impl Into<String>) -> Self {
        Self {
            card: card.into(),
            state: Arc::new(Mutex::new(MixerState::default())),
        }
    }

    /// Behave as hardware lacking the control `name`.
    pub fn remove_control(&self, name: &str) {
        self.state.lock().missing.insert(name.to_string());
    }

    /// Refuse writes of `value` to `name`.
    pub fn reject_value(&self, name: &str, value: i64) {
        self.state.lock().rejected.insert((name.to_string(), value));
    }

    /// Successful writes in order.
    pub fn writes(&self) -> Vec<MixerWrite> {
        self.state.lock().writes.clone()
    }

    /// Number of write attempts, successful or not.
    pub fn attempts(&self) -> usize {
        self.state.lock().attempts
    }

    pub fn clear_writes(&self) {
        let mut state = self.state.lock();
        state.writes.clear();
        state.attempts = 0;
    }

    /// Last successful write to `name`.
    pub fn value_of(&self, name: &str) -> Option<MixerWrite> {
        self.state
            .lock()
            .writes
            .iter()
            .rev()
            .find(|w| w.name() == name)
            .cloned()
    }

    pub fn enumerated_value(&self, name: &str) -> Option<String> {
        match self.value_of(name)? {
            MixerWrite::Enumerated(_, value) => Some(value),
            MixerWrite::Integer(..) => None,
        }
    }

    pub fn integer_value(&self, name: &str) -> Option<i64> {
        match self.value_of(name)? {
            MixerWrite::Integer(_, value) => Some(value),
            MixerWrite::Enumerated(..) => None,
        }
    }
}

impl MixerControl for MockMixer {
    fn card(&self) -> &str {
        &self.card
    }

    fn set_enumerated(&mut self, name: &str, value: &str) -> Result<(), ControlError> {
        let mut state = self.state.lock();
        state.attempts += 1;
        if state.missing.contains(name) {
            return Err(ControlError::NotFound(name.to_string()));
        }
        state
            .writes
            .push(MixerWrite::Enumerated(name.to_string(), value.to_string()));
        Ok(())
    }

    fn set_integer(&mut self, name: &str, value: i64) -> Result<(), ControlError> {
        let mut state = self.state.lock();
        state.attempts += 1;
        if state.missing.contains(name) {
            return Err(ControlError::NotFound(name.to_string()));
        }
        if state.rejected.contains(&(name.to_string(), value)) {
            return Err(ControlError::WriteFailed {
                name: name.to_string(),
                reason: format!("value {} out of range", value),
            });
        }
        state.writes.push(MixerWrite::Integer(name.to_string(), value));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ModemState {
    calls: Vec<(DeviceMask, AudioMode)>,
    failure: Option<String>,
}

/// Mock voice modem recording each call-routing request.
///
/// Each call writes [`MockModem::MARKER_CONTROL`] with the mode value so
/// tests can see where in a mixer sequence the modem ran.
#[derive(Debug, Clone, Default)]
pub struct MockModem {
    state: Arc<Mutex<ModemState>>,
}

impl MockModem {
    pub const MARKER_CONTROL: &'static str = "Modem Call Mode";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, reason: &str) {
        self.state.lock().failure = Some(reason.to_string());
    }

    pub fn calls(&self) -> Vec<(DeviceMask, AudioMode)> {
        self.state.lock().calls.clone()
    }
}

impl VoiceModem for MockModem {
    fn apply_call_routing(
        &mut self,
        devices: DeviceMask,
        mode: AudioMode,
        mixer: &mut dyn MixerControl,
    ) -> Result<(), String> {
        let mut state = self.state.lock();
        state.calls.push((devices, mode));
        mixer
            .set_integer(Self::MARKER_CONTROL, i64::from(mode.0))
            .map_err(|e| e.to_string())?;
        match &state.failure {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }
}
