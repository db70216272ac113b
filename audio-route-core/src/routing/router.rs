use std::sync::Arc;

use crate::control::programmer::ControlProgrammer;
use crate::models::device::{AudioMode, DeviceMask, StreamDirection};
use crate::models::error::RouteError;
use crate::models::params::OpenMode;
use crate::models::profile::ProfileTable;
use crate::models::warning::RouteWarning;
use crate::negotiation::{negotiate_hardware, negotiate_software};
use crate::routing::handle::{HandleId, RouteHandle};
use crate::traits::control_sequence::ControlSequence;
use crate::traits::mixer::MixerControl;
use crate::traits::modem::VoiceModem;
use crate::traits::observer::RouteObserver;
use crate::traits::transport::{PcmStream, PcmTransport};

/// What a `route` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The device mask was empty; nothing to route.
    NoDevices,
    /// The handle was already open for these devices and mode.
    AlreadyRouted,
    /// Mixer controls were reprogrammed on the open stream.
    Reprogrammed,
    /// The path was (re)opened and renegotiated.
    Opened,
}

/// Routes audio paths for a board.
///
/// Owns one [`RouteHandle`] per profile of the table. Generic over the PCM
/// transport and mixer backends; the board's mixer programming comes in as a
/// [`ControlSequence`].
///
/// State machine per handle:
/// ```text
///            route(d, m) / open
///   Closed ─────────────────────────→ Open(d, m)
///     ↑                                 │  route(d', m'), d' served → reprogram
///     └──────────── close ──────────────┘  route(d', m'), d' not served → reopen
/// ```
///
/// Calls are synchronous and expected to be serialized by the caller.
pub struct AudioRouter<T: PcmTransport, M: MixerControl> {
    transport: T,
    mixer: M,
    programmer: ControlProgrammer,
    modem: Option<Box<dyn VoiceModem>>,
    observer: Option<Arc<dyn RouteObserver>>,
    table: ProfileTable,
    handles: Vec<RouteHandle<T::Stream>>,
}

impl<T: PcmTransport, M: MixerControl> AudioRouter<T, M> {
    pub fn new(table: ProfileTable, transport: T, mixer: M, sequence: Box<dyn ControlSequence>) -> Self {
        let handles = Self::build_handles(&table);
        Self {
            transport,
            mixer,
            programmer: ControlProgrammer::new(sequence),
            modem: None,
            observer: None,
            table,
            handles,
        }
    }

    /// Attach a voice modem that applies call routing.
    pub fn with_modem(mut self, modem: Box<dyn VoiceModem>) -> Self {
        self.modem = Some(modem);
        self
    }

    pub fn set_observer(&mut self, observer: Arc<dyn RouteObserver>) {
        self.observer = Some(observer);
    }

    /// Close every open path and reset all handles to their profiles.
    pub fn initialize(&mut self) {
        log::debug!("Initializing {} route handles", self.table.profiles().len());
        self.close_all();
        self.handles = Self::build_handles(&self.table);
    }

    pub fn table(&self) -> &ProfileTable {
        &self.table
    }

    pub fn mixer(&self) -> &M {
        &self.mixer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn handles(&self) -> impl Iterator<Item = (HandleId, &RouteHandle<T::Stream>)> {
        self.handles.iter().enumerate().map(|(i, h)| (HandleId(i), h))
    }

    pub fn handle(&self, id: HandleId) -> Result<&RouteHandle<T::Stream>, RouteError> {
        self.handles.get(id.0).ok_or(RouteError::UnknownHandle(id.0))
    }

    /// The handle whose profile serves `devices` in `direction`.
    pub fn handle_for(&self, direction: StreamDirection, devices: DeviceMask) -> HandleId {
        HandleId(self.table.lookup_index(direction, devices))
    }

    /// Route `id` to `devices` in `mode`, doing as little as possible.
    pub fn route(&mut self, id: HandleId, devices: DeviceMask, mode: AudioMode) -> Result<RouteOutcome, RouteError> {
        log::debug!("route called for devices {} in mode {}...", devices, mode);

        if devices.is_empty() {
            log::debug!("Ignore the audio routing change as there's no device specified");
            return Ok(RouteOutcome::NoDevices);
        }

        let handle = self.handle(id)?;
        if handle.is_open() {
            if handle.current_devices == devices && handle.current_mode == mode {
                return Ok(RouteOutcome::AlreadyRouted);
            }
            if handle.devices().intersects(devices) {
                self.program_controls(id, devices, mode);
                return Ok(RouteOutcome::Reprogrammed);
            }

            let warning = RouteWarning::UnexpectedRoute {
                served: handle.devices(),
                requested: devices,
            };
            log::error!("Handle {}: {}", id, warning);
            self.emit(&[warning]);
        }

        self.open(id, devices, mode)?;
        Ok(RouteOutcome::Opened)
    }

    /// Close (if needed), program controls, open and negotiate `id`.
    ///
    /// If negotiation fails the error is returned and the stream stays open.
    pub fn open(&mut self, id: HandleId, devices: DeviceMask, mode: AudioMode) -> Result<(), RouteError> {
        // The underlying device may not change, but a previous error or
        // mixer state can only be recovered by starting over.
        let direction = self.handle(id)?.direction();
        if let Err(e) = self.close(id) {
            log::error!("Reopening handle {} after a failed close: {}", id, e);
        }

        log::debug!("open called for devices {} in mode {}...", devices, mode);

        let device_name = self.table.lookup(direction, devices).pcm_device.clone();

        // Routing paths must exist before the stream is opened.
        self.program_controls(id, devices, mode);

        let mut stream = match self.transport.open(&device_name, direction, OpenMode::Blocking) {
            Ok(stream) => stream,
            Err(source) => {
                log::error!(
                    "Failed to initialize {} device '{}': {}",
                    direction,
                    device_name,
                    source
                );
                self.handles[id.0].take_stream();
                return Err(RouteError::InitializationFailure {
                    device: device_name,
                    direction,
                    source,
                });
            }
        };

        let hw = match negotiate_hardware(&mut stream, self.handles[id.0].profile()) {
            Ok(hw) => hw,
            Err(e) => {
                self.handles[id.0].stream = Some(stream);
                return Err(e);
            }
        };
        self.emit(&hw.warnings);

        let software = negotiate_software(&mut stream, direction);
        let handle = &mut self.handles[id.0];
        handle.stream = Some(stream);
        handle.software = Some(software?);
        handle.negotiated = Some(hw.params);

        log::info!("Initialized {} device '{}'", direction, device_name);

        if let Some(modem) = self.modem.as_mut() {
            modem
                .apply_call_routing(devices, mode, &mut self.mixer)
                .map_err(|reason| {
                    log::error!("Voice modem call routing failed: {}", reason);
                    RouteError::ModemFailure(reason)
                })?;
        }

        Ok(())
    }

    /// Drain and close `id`'s stream. Closing a closed handle is a no-op.
    pub fn close(&mut self, id: HandleId) -> Result<(), RouteError> {
        let handle = self
            .handles
            .get_mut(id.0)
            .ok_or(RouteError::UnknownHandle(id.0))?;
        let Some(stream) = handle.take_stream() else {
            return Ok(());
        };
        Self::release(stream).map_err(|source| RouteError::CloseFailure {
            device: handle.profile().pcm_device.clone(),
            source,
        })
    }

    fn release(mut stream: T::Stream) -> Result<(), crate::models::error::TransportError> {
        if let Err(e) = stream.drain() {
            log::warn!("Failed to drain stream before close: {}", e);
        }
        stream.close()
    }

    fn close_all(&mut self) {
        for handle in &mut self.handles {
            if let Some(stream) = handle.take_stream() {
                if let Err(e) = Self::release(stream) {
                    log::error!("Failed to close '{}': {}", handle.profile().pcm_device, e);
                }
            }
        }
    }

    fn program_controls(&mut self, id: HandleId, devices: DeviceMask, mode: AudioMode) {
        let handle = &mut self.handles[id.0];
        let report = self.programmer.program(
            handle.profile().strategy,
            devices,
            mode,
            &mut self.mixer,
            self.modem.as_deref_mut(),
        );
        handle.current_devices = devices;
        handle.current_mode = mode;
        log::debug!(
            "Applied {} controls for devices {} ({} skipped)",
            report.applied,
            devices,
            report.warnings.len()
        );
        self.emit(&report.warnings);
    }

    fn emit(&self, warnings: &[RouteWarning]) {
        if let Some(observer) = &self.observer {
            for warning in warnings {
                observer.on_warning(warning);
            }
        }
    }

    fn build_handles(table: &ProfileTable) -> Vec<RouteHandle<T::Stream>> {
        table.profiles().iter().cloned().map(RouteHandle::new).collect()
    }
}

impl<T: PcmTransport, M: MixerControl> Drop for AudioRouter<T, M> {
    fn drop(&mut self) {
        self.close_all();
    }
}
