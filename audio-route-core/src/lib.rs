//! # audio-route-core
//!
//! Board-agnostic hardware audio routing core.
//!
//! Given a logical device mask and an audio mode, the core negotiates a PCM
//! data path's hardware and software parameters against a transport and
//! drives a hardware mixer's routing graph so the requested devices are
//! connected. Boards (e.g. `audio-route-omap4`) supply a `ProfileTable` and a
//! `ControlSequence` and plug into the generic `AudioRouter`.
//!
//! ## Architecture
//!
//! ```text
//! audio-route-core (this crate)
//! ├── models/       ← DeviceMask, AudioMode, DeviceProfile, ProfileTable, RouteError, RouterConfig
//! ├── traits/       ← PcmTransport, PcmStream, MixerControl, VoiceModem, ControlSequence, RouteObserver
//! ├── control/      ← ControlSetting, ControlProgrammer (best-effort mixer programming)
//! ├── negotiation/  ← hardware + software parameter negotiation
//! ├── routing/      ← RouteHandle, AudioRouter (open/close/route state machine)
//! └── mock          ← in-memory transport, mixer and modem for tests
//! ```

pub mod control;
pub mod mock;
pub mod models;
pub mod negotiation;
pub mod routing;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use control::programmer::{ControlProgrammer, ProgramReport};
pub use control::setting::ControlSetting;
pub use models::config::RouterConfig;
pub use models::device::{AudioMode, DeviceMask, StreamDirection};
pub use models::error::{ControlError, RouteError, TransportError};
pub use models::params::{Access, NegotiatedParams, OpenMode, SampleFormat, SoftwareParams};
pub use models::profile::{ControlStrategy, DeviceClass, DeviceProfile, ProfileTable};
pub use models::warning::RouteWarning;
pub use routing::handle::{HandleId, RouteHandle};
pub use routing::router::{AudioRouter, RouteOutcome};
pub use traits::control_sequence::ControlSequence;
pub use traits::mixer::MixerControl;
pub use traits::modem::VoiceModem;
pub use traits::observer::RouteObserver;
pub use traits::transport::{HwParams, PcmStream, PcmTransport, SwParams};
