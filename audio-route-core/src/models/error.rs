use thiserror::Error;

use super::device::StreamDirection;

/// Error reported by the PCM transport, carrying its numeric code and the
/// transport's own description of it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} (code {code})")]
pub struct TransportError {
    pub code: i32,
    pub message: String,
}

impl TransportError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Failure to apply a single named mixer control.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("control not found: {0}")]
    NotFound(String),

    #[error("failed to write control {name}: {reason}")]
    WriteFailed { name: String, reason: String },
}

/// Errors returned by routing operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The transport could not be opened for the resolved device.
    #[error("failed to initialize {direction} device '{device}': {source}")]
    InitializationFailure {
        device: String,
        direction: StreamDirection,
        source: TransportError,
    },

    /// A hardware or software parameter step failed.
    #[error("unable to {step}: {source}")]
    NegotiationFailure {
        step: &'static str,
        source: TransportError,
    },

    /// The voice modem rejected call routing after a reopen.
    #[error("voice modem call routing failed: {0}")]
    ModemFailure(String),

    #[error("failed to close device '{device}': {source}")]
    CloseFailure {
        device: String,
        source: TransportError,
    },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("no route handle with id {0}")]
    UnknownHandle(usize),
}

impl RouteError {
    pub(crate) fn negotiation(step: &'static str) -> impl FnOnce(TransportError) -> Self {
        move |source| Self::NegotiationFailure { step, source }
    }
}
