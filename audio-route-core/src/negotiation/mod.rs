//! PCM parameter negotiation.
//!
//! Hardware parameters are negotiated first (access, format, channels, rate,
//! buffer and period sizing); software thresholds are then derived from the
//! committed buffer and period sizes.

pub mod hardware;
pub mod software;

pub use hardware::negotiate_hardware;
pub use software::negotiate_software;
