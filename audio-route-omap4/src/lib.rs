//! # audio-route-omap4
//!
//! OMAP4 (ABE + TWL6040) board support for audio-route-core.
//!
//! Provides:
//! - `profile_table`: the six OMAP4 route profiles (SCO, FM, HDMI and
//!   default playback; SCO and default capture)
//! - `Omap4Controls`: mixer control sequences for the default analog path
//! - `omap4_router`: an `AudioRouter` wired with both
//!
//! ## Usage
//! ```ignore
//! use audio_route_core::{AudioMode, DeviceMask, RouterConfig, StreamDirection};
//! use audio_route_omap4::omap4_router;
//!
//! let mut router = omap4_router(transport, mixer, &RouterConfig::default())?;
//! let id = router.handle_for(StreamDirection::Playback, DeviceMask::OUT_SPEAKER);
//! router.route(id, DeviceMask::OUT_SPEAKER, AudioMode::NORMAL)?;
//! ```

pub mod controls;
pub mod profiles;

pub use controls::Omap4Controls;
pub use profiles::profile_table;

use audio_route_core::{AudioRouter, MixerControl, PcmTransport, RouteError, RouterConfig};

/// Build a router for the OMAP4 board over the given backends.
pub fn omap4_router<T: PcmTransport, M: MixerControl>(
    transport: T,
    mixer: M,
    config: &RouterConfig,
) -> Result<AudioRouter<T, M>, RouteError> {
    let table = profile_table(config)?;
    if mixer.card() != profiles::MIXER_CARD {
        log::warn!(
            "OMAP4 controls expect mixer card {}, got {}",
            profiles::MIXER_CARD,
            mixer.card()
        );
    }
    log::debug!("OMAP4 router with {} profiles", table.profiles().len());
    Ok(AudioRouter::new(table, transport, mixer, Box::new(Omap4Controls)))
}
