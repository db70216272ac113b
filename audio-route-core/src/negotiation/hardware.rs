use crate::models::device::StreamDirection;
use crate::models::error::{RouteError, TransportError};
use crate::models::params::{Access, NegotiatedParams};
use crate::models::profile::DeviceProfile;
use crate::models::warning::RouteWarning;
use crate::traits::transport::{HwParams, PcmStream};

/// Number of periods the buffer is split into when deriving the period time.
const PERIODS_PER_BUFFER: u32 = 4;

/// Result of a successful hardware negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareOutcome {
    pub params: NegotiatedParams,
    pub warnings: Vec<RouteWarning>,
}

/// Negotiate and commit hardware parameters for `profile` on `stream`.
///
/// Sequence:
/// 1. Interleaved read/write access
/// 2. Format, then channel count, from the profile
/// 3. Sample rate near the profile's rate (a different rate is a warning)
/// 4. Buffer size near the profile's desired frames
/// 5. Buffer time near the target latency; if the device rejects that,
///    period time = latency / 4 and buffer = max(4 periods, desired frames).
///    Otherwise period time = (granted buffer time) / 4.
/// 6. Commit
///
/// Any failed step aborts with the transport's error; nothing is returned
/// for the handle to record unless the commit succeeds.
pub fn negotiate_hardware<S: PcmStream>(
    stream: &mut S,
    profile: &DeviceProfile,
) -> Result<HardwareOutcome, RouteError> {
    let direction = profile.direction();
    let format = profile.format;
    let mut warnings = Vec::new();

    let mut hw = stream.hw_params().map_err(fail("configure hardware"))?;

    hw.set_access(Access::RwInterleaved)
        .map_err(fail("configure PCM read/write format"))?;

    hw.set_format(format).map_err(|source| {
        log::error!(
            "Unable to configure PCM format {} ({}): {}",
            format.name(),
            format.description(),
            source
        );
        RouteError::NegotiationFailure {
            step: "set PCM format",
            source,
        }
    })?;
    log::debug!(
        "Set {} PCM format to {} ({})",
        direction,
        format.name(),
        format.description()
    );

    hw.set_channels(profile.channels)
        .map_err(fail("set channel count"))?;
    log::debug!(
        "Using {} {} for {}",
        profile.channels,
        if profile.channels == 1 { "channel" } else { "channels" },
        direction
    );

    let sample_rate = negotiate_rate(&mut *hw, profile, direction, &mut warnings);

    hw.set_buffer_size_near(profile.buffer_frames)
        .map_err(fail("set buffer size"))?;

    let mut latency_us = profile.latency_us;
    let buffer_frames = match hw.set_buffer_time_near(latency_us) {
        Err(err) => {
            log::debug!("Buffer time {}us rejected ({}), sizing by period instead", latency_us, err);
            hw.set_period_time_near(latency_us / PERIODS_PER_BUFFER)
                .map_err(fail("set the period time for latency"))?;
            let period_frames = hw
                .period_size()
                .map_err(fail("get the period size for latency"))?;
            let wanted = (period_frames * u64::from(PERIODS_PER_BUFFER)).max(profile.buffer_frames);
            hw.set_buffer_size_near(wanted)
                .map_err(fail("set the buffer size for latency"))?
        }
        Ok(_) => {
            let buffer_frames = hw
                .buffer_size()
                .map_err(fail("get the buffer size for latency"))?;
            latency_us = hw
                .buffer_time()
                .map_err(fail("get the buffer time for latency"))?;
            hw.set_period_time_near(latency_us / PERIODS_PER_BUFFER)
                .map_err(fail("set the period time for latency"))?;
            buffer_frames
        }
    };

    let period_frames = hw.period_size().map_err(fail("get the period size"))?;

    log::debug!("Buffer size: {}", buffer_frames);
    log::debug!("Latency: {}", latency_us);

    hw.commit().map_err(fail("set hardware parameters"))?;

    Ok(HardwareOutcome {
        params: NegotiatedParams {
            format,
            channels: profile.channels,
            sample_rate,
            buffer_frames,
            period_frames,
            latency_us,
        },
        warnings,
    })
}

/// Rate negotiation never aborts: a rejected request keeps the requested
/// rate, a substituted rate is reported as a mismatch.
fn negotiate_rate(
    hw: &mut (dyn HwParams + '_),
    profile: &DeviceProfile,
    direction: StreamDirection,
    warnings: &mut Vec<RouteWarning>,
) -> u32 {
    let requested = profile.sample_rate;
    match hw.set_rate_near(requested) {
        Err(err) => {
            log::error!("Unable to set {} sample rate to {}: {}", direction, requested, err);
            requested
        }
        Ok(actual) if actual != requested => {
            // Fixed-rate devices: playback or capture will need resampling.
            let warning = RouteWarning::RateMismatch { requested, actual };
            log::warn!("{}", warning);
            warnings.push(warning);
            actual
        }
        Ok(actual) => {
            log::debug!("Set {} sample rate to {} HZ", direction, actual);
            actual
        }
    }
}

/// Log a failed step and wrap the transport error.
pub(crate) fn fail(step: &'static str) -> impl FnOnce(TransportError) -> RouteError {
    move |source| {
        log::error!("Unable to {}: {}", step, source);
        RouteError::negotiation(step)(source)
    }
}
