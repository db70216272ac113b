use crate::models::device::StreamDirection;
use crate::models::error::RouteError;
use crate::models::params::SoftwareParams;
use crate::traits::transport::PcmStream;

use super::hardware::fail;

/// Start/stop thresholds for a committed buffer of `buffer_frames`.
///
/// Playback starts only once the buffer is full to avoid an immediate
/// underrun; capture starts on the first frame to keep latency low.
pub fn thresholds(direction: StreamDirection, buffer_frames: u64, period_frames: u64) -> SoftwareParams {
    let start_threshold = match direction {
        StreamDirection::Playback => buffer_frames.saturating_sub(1),
        StreamDirection::Capture => 1,
    };
    SoftwareParams {
        start_threshold,
        stop_threshold: buffer_frames,
        avail_min: period_frames,
    }
}

/// Derive and commit software parameters from the stream's committed
/// buffer and period sizes.
pub fn negotiate_software<S: PcmStream>(
    stream: &mut S,
    direction: StreamDirection,
) -> Result<SoftwareParams, RouteError> {
    let (buffer_frames, period_frames) = stream
        .buffer_and_period()
        .map_err(fail("get buffer and period sizes"))?;
    let params = thresholds(direction, buffer_frames, period_frames);

    let mut sw = stream.sw_params().map_err(fail("get software parameters"))?;

    sw.set_start_threshold(params.start_threshold).map_err(|source| {
        log::error!(
            "Unable to set start threshold to {} frames: {}",
            params.start_threshold,
            source
        );
        RouteError::NegotiationFailure {
            step: "set start threshold",
            source,
        }
    })?;

    sw.set_stop_threshold(params.stop_threshold).map_err(|source| {
        log::error!(
            "Unable to set stop threshold to {} frames: {}",
            params.stop_threshold,
            source
        );
        RouteError::NegotiationFailure {
            step: "set stop threshold",
            source,
        }
    })?;

    // Wake the client once a full period can be transferred.
    sw.set_avail_min(params.avail_min)
        .map_err(fail("configure available minimum"))?;

    sw.commit().map_err(fail("configure software parameters"))?;

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::models::params::OpenMode;
    use crate::traits::transport::PcmTransport;

    #[test]
    fn playback_starts_when_buffer_full() {
        let params = thresholds(StreamDirection::Playback, 8192, 2048);
        assert_eq!(params.start_threshold, 8191);
        assert_eq!(params.stop_threshold, 8192);
        assert_eq!(params.avail_min, 2048);
    }

    #[test]
    fn capture_starts_on_first_frame() {
        let params = thresholds(StreamDirection::Capture, 2048, 512);
        assert_eq!(params.start_threshold, 1);
        assert_eq!(params.stop_threshold, 2048);
        assert_eq!(params.avail_min, 512);
    }

    #[test]
    fn commits_thresholds_from_committed_sizes() {
        let mut transport = MockTransport::new();
        let mut stream = transport
            .open("plughw:0,0", StreamDirection::Capture, OpenMode::Blocking)
            .unwrap();
        stream.preset_committed_sizes(2000, 500);

        let params = negotiate_software(&mut stream, StreamDirection::Capture).unwrap();

        assert_eq!(params.start_threshold, 1);
        assert_eq!(stream.committed_sw(), Some(params));
    }

    #[test]
    fn threshold_failure_aborts_before_commit() {
        let mut transport = MockTransport::new();
        transport.fail_step("stop_threshold");
        let mut stream = transport
            .open("plughw:0,0", StreamDirection::Playback, OpenMode::Blocking)
            .unwrap();
        stream.preset_committed_sizes(8192, 2048);

        let err = negotiate_software(&mut stream, StreamDirection::Playback).unwrap_err();

        assert!(matches!(err, RouteError::NegotiationFailure { step: "set stop threshold", .. }));
        assert!(stream.committed_sw().is_none());
    }
}
