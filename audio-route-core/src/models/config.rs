use serde::Deserialize;

use super::error::RouteError;

/// Stream targets used by a board to build its profile table.
///
/// Deserializable so deployments can override the defaults from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Requested playback sample rate in Hz (default: 44100).
    pub playback_sample_rate: u32,

    /// Target playback latency in microseconds (default: 200000).
    pub playback_latency_us: u32,

    /// Requested capture sample rate in Hz (default: 8000).
    pub capture_sample_rate: u32,

    /// Target capture latency in microseconds (default: 250000).
    pub capture_latency_us: u32,

    /// Desired capture buffer in frames before normalization (default: 2048).
    pub capture_buffer_frames: u64,
}

impl RouterConfig {
    pub fn from_json(json: &str) -> Result<Self, RouteError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RouteError::Configuration(format!("failed to parse router config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RouteError> {
        if self.playback_sample_rate == 0 || self.capture_sample_rate == 0 {
            return Err(RouteError::Configuration("sample rate must be positive".into()));
        }
        // The period time is derived as a quarter of the latency.
        if self.playback_latency_us < 4 || self.capture_latency_us < 4 {
            return Err(RouteError::Configuration(format!(
                "latency too small: playback {}us, capture {}us",
                self.playback_latency_us, self.capture_latency_us
            )));
        }
        if self.capture_buffer_frames == 0 {
            return Err(RouteError::Configuration("capture buffer must hold at least one frame".into()));
        }
        Ok(())
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            playback_sample_rate: 44100,
            playback_latency_us: 200_000,
            capture_sample_rate: 8000,
            capture_latency_us: 250_000,
            capture_buffer_frames: 2048,
        }
    }
}
