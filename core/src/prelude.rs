use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Geographic coordinate pair as reported by the position provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Schedule periods for the stopwatch controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub display_tick_ms: u64,
    pub location_tick_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            display_tick_ms: 100,
            location_tick_ms: 10_000,
        }
    }
}

impl ControllerConfig {
    pub fn display_tick(&self) -> Duration {
        Duration::from_millis(self.display_tick_ms)
    }

    pub fn location_tick(&self) -> Duration {
        Duration::from_millis(self.location_tick_ms)
    }
}

/// Common error type for collaborator failures.
#[derive(thiserror::Error, Debug, Clone)]
pub enum TrackError {
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
}

pub type TrackResult<T> = Result<T, TrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_config_defaults_to_stopwatch_periods() {
        let config = ControllerConfig::default();
        assert_eq!(config.display_tick(), Duration::from_millis(100));
        assert_eq!(config.location_tick(), Duration::from_secs(10));
    }
}
