use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use trackcore::devices::position::{PositionFuture, PositionOptions, PositionProvider};
use trackcore::{GeoPoint, TrackError, TrackResult};

/// Configuration for the synthetic position feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoWalkConfig {
    pub start_lat: f64,
    pub start_lng: f64,
    /// Maximum coordinate delta per fix, in degrees.
    pub step: f64,
    pub seed: u64,
    /// Probability in [0, 1] that a query fails with PositionUnavailable.
    pub failure_rate: f64,
    pub latency_ms: u64,
}

impl Default for GeoWalkConfig {
    fn default() -> Self {
        Self {
            start_lat: 52.5,
            start_lng: 13.4,
            step: 0.0005,
            seed: 0,
            failure_rate: 0.0,
            latency_ms: 150,
        }
    }
}

/// Deterministic random-walk position provider.
///
/// Each query advances the walk by at most `step` degrees per axis; a
/// seeded RNG makes scenario runs replayable.
pub struct SimulatedPositionProvider {
    walk: Mutex<Walk>,
    step: f64,
    failure_rate: f64,
    latency: Duration,
}

struct Walk {
    rng: StdRng,
    position: GeoPoint,
}

impl SimulatedPositionProvider {
    pub fn new(config: GeoWalkConfig) -> Self {
        Self {
            walk: Mutex::new(Walk {
                rng: StdRng::seed_from_u64(config.seed),
                position: GeoPoint::new(config.start_lat, config.start_lng),
            }),
            step: config.step,
            failure_rate: config.failure_rate,
            latency: Duration::from_millis(config.latency_ms),
        }
    }

    fn next_fix(&self) -> TrackResult<GeoPoint> {
        let mut walk = self.walk.lock().unwrap();
        if walk.rng.gen::<f64>() < self.failure_rate {
            return Err(TrackError::PositionUnavailable(
                "simulated gps dropout".to_string(),
            ));
        }
        if self.step > 0.0 {
            let lat_jitter = walk.rng.gen_range(-self.step..self.step);
            let lng_jitter = walk.rng.gen_range(-self.step..self.step);
            walk.position.lat += lat_jitter;
            walk.position.lng += lng_jitter;
        }
        Ok(walk.position)
    }
}

impl PositionProvider for SimulatedPositionProvider {
    fn current_position(&self, _options: PositionOptions) -> PositionFuture {
        let outcome = self.next_fix();
        let latency = self.latency;
        Box::pin(async move {
            if latency > Duration::ZERO {
                tokio::time::sleep(latency).await;
            }
            outcome
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn immediate(config: GeoWalkConfig) -> SimulatedPositionProvider {
        SimulatedPositionProvider::new(GeoWalkConfig {
            latency_ms: 0,
            ..config
        })
    }

    #[tokio::test]
    async fn same_seed_replays_the_same_walk() {
        let first = immediate(GeoWalkConfig {
            seed: 7,
            ..Default::default()
        });
        let second = immediate(GeoWalkConfig {
            seed: 7,
            ..Default::default()
        });

        for _ in 0..5 {
            let a = first.current_position(PositionOptions::default()).await;
            let b = second.current_position(PositionOptions::default()).await;
            assert_eq!(a.unwrap(), b.unwrap());
        }
    }

    #[tokio::test]
    async fn walk_stays_within_step_of_previous_fix() {
        let provider = immediate(GeoWalkConfig {
            step: 0.001,
            ..Default::default()
        });

        let mut previous = GeoPoint::new(52.5, 13.4);
        for _ in 0..10 {
            let fix = provider
                .current_position(PositionOptions::default())
                .await
                .unwrap();
            assert!((fix.lat - previous.lat).abs() <= 0.001);
            assert!((fix.lng - previous.lng).abs() <= 0.001);
            previous = fix;
        }
    }

    #[tokio::test]
    async fn saturated_failure_rate_always_reports_unavailable() {
        let provider = immediate(GeoWalkConfig {
            failure_rate: 1.0,
            ..Default::default()
        });

        let outcome = provider.current_position(PositionOptions::default()).await;
        assert!(matches!(outcome, Err(TrackError::PositionUnavailable(_))));
    }
}
