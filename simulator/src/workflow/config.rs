use crate::devices::geowalk::GeoWalkConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use trackcore::devices::Platform;
use trackcore::{ControllerConfig, GeoPoint};

/// One scripted UI action, fired at a fixed offset into the run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub at_ms: u64,
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub action: StepAction,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    Start,
    Stop,
    Capture,
    Tap { x: f64, y: f64 },
}

/// Driver configuration: controller periods, simulated device tuning, and
/// the scripted steps.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub display_tick_ms: u64,
    pub location_tick_ms: u64,
    pub start_lat: f64,
    pub start_lng: f64,
    pub walk_step: f64,
    pub seed: u64,
    pub position_failure_rate: f64,
    pub position_latency_ms: u64,
    pub camera_latency_ms: u64,
    pub platform: String,
    pub steps: Vec<ScenarioStep>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            display_tick_ms: 100,
            location_tick_ms: 10_000,
            start_lat: 52.5,
            start_lng: 13.4,
            walk_step: 0.0005,
            seed: 0,
            position_failure_rate: 0.05,
            position_latency_ms: 150,
            camera_latency_ms: 400,
            platform: "browser".to_string(),
            steps: vec![
                ScenarioStep {
                    at_ms: 0,
                    action: StepAction::Start,
                },
                ScenarioStep {
                    at_ms: 3_000,
                    action: StepAction::Tap { x: 520.0, y: 180.0 },
                },
                ScenarioStep {
                    at_ms: 6_000,
                    action: StepAction::Capture,
                },
                ScenarioStep {
                    at_ms: 15_000,
                    action: StepAction::Stop,
                },
            ],
        }
    }
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario config {}", path_ref.display()))?;
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(display_tick_ms: u64, location_tick_ms: u64, platform: String) -> Self {
        Self {
            display_tick_ms,
            location_tick_ms,
            platform,
            ..Default::default()
        }
    }

    pub fn to_controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            display_tick_ms: self.display_tick_ms,
            location_tick_ms: self.location_tick_ms,
        }
    }

    pub fn walk_config(&self) -> GeoWalkConfig {
        GeoWalkConfig {
            start_lat: self.start_lat,
            start_lng: self.start_lng,
            step: self.walk_step,
            seed: self.seed,
            failure_rate: self.position_failure_rate,
            latency_ms: self.position_latency_ms,
        }
    }

    pub fn start_point(&self) -> GeoPoint {
        GeoPoint::new(self.start_lat, self.start_lng)
    }

    pub fn platform(&self) -> Platform {
        Platform::from_identity(&self.platform)
    }

    pub fn camera_latency(&self) -> Duration {
        Duration::from_millis(self.camera_latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_controller_config() {
        let config = ScenarioConfig::from_args(50, 2_000, "android".into());
        let controller = config.to_controller_config();
        assert_eq!(controller.display_tick(), Duration::from_millis(50));
        assert_eq!(controller.location_tick(), Duration::from_secs(2));
        assert_eq!(config.platform(), Platform::Device);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"location_tick_ms: 5000\nplatform: browser\nsteps:\n  - at_ms: 0\n    action: start\n  - at_ms: 1000\n    action:\n      tap:\n        x: 10.0\n        y: 20.0\n",
        )
        .unwrap();
        let path = temp.into_temp_path();

        let config = ScenarioConfig::load(&path).unwrap();
        assert_eq!(config.location_tick_ms, 5_000);
        // Unlisted fields fall back to defaults.
        assert_eq!(config.display_tick_ms, 100);
        assert_eq!(config.steps.len(), 2);
        assert_eq!(config.steps[1].action, StepAction::Tap { x: 10.0, y: 20.0 });
    }
}
