use crate::gui_bridge::model::ModelMapView;
use crate::workflow::config::{ScenarioConfig, StepAction};
use log::{info, warn};
use std::time::Duration;
use tokio::time::Instant;
use trackcore::controller::{CaptureController, Stopwatch};
use trackcore::view::map::MapView;

/// Replays the scripted UI steps against the controller handles.
pub struct Runner {
    config: ScenarioConfig,
}

impl Runner {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    pub async fn execute(
        &self,
        stopwatch: &Stopwatch,
        capture: &CaptureController,
        map: &ModelMapView,
    ) {
        let origin = Instant::now();
        for step in &self.config.steps {
            tokio::time::sleep_until(origin + Duration::from_millis(step.at_ms)).await;
            match &step.action {
                StepAction::Start => {
                    info!("scenario: start at {} ms", step.at_ms);
                    stopwatch.start();
                }
                StepAction::Stop => {
                    info!("scenario: stop at {} ms", step.at_ms);
                    stopwatch.stop();
                }
                StepAction::Capture => {
                    info!("scenario: capture at {} ms", step.at_ms);
                    capture.capture();
                }
                StepAction::Tap { x, y } => match map.screen_to_geo(*x, *y) {
                    Some(point) => {
                        info!(
                            "scenario: tap at {} ms -> {:.5}, {:.5}",
                            step.at_ms, point.lat, point.lng
                        );
                        stopwatch.set_destination(point);
                    }
                    None => warn!("scenario: tap at {} ms fell outside the viewport", step.at_ms),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::camera::SimulatedCamera;
    use crate::devices::geowalk::SimulatedPositionProvider;
    use crate::gui_bridge::model::{ModelElapsedSink, ModelPhotoSink, ViewModel};
    use crate::workflow::config::ScenarioStep;
    use std::sync::{Arc, RwLock};
    use trackcore::timing::SystemClock;

    fn scripted_config() -> ScenarioConfig {
        ScenarioConfig {
            position_failure_rate: 0.0,
            position_latency_ms: 0,
            camera_latency_ms: 0,
            steps: vec![
                ScenarioStep {
                    at_ms: 0,
                    action: StepAction::Start,
                },
                ScenarioStep {
                    at_ms: 500,
                    action: StepAction::Tap { x: 400.0, y: 300.0 },
                },
                ScenarioStep {
                    at_ms: 700,
                    action: StepAction::Capture,
                },
                ScenarioStep {
                    at_ms: 1_200,
                    action: StepAction::Stop,
                },
            ],
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runner_drives_the_full_session() {
        let config = scripted_config();
        let state = Arc::new(RwLock::new(ViewModel::default()));
        let map = ModelMapView::new(state.clone());
        let provider = SimulatedPositionProvider::new(config.walk_config());
        let camera = SimulatedCamera::new(config.platform(), config.camera_latency(), true);

        let stopwatch = Stopwatch::spawn(
            Arc::new(SystemClock),
            Arc::new(provider),
            Box::new(map.clone()),
            Box::new(ModelElapsedSink::new(state.clone())),
            config.to_controller_config(),
        );
        let capture = CaptureController::spawn(
            Arc::new(camera),
            Box::new(ModelPhotoSink::new(state.clone())),
            config.platform(),
        );

        let runner = Runner::new(config);
        runner.execute(&stopwatch, &capture, &map).await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        let model = state.read().unwrap();
        assert!(model.marker.is_some());
        assert!(model.bubble.is_some());
        assert!(model.photo_visible);
        assert!(model
            .photo
            .as_deref()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
        // Stopped at 1.2s; the frozen display reads a value from that run.
        assert!(model.elapsed.starts_with("00:01."), "got {}", model.elapsed);
    }
}
