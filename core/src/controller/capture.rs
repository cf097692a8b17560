use crate::devices::camera::{Camera, Platform};
use crate::prelude::TrackResult;
use crate::telemetry::{LogManager, MetricsRecorder};
use crate::view::display::PhotoSink;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

enum Msg {
    Capture,
    PictureResolved {
        seq: u64,
        outcome: TrackResult<String>,
    },
}

/// Handle to the photo capture controller.
///
/// Independent of the stopwatch lifecycle; `capture` may be invoked at any
/// time and never fails.
#[derive(Clone)]
pub struct CaptureController {
    tx: UnboundedSender<Msg>,
}

impl CaptureController {
    pub fn spawn(camera: Arc<dyn Camera>, photo: Box<dyn PhotoSink>, platform: Platform) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Worker {
            camera,
            photo,
            platform,
            tx: tx.clone(),
            issued: 0,
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        };
        tokio::spawn(worker.run(rx));
        Self { tx }
    }

    /// Hides the current photo and requests a new one.
    pub fn capture(&self) {
        let _ = self.tx.send(Msg::Capture);
    }
}

struct Worker {
    camera: Arc<dyn Camera>,
    photo: Box<dyn PhotoSink>,
    platform: Platform,
    tx: UnboundedSender<Msg>,
    issued: u64,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl Worker {
    async fn run(mut self, mut rx: UnboundedReceiver<Msg>) {
        while let Some(message) = rx.recv().await {
            match message {
                Msg::Capture => self.on_capture(),
                Msg::PictureResolved { seq, outcome } => self.on_picture(seq, outcome),
            }
        }
    }

    fn on_capture(&mut self) {
        self.photo.hide();
        self.issued += 1;
        let seq = self.issued;
        let request = self.camera.take_picture();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = request.await;
            let _ = tx.send(Msg::PictureResolved { seq, outcome });
        });
    }

    fn on_picture(&mut self, seq: u64, outcome: TrackResult<String>) {
        // A completion superseded by a newer capture request stays hidden;
        // the newer request already hid the surface.
        if seq != self.issued {
            self.metrics.record_discarded();
            self.logger.record("discarded superseded picture");
            return;
        }

        match outcome {
            Ok(data) => {
                let source = self.platform.display_source(data);
                self.photo.show(&source);
                self.metrics.record_applied();
            }
            Err(error) => {
                // The photo surface stays hidden for this cycle.
                self.metrics.record_error();
                self.logger.warn(&format!("picture request failed: {}", error));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::camera::PictureFuture;
    use crate::prelude::TrackError;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct PhotoModel {
        source: Option<String>,
        visible: bool,
        hides: usize,
    }

    #[derive(Clone, Default)]
    struct SharedPhoto(Arc<Mutex<PhotoModel>>);

    impl PhotoSink for SharedPhoto {
        fn show(&mut self, source: &str) {
            let mut model = self.0.lock().unwrap();
            model.source = Some(source.to_string());
            model.visible = true;
        }

        fn hide(&mut self) {
            let mut model = self.0.lock().unwrap();
            model.visible = false;
            model.hides += 1;
        }
    }

    struct ScriptedCamera {
        shots: Mutex<VecDeque<(Duration, TrackResult<String>)>>,
    }

    impl ScriptedCamera {
        fn new(shots: Vec<(Duration, TrackResult<String>)>) -> Self {
            Self {
                shots: Mutex::new(shots.into()),
            }
        }
    }

    impl Camera for ScriptedCamera {
        fn take_picture(&self) -> PictureFuture {
            let (latency, outcome) = self
                .shots
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((Duration::ZERO, Err(TrackError::CameraUnavailable("empty".into()))));
            Box::pin(async move {
                if latency > Duration::ZERO {
                    tokio::time::sleep(latency).await;
                }
                outcome
            })
        }
    }

    fn spawn_with(camera: ScriptedCamera, platform: Platform) -> (CaptureController, SharedPhoto) {
        let photo = SharedPhoto::default();
        let controller = CaptureController::spawn(Arc::new(camera), Box::new(photo.clone()), platform);
        (controller, photo)
    }

    #[tokio::test(start_paused = true)]
    async fn browser_capture_shows_data_uri() {
        let camera = ScriptedCamera::new(vec![(Duration::ZERO, Ok("AAAA".into()))]);
        let (controller, photo) = spawn_with(camera, Platform::Browser);

        controller.capture();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let model = photo.0.lock().unwrap();
        assert!(model.visible);
        assert_eq!(model.source.as_deref(), Some("data:image/jpeg;base64,AAAA"));
        assert_eq!(model.hides, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn device_capture_shows_resource_reference() {
        let camera = ScriptedCamera::new(vec![(Duration::ZERO, Ok("file:///photo.jpg".into()))]);
        let (controller, photo) = spawn_with(camera, Platform::Device);

        controller.capture();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(
            photo.0.lock().unwrap().source.as_deref(),
            Some("file:///photo.jpg")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_capture_leaves_photo_hidden() {
        let camera = ScriptedCamera::new(vec![(
            Duration::ZERO,
            Err(TrackError::CameraUnavailable("denied".into())),
        )]);
        let (controller, photo) = spawn_with(camera, Platform::Device);

        controller.capture();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let model = photo.0.lock().unwrap();
        assert!(!model.visible);
        assert!(model.source.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_capture_is_superseded_by_a_newer_one() {
        let camera = ScriptedCamera::new(vec![
            (Duration::from_secs(5), Ok("stale".into())),
            (Duration::from_secs(1), Ok("fresh".into())),
        ]);
        let (controller, photo) = spawn_with(camera, Platform::Device);

        controller.capture();
        controller.capture();
        tokio::time::sleep(Duration::from_secs(10)).await;

        let model = photo.0.lock().unwrap();
        assert!(model.visible);
        assert_eq!(model.source.as_deref(), Some("fresh"));
        assert_eq!(model.hides, 2);
    }
}
