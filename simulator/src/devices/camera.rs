use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use trackcore::devices::camera::{Camera, PictureFuture, Platform};
use trackcore::TrackError;

// Truncated JPEG header bytes; enough for the display layer to treat the
// payload as embedded image data.
const SAMPLE_JPEG_BASE64: &str = "/9j/4AAQSkZJRgABAQEASABIAAD/2wBDAAgGBgcGBQgHBwcJ";

/// Canned camera that mimics the platform plugin's payload formats:
/// base64 bytes on the browser platform, a saved-file reference elsewhere.
pub struct SimulatedCamera {
    platform: Platform,
    latency: Duration,
    available: bool,
    shots_taken: AtomicU64,
}

impl SimulatedCamera {
    pub fn new(platform: Platform, latency: Duration, available: bool) -> Self {
        Self {
            platform,
            latency,
            available,
            shots_taken: AtomicU64::new(0),
        }
    }

    fn next_payload(&self) -> String {
        match self.platform {
            Platform::Browser => SAMPLE_JPEG_BASE64.to_string(),
            Platform::Device => {
                let shot = self.shots_taken.fetch_add(1, Ordering::SeqCst) + 1;
                format!("file:///sdcard/DCIM/tracker/capture-{:04}.jpg", shot)
            }
        }
    }
}

impl Camera for SimulatedCamera {
    fn take_picture(&self) -> PictureFuture {
        let outcome = if self.available {
            Ok(self.next_payload())
        } else {
            Err(TrackError::CameraUnavailable(
                "simulated camera offline".to_string(),
            ))
        };
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

    #[tokio::test]
    async fn browser_camera_returns_raw_base64() {
        let camera = SimulatedCamera::new(Platform::Browser, Duration::ZERO, true);
        let payload = camera.take_picture().await.unwrap();
        // The data-URI prefix is the capture controller's job, not the
        // plugin's.
        assert!(!payload.starts_with("data:"));
        assert_eq!(payload, SAMPLE_JPEG_BASE64);
    }

    #[tokio::test]
    async fn device_camera_hands_out_distinct_file_references() {
        let camera = SimulatedCamera::new(Platform::Device, Duration::ZERO, true);
        let first = camera.take_picture().await.unwrap();
        let second = camera.take_picture().await.unwrap();
        assert!(first.starts_with("file:///"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn offline_camera_reports_unavailable() {
        let camera = SimulatedCamera::new(Platform::Device, Duration::ZERO, false);
        let outcome = camera.take_picture().await;
        assert!(matches!(outcome, Err(TrackError::CameraUnavailable(_))));
    }
}
