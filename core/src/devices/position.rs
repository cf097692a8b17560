use crate::prelude::{GeoPoint, TrackResult};
use std::future::Future;
use std::pin::Pin;

pub type PositionFuture = Pin<Box<dyn Future<Output = TrackResult<GeoPoint>> + Send>>;

/// Hints forwarded with each one-shot query.
#[derive(Debug, Clone, Copy)]
pub struct PositionOptions {
    pub high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
        }
    }
}

/// Asynchronous one-shot geolocation collaborator.
///
/// There is no latency bound; the caller must tolerate completions arriving
/// out of issue order or after it has moved on.
pub trait PositionProvider: Send + Sync + 'static {
    fn current_position(&self, options: PositionOptions) -> PositionFuture;
}
