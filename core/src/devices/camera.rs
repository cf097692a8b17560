use crate::prelude::TrackResult;
use std::future::Future;
use std::pin::Pin;

pub type PictureFuture = Pin<Box<dyn Future<Output = TrackResult<String>> + Send>>;

/// Asynchronous one-shot camera collaborator.
///
/// The payload format depends on the hosting platform: browser builds hand
/// back base64-encoded bytes, device builds hand back a resource reference.
pub trait Camera: Send + Sync + 'static {
    fn take_picture(&self) -> PictureFuture;
}

/// Hosting platform, derived from the environment's platform-identity
/// string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Browser,
    Device,
}

impl Platform {
    pub fn from_identity(identity: &str) -> Self {
        if identity.eq_ignore_ascii_case("browser") {
            Platform::Browser
        } else {
            Platform::Device
        }
    }

    /// Converts a raw camera payload to a displayable image source.
    pub fn display_source(&self, data: String) -> String {
        match self {
            Platform::Browser => format!("data:image/jpeg;base64,{}", data),
            Platform::Device => data,
        }
    }
}
