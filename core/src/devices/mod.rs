pub mod camera;
pub mod position;

pub use camera::{Camera, Platform};
pub use position::{PositionOptions, PositionProvider};
