pub mod display;
pub mod map;

pub use display::{ElapsedSink, PhotoSink};
pub use map::{BubbleHandle, MapView, MarkerHandle};
