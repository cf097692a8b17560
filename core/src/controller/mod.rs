pub mod capture;
pub mod state;
pub mod stopwatch;

pub use capture::CaptureController;
pub use state::{RunState, TrackerState, UpdateTag};
pub use stopwatch::Stopwatch;
