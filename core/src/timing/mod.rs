pub mod clock;
pub mod format;

pub use clock::{Clock, ManualClock, SystemClock};
pub use format::{format_duration, ZERO_DISPLAY};
