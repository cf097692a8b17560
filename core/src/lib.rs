//! Stopwatch and live-position coordination core for the tracker platform.
//!
//! The modules mirror the mobile stopwatch controller while providing
//! explicit trait seams for the device and view collaborators, a
//! single-writer update discipline, and staleness gating for in-flight
//! queries.

pub mod annotations;
pub mod controller;
pub mod devices;
pub mod prelude;
pub mod telemetry;
pub mod timing;
pub mod view;

pub use prelude::{ControllerConfig, GeoPoint, TrackError, TrackResult};
