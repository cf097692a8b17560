use crate::prelude::GeoPoint;

/// Identifier for a marker object placed on the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// Identifier for an info bubble placed on the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BubbleHandle(pub u64);

/// Map widget collaborator.
///
/// Handles are minted by the widget; the caller owns their lifecycle and is
/// responsible for removing an object before adding its replacement.
pub trait MapView: Send {
    fn set_center(&mut self, point: GeoPoint);
    fn add_marker(&mut self, point: GeoPoint) -> MarkerHandle;
    fn remove_marker(&mut self, marker: MarkerHandle);
    fn add_bubble(&mut self, anchor: GeoPoint, content: &str) -> BubbleHandle;
    fn remove_bubble(&mut self, bubble: BubbleHandle);
    /// Converts viewport coordinates from a tap gesture to a geographic
    /// point. `None` when the widget has no projection yet.
    fn screen_to_geo(&self, x: f64, y: f64) -> Option<GeoPoint>;
}
