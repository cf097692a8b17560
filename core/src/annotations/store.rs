use crate::prelude::GeoPoint;
use crate::view::map::{BubbleHandle, MapView, MarkerHandle};

/// Fixed content of the destination info bubble.
pub const DESTINATION_LABEL: &str = "You want to get there!";

/// Bookkeeping for the transient map annotations.
///
/// Invariant: at most one live marker and one live bubble exist at any
/// time; a replacement is only added after its predecessor was removed
/// from the map.
#[derive(Default)]
pub struct AnnotationStore {
    marker: Option<MarkerHandle>,
    bubble: Option<BubbleHandle>,
    destination: Option<GeoPoint>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the destination. There is no clear operation; a new tap
    /// is the only way to change it.
    pub fn set_destination(&mut self, point: GeoPoint) {
        self.destination = Some(point);
    }

    pub fn destination(&self) -> Option<GeoPoint> {
        self.destination
    }

    /// Applies a successful location update: replaces the current-position
    /// marker, recenters the map, and recreates the destination bubble so
    /// its anchor tracks the current rendering.
    pub fn apply_position(&mut self, map: &mut dyn MapView, position: GeoPoint) {
        if let Some(marker) = self.marker.take() {
            map.remove_marker(marker);
        }
        if let Some(bubble) = self.bubble.take() {
            map.remove_bubble(bubble);
        }

        map.set_center(position);
        self.marker = Some(map.add_marker(position));

        // The bubble is anchored at the destination, not at the position.
        if let Some(destination) = self.destination {
            self.bubble = Some(map.add_bubble(destination, DESTINATION_LABEL));
        }
    }

    pub fn has_marker(&self) -> bool {
        self.marker.is_some()
    }

    pub fn has_bubble(&self) -> bool {
        self.bubble.is_some()
    }
}
