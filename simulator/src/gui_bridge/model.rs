use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use trackcore::view::display::{ElapsedSink, PhotoSink};
use trackcore::view::map::{BubbleHandle, MapView, MarkerHandle};
use trackcore::GeoPoint;

/// Marker annotation as mirrored to the GUI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerPin {
    pub id: u64,
    pub point: GeoPoint,
}

/// Info-bubble annotation as mirrored to the GUI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BubbleNote {
    pub id: u64,
    pub anchor: GeoPoint,
    pub content: String,
}

/// Linear projection used to translate tap coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub lat_span: f64,
    pub lng_span: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            lat_span: 0.02,
            lng_span: 0.03,
        }
    }
}

/// Everything the GUI needs to render one frame of the tracker view.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ViewModel {
    pub elapsed: String,
    pub center: Option<GeoPoint>,
    pub marker: Option<MarkerPin>,
    pub destination: Option<GeoPoint>,
    pub bubble: Option<BubbleNote>,
    pub photo: Option<String>,
    pub photo_visible: bool,
    pub viewport: Viewport,
    #[serde(skip)]
    next_handle: u64,
}

impl ViewModel {
    fn mint_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

/// Map widget stand-in writing into the shared view model.
#[derive(Clone)]
pub struct ModelMapView {
    state: Arc<RwLock<ViewModel>>,
}

impl ModelMapView {
    pub fn new(state: Arc<RwLock<ViewModel>>) -> Self {
        Self { state }
    }
}

impl MapView for ModelMapView {
    fn set_center(&mut self, point: GeoPoint) {
        self.state.write().unwrap().center = Some(point);
    }

    fn add_marker(&mut self, point: GeoPoint) -> MarkerHandle {
        let mut model = self.state.write().unwrap();
        let id = model.mint_handle();
        model.marker = Some(MarkerPin { id, point });
        MarkerHandle(id)
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        let mut model = self.state.write().unwrap();
        if model.marker.as_ref().map(|pin| pin.id) == Some(marker.0) {
            model.marker = None;
        }
    }

    fn add_bubble(&mut self, anchor: GeoPoint, content: &str) -> BubbleHandle {
        let mut model = self.state.write().unwrap();
        let id = model.mint_handle();
        model.bubble = Some(BubbleNote {
            id,
            anchor,
            content: content.to_string(),
        });
        BubbleHandle(id)
    }

    fn remove_bubble(&mut self, bubble: BubbleHandle) {
        let mut model = self.state.write().unwrap();
        if model.bubble.as_ref().map(|note| note.id) == Some(bubble.0) {
            model.bubble = None;
        }
    }

    fn screen_to_geo(&self, x: f64, y: f64) -> Option<GeoPoint> {
        let model = self.state.read().unwrap();
        let viewport = model.viewport;
        if !(0.0..=viewport.width).contains(&x) || !(0.0..=viewport.height).contains(&y) {
            return None;
        }
        // No projection exists until the first fix centers the map.
        let center = model.center?;
        let lat = center.lat + (0.5 - y / viewport.height) * viewport.lat_span;
        let lng = center.lng + (x / viewport.width - 0.5) * viewport.lng_span;
        Some(GeoPoint::new(lat, lng))
    }
}

/// Elapsed-time text surface writing into the shared view model.
pub struct ModelElapsedSink {
    state: Arc<RwLock<ViewModel>>,
}

impl ModelElapsedSink {
    pub fn new(state: Arc<RwLock<ViewModel>>) -> Self {
        Self { state }
    }
}

impl ElapsedSink for ModelElapsedSink {
    fn show_elapsed(&mut self, text: &str) {
        self.state.write().unwrap().elapsed = text.to_string();
    }
}

/// Photo surface writing into the shared view model.
pub struct ModelPhotoSink {
    state: Arc<RwLock<ViewModel>>,
}

impl ModelPhotoSink {
    pub fn new(state: Arc<RwLock<ViewModel>>) -> Self {
        Self { state }
    }
}

impl PhotoSink for ModelPhotoSink {
    fn show(&mut self, source: &str) {
        let mut model = self.state.write().unwrap();
        model.photo = Some(source.to_string());
        model.photo_visible = true;
    }

    fn hide(&mut self) {
        self.state.write().unwrap().photo_visible = false;
    }
}
