use crate::gui_bridge::model::{ModelMapView, ViewModel};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use trackcore::controller::{CaptureController, Stopwatch};
use trackcore::view::map::MapView;
use warp::Filter;

fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// Tap gesture forwarded by the GUI in viewport coordinates.
#[derive(Debug, Deserialize)]
pub struct TapRequest {
    pub x: f64,
    pub y: f64,
}

/// Converts a tap to a destination selection. Taps that fall outside the
/// viewport, or arrive before the first fix has centered the map, are
/// ignored; the trigger itself never fails.
fn handle_tap(
    state: &Arc<RwLock<ViewModel>>,
    map: &ModelMapView,
    stopwatch: &Stopwatch,
    tap: &TapRequest,
) -> Value {
    match map.screen_to_geo(tap.x, tap.y) {
        Some(point) => {
            state.write().unwrap().destination = Some(point);
            stopwatch.set_destination(point);
            json!({ "status": "ok", "destination": point })
        }
        None => json!({ "status": "ignored" }),
    }
}

/// Bridge that hosts the tracker view endpoint and forwards UI triggers to
/// the controllers.
pub struct GuiBridge {
    state: Arc<RwLock<ViewModel>>,
}

impl GuiBridge {
    pub fn new(
        state: Arc<RwLock<ViewModel>>,
        map: ModelMapView,
        stopwatch: Stopwatch,
        capture: CaptureController,
    ) -> Self {
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());

        let view_route = warp::path("view")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<ViewModel>>| warp::reply::json(&*state.read().unwrap()));

        let start_watch = stopwatch.clone();
        let start_route = warp::path("start").and(warp::post()).map(move || {
            start_watch.start();
            warp::reply::json(&json!({ "status": "ok" }))
        });

        let stop_watch = stopwatch.clone();
        let stop_route = warp::path("stop").and(warp::post()).map(move || {
            stop_watch.stop();
            warp::reply::json(&json!({ "status": "ok" }))
        });

        let capture_route = warp::path("capture").and(warp::post()).map(move || {
            capture.capture();
            warp::reply::json(&json!({ "status": "ok" }))
        });

        let tap_state = state.clone();
        let tap_route = warp::path("tap")
            .and(warp::post())
            .and(warp::body::json())
            .map(move |tap: TapRequest| {
                warp::reply::json(&handle_tap(&tap_state, &map, &stopwatch, &tap))
            });

        thread::spawn(move || {
            let routes = view_route
                .or(start_route)
                .or(stop_route)
                .or(capture_route)
                .or(tap_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(gui_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish_status(&self, message: &str) {
        println!("[BRIDGE] {}", message);
    }

    pub fn snapshot(&self) -> ViewModel {
        self.state.read().unwrap().clone()
    }
}
