use anyhow::Context;
use clap::Parser;
use devices::camera::SimulatedCamera;
use devices::geowalk::SimulatedPositionProvider;
use gui_bridge::bridge::GuiBridge;
use gui_bridge::model::{ModelElapsedSink, ModelMapView, ModelPhotoSink, ViewModel};
use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use trackcore::controller::{CaptureController, Stopwatch};
use trackcore::timing::SystemClock;
use workflow::config::ScenarioConfig;
use workflow::runner::Runner;

mod devices;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Headless driver for the stopwatch tracker")]
struct Args {
    /// Load a scenario config from YAML
    #[arg(long)]
    scenario: Option<PathBuf>,
    #[arg(long, default_value_t = 100)]
    display_tick_ms: u64,
    #[arg(long, default_value_t = 10_000)]
    location_tick_ms: u64,
    /// Platform identity reported by the hosting environment
    #[arg(long, default_value = "browser")]
    platform: String,
    /// Keep the HTTP bridge alive for an interactive GUI
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.scenario {
        ScenarioConfig::load(path)?
    } else {
        ScenarioConfig::from_args(
            args.display_tick_ms,
            args.location_tick_ms,
            args.platform.clone(),
        )
    };

    // Single-threaded cooperative loop; the controllers interleave on it.
    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating driver runtime")?;
    runtime.block_on(run(config, args.serve))
}

async fn run(config: ScenarioConfig, serve: bool) -> anyhow::Result<()> {
    let state = Arc::new(RwLock::new(ViewModel::default()));
    let map = ModelMapView::new(state.clone());
    let platform = config.platform();

    let provider = Arc::new(SimulatedPositionProvider::new(config.walk_config()));
    let camera = Arc::new(SimulatedCamera::new(platform, config.camera_latency(), true));

    let stopwatch = Stopwatch::spawn(
        Arc::new(SystemClock),
        provider,
        Box::new(map.clone()),
        Box::new(ModelElapsedSink::new(state.clone())),
        config.to_controller_config(),
    );
    let capture =
        CaptureController::spawn(camera, Box::new(ModelPhotoSink::new(state.clone())), platform);

    let bridge = GuiBridge::new(state, map.clone(), stopwatch.clone(), capture.clone());
    let start = config.start_point();
    info!("session starts near {:.4}, {:.4}", start.lat, start.lng);

    let runner = Runner::new(config.clone());
    runner.execute(&stopwatch, &capture, &map).await;

    // Let in-flight completions settle before the summary snapshot.
    tokio::time::sleep(Duration::from_millis(750)).await;
    let snapshot = bridge.snapshot();

    println!(
        "Scenario run -> elapsed {}, marker {:?}, destination {:?}, photo visible {}",
        snapshot.elapsed,
        snapshot.marker.as_ref().map(|pin| (pin.point.lat, pin.point.lng)),
        snapshot.bubble.as_ref().map(|note| (note.anchor.lat, note.anchor.lng)),
        snapshot.photo_visible
    );
    bridge.publish_status("Scenario complete.");

    let report = format!(
        "platform={} elapsed={} marker={:?} destination={:?} photo_visible={}\n",
        config.platform,
        snapshot.elapsed,
        snapshot.marker.as_ref().map(|pin| (pin.point.lat, pin.point.lng)),
        snapshot.bubble.as_ref().map(|note| (note.anchor.lat, note.anchor.lng)),
        snapshot.photo_visible
    );
    let report_path = PathBuf::from("tools/data/session.log");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(report_path)?;
    file.write_all(report.as_bytes())?;

    if serve {
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
    }

    Ok(())
}
