use crate::controller::state::{TrackerState, UpdateTag};
use crate::devices::position::{PositionOptions, PositionProvider};
use crate::prelude::{ControllerConfig, GeoPoint, TrackResult};
use crate::telemetry::{LogManager, MetricsRecorder};
use crate::timing::clock::Clock;
use crate::timing::format::{format_duration, ZERO_DISPLAY};
use crate::view::display::ElapsedSink;
use crate::view::map::MapView;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

enum Msg {
    Start,
    Stop,
    SetDestination(GeoPoint),
    PositionResolved {
        tag: UpdateTag,
        outcome: TrackResult<GeoPoint>,
    },
}

enum Event {
    Message(Msg),
    DisplayTick,
    LocationTick,
    Closed,
}

/// Handle to the stopwatch/tracking controller.
///
/// The worker task behind the handle is the single writer for the run
/// state, the annotation store, the map view, and the elapsed display.
/// Handle operations are fire-and-forget and never fail; they are silently
/// dropped once the worker is gone.
#[derive(Clone)]
pub struct Stopwatch {
    tx: UnboundedSender<Msg>,
}

impl Stopwatch {
    /// Spawns the worker onto the current runtime and returns the handle.
    pub fn spawn(
        clock: Arc<dyn Clock>,
        provider: Arc<dyn PositionProvider>,
        map: Box<dyn MapView>,
        elapsed: Box<dyn ElapsedSink>,
        config: ControllerConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Worker {
            state: TrackerState::new(),
            clock,
            provider,
            map,
            elapsed,
            config,
            tx: tx.clone(),
            display_schedule: None,
            location_schedule: None,
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        };
        tokio::spawn(worker.run(rx));
        Self { tx }
    }

    /// Restarts the stopwatch. Calling while Running first performs an
    /// implicit stop.
    pub fn start(&self) {
        let _ = self.tx.send(Msg::Start);
    }

    /// Stops the schedules. Safe to call when already Stopped.
    pub fn stop(&self) {
        let _ = self.tx.send(Msg::Stop);
    }

    /// Records a new destination and refreshes the annotations right away,
    /// regardless of run state.
    pub fn set_destination(&self, point: GeoPoint) {
        let _ = self.tx.send(Msg::SetDestination(point));
    }
}

struct Worker {
    state: TrackerState,
    clock: Arc<dyn Clock>,
    provider: Arc<dyn PositionProvider>,
    map: Box<dyn MapView>,
    elapsed: Box<dyn ElapsedSink>,
    config: ControllerConfig,
    tx: UnboundedSender<Msg>,
    display_schedule: Option<Interval>,
    location_schedule: Option<Interval>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl Worker {
    async fn run(mut self, mut rx: UnboundedReceiver<Msg>) {
        loop {
            let event = tokio::select! {
                message = rx.recv() => match message {
                    Some(message) => Event::Message(message),
                    None => Event::Closed,
                },
                _ = next_tick(&mut self.display_schedule) => Event::DisplayTick,
                _ = next_tick(&mut self.location_schedule) => Event::LocationTick,
            };

            match event {
                Event::Message(Msg::Start) => self.on_start(),
                Event::Message(Msg::Stop) => self.on_stop(),
                Event::Message(Msg::SetDestination(point)) => {
                    self.state.set_destination(point);
                    self.trigger_location_update();
                }
                Event::Message(Msg::PositionResolved { tag, outcome }) => {
                    self.on_position(tag, outcome)
                }
                Event::DisplayTick => self.on_display_tick(),
                Event::LocationTick => self.trigger_location_update(),
                Event::Closed => break,
            }
        }
    }

    fn on_start(&mut self) {
        // Implicit stop: any previous schedules are cancelled before the
        // new ones are created, so a double start never duplicates them.
        self.cancel_schedules();

        let now = self.clock.now();
        self.state.begin(now);
        self.elapsed.show_elapsed(ZERO_DISPLAY);
        self.display_schedule = Some(schedule(now, self.config.display_tick()));
        self.location_schedule = Some(schedule(now, self.config.location_tick()));
        self.trigger_location_update();
        self.logger.record("stopwatch started");
    }

    fn on_stop(&mut self) {
        self.cancel_schedules();
        self.state.halt();
        self.logger.record("stopwatch stopped");
    }

    fn cancel_schedules(&mut self) {
        // Dropping an interval cancels all future firings; cancelling
        // schedules that do not exist is a no-op.
        self.display_schedule = None;
        self.location_schedule = None;
    }

    /// Single refresh primitive shared by start, the location schedule, and
    /// destination selection. The query itself is fire-and-forget; its
    /// tagged outcome is posted back to the mailbox.
    fn trigger_location_update(&mut self) {
        let tag = self.state.issue();
        let query = self.provider.current_position(PositionOptions::default());
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = query.await;
            let _ = tx.send(Msg::PositionResolved { tag, outcome });
        });
    }

    fn on_position(&mut self, tag: UpdateTag, outcome: TrackResult<GeoPoint>) {
        match outcome {
            Ok(point) => {
                if self.state.apply_position(tag, point, self.map.as_mut()) {
                    self.metrics.record_applied();
                } else {
                    self.metrics.record_discarded();
                    self.logger.record("discarded stale position update");
                }
            }
            Err(error) => {
                // Terminal for this cycle only; the schedules keep running
                // and the annotations keep their previous state.
                self.metrics.record_error();
                self.logger.warn(&format!("position query failed: {}", error));
            }
        }
    }

    fn on_display_tick(&mut self) {
        if let Some(elapsed) = self.state.elapsed(self.clock.now()) {
            let text = format_duration(elapsed.as_millis() as u64);
            self.elapsed.show_elapsed(&text);
        }
    }
}

fn schedule(now: Instant, period: Duration) -> Interval {
    // First firing one full period after start; the immediate refresh on
    // start is an explicit extra trigger, not an early first tick.
    let mut interval = interval_at(now + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn next_tick(schedule: &mut Option<Interval>) {
    match schedule {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
