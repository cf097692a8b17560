use crate::annotations::store::AnnotationStore;
use crate::prelude::GeoPoint;
use crate::view::map::MapView;
use std::time::Duration;
use tokio::time::Instant;

/// Running/Stopped mode of the stopwatch controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

/// Generation tag minted for every issued position query.
///
/// A completion is applied only while its epoch is current and its sequence
/// number is newer than the last applied one, so results issued before a
/// stop or restart, and results overtaken by a later query, are discarded
/// on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateTag {
    epoch: u64,
    seq: u64,
}

/// Transition core of the stopwatch/tracking controller.
///
/// Owns the run state, the elapsed-time origin, the staleness counters, and
/// the annotation store. All operations are synchronous; the actor in
/// `controller::stopwatch` is the single writer.
pub struct TrackerState {
    run_state: RunState,
    started_at: Option<Instant>,
    epoch: u64,
    next_seq: u64,
    last_applied_seq: u64,
    annotations: AnnotationStore,
}

impl TrackerState {
    pub fn new() -> Self {
        Self {
            run_state: RunState::Stopped,
            started_at: None,
            epoch: 0,
            next_seq: 0,
            last_applied_seq: 0,
            annotations: AnnotationStore::new(),
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Enters Running and records the elapsed-time origin. Always bumps the
    /// epoch: a restart supersedes every query still in flight.
    pub fn begin(&mut self, now: Instant) {
        self.epoch += 1;
        self.started_at = Some(now);
        self.run_state = RunState::Running;
    }

    /// Enters Stopped. The epoch bump invalidates in-flight queries issued
    /// by the run being stopped; a `halt` while already Stopped is a
    /// complete no-op. The stale start timestamp is kept; it is never read
    /// while Stopped.
    pub fn halt(&mut self) {
        if self.run_state == RunState::Running {
            self.run_state = RunState::Stopped;
            self.epoch += 1;
        }
    }

    /// Mints the tag for the next position query.
    pub fn issue(&mut self) -> UpdateTag {
        self.next_seq += 1;
        UpdateTag {
            epoch: self.epoch,
            seq: self.next_seq,
        }
    }

    pub fn set_destination(&mut self, point: GeoPoint) {
        self.annotations.set_destination(point);
    }

    pub fn destination(&self) -> Option<GeoPoint> {
        self.annotations.destination()
    }

    /// Whether a completion carrying `tag` may still be applied.
    pub fn accept(&self, tag: UpdateTag) -> bool {
        tag.epoch == self.epoch && tag.seq > self.last_applied_seq
    }

    /// Gated application of a successful position completion. Returns
    /// whether the annotation store was updated.
    pub fn apply_position(&mut self, tag: UpdateTag, point: GeoPoint, map: &mut dyn MapView) -> bool {
        if !self.accept(tag) {
            return false;
        }
        self.last_applied_seq = tag.seq;
        self.annotations.apply_position(map, point);
        true
    }

    /// Duration since the last transition into Running; `None` while
    /// Stopped.
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        match (self.run_state, self.started_at) {
            (RunState::Running, Some(started_at)) => Some(now - started_at),
            _ => None,
        }
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }
}

impl Default for TrackerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::clock::{Clock, ManualClock};
    use crate::view::map::{BubbleHandle, MarkerHandle};

    #[derive(Default)]
    struct CountingMap {
        next_handle: u64,
        live_markers: usize,
        live_bubbles: usize,
        applied_points: Vec<GeoPoint>,
    }

    impl MapView for CountingMap {
        fn set_center(&mut self, _point: GeoPoint) {}

        fn add_marker(&mut self, point: GeoPoint) -> MarkerHandle {
            self.next_handle += 1;
            self.live_markers += 1;
            self.applied_points.push(point);
            MarkerHandle(self.next_handle)
        }

        fn remove_marker(&mut self, _marker: MarkerHandle) {
            self.live_markers -= 1;
        }

        fn add_bubble(&mut self, _anchor: GeoPoint, _content: &str) -> BubbleHandle {
            self.next_handle += 1;
            self.live_bubbles += 1;
            BubbleHandle(self.next_handle)
        }

        fn remove_bubble(&mut self, _bubble: BubbleHandle) {
            self.live_bubbles -= 1;
        }

        fn screen_to_geo(&self, _x: f64, _y: f64) -> Option<GeoPoint> {
            None
        }
    }

    #[test]
    fn begin_and_halt_drive_run_state() {
        let mut state = TrackerState::new();
        assert_eq!(state.run_state(), RunState::Stopped);

        state.begin(Instant::now());
        assert!(state.is_running());

        state.halt();
        assert_eq!(state.run_state(), RunState::Stopped);
    }

    #[test]
    fn halt_when_stopped_is_a_no_op() {
        let mut state = TrackerState::new();
        let tag = state.issue();
        state.halt();
        state.halt();
        // The tag issued while Stopped survives redundant halts.
        assert!(state.accept(tag));
    }

    #[test]
    fn elapsed_is_only_defined_while_running() {
        let clock = ManualClock::new();
        let mut state = TrackerState::new();
        assert_eq!(state.elapsed(clock.now()), None);

        state.begin(clock.now());
        clock.advance(Duration::from_millis(250));
        assert_eq!(state.elapsed(clock.now()), Some(Duration::from_millis(250)));

        state.halt();
        clock.advance(Duration::from_secs(5));
        assert_eq!(state.elapsed(clock.now()), None);
    }

    #[test]
    fn completion_issued_before_halt_is_discarded() {
        let mut state = TrackerState::new();
        let mut map = CountingMap::default();

        state.begin(Instant::now());
        let tag = state.issue();
        state.halt();

        assert!(!state.apply_position(tag, GeoPoint::new(52.5, 13.4), &mut map));
        assert_eq!(map.live_markers, 0);
    }

    #[test]
    fn completion_issued_before_restart_is_discarded() {
        let mut state = TrackerState::new();
        let mut map = CountingMap::default();

        state.begin(Instant::now());
        let stale = state.issue();
        state.begin(Instant::now());
        let fresh = state.issue();

        assert!(state.apply_position(fresh, GeoPoint::new(1.0, 1.0), &mut map));
        assert!(!state.apply_position(stale, GeoPoint::new(2.0, 2.0), &mut map));
        assert_eq!(map.applied_points, vec![GeoPoint::new(1.0, 1.0)]);
    }

    #[test]
    fn overlapping_completions_resolve_last_issued_wins() {
        let mut state = TrackerState::new();
        let mut map = CountingMap::default();

        state.begin(Instant::now());
        let first = state.issue();
        let second = state.issue();

        // The later-issued query completes first; the earlier one arrives
        // afterwards and must lose.
        assert!(state.apply_position(second, GeoPoint::new(3.0, 3.0), &mut map));
        assert!(!state.apply_position(first, GeoPoint::new(4.0, 4.0), &mut map));
        assert_eq!(map.applied_points, vec![GeoPoint::new(3.0, 3.0)]);
        assert_eq!(map.live_markers, 1);
    }

    #[test]
    fn destination_updates_apply_while_stopped() {
        let mut state = TrackerState::new();
        let mut map = CountingMap::default();

        state.set_destination(GeoPoint::new(52.52, 13.41));
        let tag = state.issue();
        assert!(state.apply_position(tag, GeoPoint::new(52.5, 13.4), &mut map));
        assert_eq!(map.live_markers, 1);
        assert_eq!(map.live_bubbles, 1);
        assert!(!state.is_running());
    }
}
