//! Timer-driven playback over a fixed frame history.
//!
//! ```text
//!   TransportCommand (play/pause/stop/seek/speed)
//!        │                                ┌──────────────┐
//!        ▼                                │    driver     │
//!   PlaybackController ── TimerRequest ──▶│ (owns clock)  │
//!        │            ◀───── tick() ──────└──────────────┘
//!        ▼
//!   Renderer::show_entities(&[VisibleEntity])
//! ```
//!
//! The controller never touches a wall clock. Arming a timer means
//! exposing a [`TimerRequest`] with a fresh id and an interval; a driver
//! turns that into a real deadline and calls [`PlaybackController::tick`]
//! when it expires. A changed or cleared id invalidates whatever deadline
//! the driver was sitting on, which is the whole single-outstanding-timer
//! discipline: every schedule-changing operation disarms before it
//! re-arms, so there is never more than one live deadline.

use std::time::Duration;

use lotlapse_protocol::VisibleEntity;
use lotlapse_protocol::constants::BASE_INTERVAL;

use crate::model::History;

/// The collaborator that receives each frame's visible entities.
///
/// Called synchronously from every cursor change; an empty slice means
/// "clear the display" (emitted by stop).
pub trait Renderer {
    fn show_entities(&mut self, entities: &[VisibleEntity]);
}

/// Transport state of the playback machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Playing,
    Paused,
}

/// Playback speed multiplier, cycled 1× → 2× → 3× → 1×.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    X1,
    X2,
    X3,
}

impl Speed {
    pub fn multiplier(self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X3 => 3,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::X1 => Self::X2,
            Self::X2 => Self::X3,
            Self::X3 => Self::X1,
        }
    }
}

/// A request for the driver to fire [`PlaybackController::tick`] after
/// `interval`. The id increments on every arm; a driver holding a
/// deadline for a stale id must drop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub id: u64,
    pub interval: Duration,
}

/// Walks a cursor over a read-only [`History`] on a driver-owned timer,
/// publishing the visible entities of the active frame on every change.
///
/// All transport operations are no-ops outside their valid source state
/// and out-of-range seeks clamp, so UI event handlers can call straight
/// in without guard logic. Nothing here fails at runtime; the only
/// reportable error in the system is malformed input at history
/// construction, which the [`History`] constructors already refuse.
#[derive(Debug)]
pub struct PlaybackController {
    history: History,
    state: TransportState,
    current: usize,
    speed: Speed,
    base_interval: Duration,
    timer: Option<TimerRequest>,
    next_timer_id: u64,
}

impl PlaybackController {
    pub fn new(history: History) -> Self {
        Self {
            history,
            state: TransportState::Stopped,
            current: 0,
            speed: Speed::X1,
            base_interval: BASE_INTERVAL,
            timer: None,
            next_timer_id: 0,
        }
    }

    /// Override the 1× tick interval (used by drivers and tests).
    pub fn with_base_interval(mut self, interval: Duration) -> Self {
        self.base_interval = interval;
        self
    }

    // --- Transport commands ---

    /// Start or resume playback.
    ///
    /// Valid from `Stopped` or `Paused` while the cursor is short of the
    /// last frame; publishes the current frame immediately and arms the
    /// timer for the first advance.
    pub fn play(&mut self, out: &mut dyn Renderer) {
        if self.state == TransportState::Playing {
            return;
        }
        if self.current >= self.history.last_index() {
            return;
        }
        self.state = TransportState::Playing;
        self.arm();
        self.publish(out);
    }

    /// Suspend playback, keeping the cursor where it is.
    pub fn pause(&mut self) {
        if self.state != TransportState::Playing {
            return;
        }
        self.disarm();
        self.state = TransportState::Paused;
    }

    /// Reset to frame 0 and clear the display.
    ///
    /// With `replay` set, playback restarts immediately through the same
    /// path as [`play`](Self::play).
    pub fn stop(&mut self, replay: bool, out: &mut dyn Renderer) {
        self.disarm();
        self.current = 0;
        self.state = TransportState::Stopped;
        out.show_entities(&[]);
        if replay {
            self.play(out);
        }
    }

    /// Move the cursor to `frame`, clamped to the history's range, and
    /// publish that frame immediately.
    ///
    /// While playing, the tempo restarts from the seek point — unless the
    /// seek lands on the last frame, which parks the machine in `Paused`.
    pub fn seek(&mut self, frame: i64, out: &mut dyn Renderer) {
        let last = self.history.last_index();
        self.current = frame.clamp(0, last as i64) as usize;
        self.publish(out);
        if self.state == TransportState::Playing {
            self.disarm();
            if self.current == last {
                self.state = TransportState::Paused;
            } else {
                self.arm();
            }
        }
    }

    /// Cycle the speed multiplier.
    ///
    /// Takes effect on the next arm; a pending tick keeps the interval it
    /// was armed with.
    pub fn change_speed(&mut self) {
        self.speed = self.speed.next();
    }

    // --- Timer event ---

    /// Advance one frame. Called by the driver when the armed deadline
    /// expires; ignored unless the machine is playing with a live timer,
    /// so a stale driver deadline cannot double-advance.
    pub fn tick(&mut self, out: &mut dyn Renderer) {
        if self.state != TransportState::Playing || self.timer.is_none() {
            return;
        }
        self.disarm();
        self.current += 1;
        self.publish(out);
        if self.current >= self.history.last_index() {
            self.state = TransportState::Paused;
        } else {
            self.arm();
        }
    }

    // --- Observers ---

    pub fn current_frame(&self) -> usize {
        self.current
    }

    pub fn frame_count(&self) -> usize {
        self.history.frame_count()
    }

    pub fn is_running(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    /// The single outstanding timer, if armed.
    pub fn timer(&self) -> Option<TimerRequest> {
        self.timer
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // --- Internals ---

    fn arm(&mut self) {
        self.disarm();
        self.next_timer_id += 1;
        self.timer = Some(TimerRequest {
            id: self.next_timer_id,
            interval: self.base_interval / self.speed.multiplier(),
        });
    }

    /// Idempotent: disarming with no timer armed is a no-op.
    fn disarm(&mut self) {
        self.timer = None;
    }

    fn publish(&self, out: &mut dyn Renderer) {
        if let Some(frame) = self.history.frame(self.current) {
            out.show_entities(&frame.visible_entities());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{GenerateConfig, generate};
    use crate::model::Layout;
    use lotlapse_protocol::GeoPoint;

    /// Records every publish so tests can assert on the stream.
    #[derive(Default)]
    struct Sink {
        published: Vec<Vec<VisibleEntity>>,
    }

    impl Renderer for Sink {
        fn show_entities(&mut self, entities: &[VisibleEntity]) {
            self.published.push(entities.to_vec());
        }
    }

    fn history(frames: usize) -> History {
        let layout = Layout::from_positions(vec![
            vec![GeoPoint::new(18.397, 43.854)],
            vec![GeoPoint::new(18.398, 43.854)],
        ])
        .unwrap();
        generate(
            &layout,
            &GenerateConfig {
                frame_count: frames,
                variant_count: 4,
                seed: 3,
            },
        )
    }

    fn controller(frames: usize) -> PlaybackController {
        PlaybackController::new(history(frames))
    }

    #[test]
    fn starts_stopped_at_frame_zero() {
        let c = controller(10);
        assert_eq!(c.state(), TransportState::Stopped);
        assert_eq!(c.current_frame(), 0);
        assert_eq!(c.speed(), Speed::X1);
        assert!(c.timer().is_none());
        assert!(!c.is_running());
    }

    #[test]
    fn play_publishes_and_arms() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.play(&mut sink);
        assert!(c.is_running());
        assert_eq!(sink.published.len(), 1);
        let timer = c.timer().unwrap();
        assert_eq!(timer.interval, BASE_INTERVAL);
    }

    #[test]
    fn play_while_playing_is_a_noop() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.play(&mut sink);
        let timer = c.timer();
        c.play(&mut sink);
        assert_eq!(c.timer(), timer, "second play must not re-arm");
        assert_eq!(sink.published.len(), 1, "second play must not republish");
    }

    #[test]
    fn play_at_last_frame_is_a_noop() {
        let mut c = controller(5);
        let mut sink = Sink::default();
        c.seek(4, &mut sink);
        c.play(&mut sink);
        assert_eq!(c.state(), TransportState::Stopped);
        assert!(c.timer().is_none());
    }

    #[test]
    fn ticks_advance_by_exactly_one() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.play(&mut sink);
        for expected in 1..=5 {
            c.tick(&mut sink);
            assert_eq!(c.current_frame(), expected);
        }
    }

    #[test]
    fn tick_publishes_the_new_frame() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.play(&mut sink);
        c.tick(&mut sink);
        let expected = c.history().frames()[1].visible_entities();
        assert_eq!(sink.published.last().unwrap(), &expected);
    }

    #[test]
    fn reaching_last_frame_pauses_and_disarms() {
        let mut c = controller(3);
        let mut sink = Sink::default();
        c.play(&mut sink);
        c.tick(&mut sink);
        assert!(c.is_running());
        c.tick(&mut sink);
        assert_eq!(c.current_frame(), 2);
        assert_eq!(c.state(), TransportState::Paused);
        assert!(c.timer().is_none());
        // A stray late tick changes nothing.
        c.tick(&mut sink);
        assert_eq!(c.current_frame(), 2);
    }

    #[test]
    fn tick_outside_playing_is_ignored() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.tick(&mut sink);
        assert_eq!(c.current_frame(), 0);
        assert!(sink.published.is_empty());
    }

    #[test]
    fn pause_disarms_and_is_idempotent() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.play(&mut sink);
        c.pause();
        assert_eq!(c.state(), TransportState::Paused);
        assert!(c.timer().is_none());
        c.pause();
        assert_eq!(c.state(), TransportState::Paused);
    }

    #[test]
    fn resume_after_pause_continues_from_cursor() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.play(&mut sink);
        c.tick(&mut sink);
        c.pause();
        c.play(&mut sink);
        assert!(c.is_running());
        assert_eq!(c.current_frame(), 1);
        c.tick(&mut sink);
        assert_eq!(c.current_frame(), 2);
    }

    #[test]
    fn stop_resets_and_clears() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.play(&mut sink);
        c.tick(&mut sink);
        c.stop(false, &mut sink);
        assert_eq!(c.state(), TransportState::Stopped);
        assert_eq!(c.current_frame(), 0);
        assert!(c.timer().is_none());
        assert!(sink.published.last().unwrap().is_empty(), "stop clears the display");
    }

    #[test]
    fn stop_from_stopped_is_harmless() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.stop(false, &mut sink);
        c.stop(false, &mut sink);
        assert_eq!(c.state(), TransportState::Stopped);
        assert!(c.timer().is_none());
    }

    #[test]
    fn stop_with_replay_restarts_playback() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.play(&mut sink);
        c.tick(&mut sink);
        c.tick(&mut sink);
        c.stop(true, &mut sink);
        assert!(c.is_running());
        assert_eq!(c.current_frame(), 0);
        assert!(c.timer().is_some());
        // Clear, then frame 0 republished.
        let n = sink.published.len();
        assert!(sink.published[n - 2].is_empty());
        assert_eq!(
            &sink.published[n - 1],
            &c.history().frames()[0].visible_entities()
        );
    }

    #[test]
    fn seek_clamps_both_ends() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.seek(-5, &mut sink);
        assert_eq!(c.current_frame(), 0);
        c.seek(999, &mut sink);
        assert_eq!(c.current_frame(), 9);
    }

    #[test]
    fn seek_publishes_immediately() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.seek(4, &mut sink);
        let expected = c.history().frames()[4].visible_entities();
        assert_eq!(sink.published.last().unwrap(), &expected);
    }

    #[test]
    fn seek_while_playing_restarts_tempo() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.play(&mut sink);
        let before = c.timer().unwrap();
        c.seek(4, &mut sink);
        let after = c.timer().unwrap();
        assert!(after.id > before.id, "seek must re-arm with a fresh id");
        assert!(c.is_running());
        assert_eq!(c.current_frame(), 4);
    }

    #[test]
    fn seek_to_last_frame_while_playing_pauses() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.play(&mut sink);
        c.seek(9, &mut sink);
        assert_eq!(c.state(), TransportState::Paused);
        assert!(c.timer().is_none());
    }

    #[test]
    fn seek_while_stopped_does_not_arm() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.seek(3, &mut sink);
        assert_eq!(c.current_frame(), 3);
        assert!(c.timer().is_none());
        assert_eq!(c.state(), TransportState::Stopped);
    }

    #[test]
    fn speed_cycles_one_two_three() {
        let mut c = controller(10);
        assert_eq!(c.speed(), Speed::X1);
        c.change_speed();
        assert_eq!(c.speed(), Speed::X2);
        c.change_speed();
        assert_eq!(c.speed(), Speed::X3);
        c.change_speed();
        assert_eq!(c.speed(), Speed::X1);
    }

    #[test]
    fn speed_change_spares_the_pending_tick() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.play(&mut sink);
        let pending = c.timer().unwrap();
        c.change_speed();
        // The armed request is untouched…
        assert_eq!(c.timer().unwrap(), pending);
        assert_eq!(pending.interval, BASE_INTERVAL);
        // …and only the arm after the next tick uses the new speed.
        c.tick(&mut sink);
        let rearmed = c.timer().unwrap();
        assert_eq!(rearmed.interval, BASE_INTERVAL / 2);
    }

    #[test]
    fn every_arm_gets_a_fresh_id() {
        let mut c = controller(10);
        let mut sink = Sink::default();
        c.play(&mut sink);
        let mut seen = vec![c.timer().unwrap().id];
        for _ in 0..4 {
            c.tick(&mut sink);
            seen.push(c.timer().unwrap().id);
        }
        let mut dedup = seen.clone();
        dedup.dedup();
        assert_eq!(seen, dedup, "timer ids must never repeat consecutively");
        assert!(seen.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn base_interval_override_scales_with_speed() {
        let mut c = controller(10).with_base_interval(Duration::from_millis(300));
        let mut sink = Sink::default();
        c.change_speed(); // X2
        c.change_speed(); // X3
        c.play(&mut sink);
        assert_eq!(c.timer().unwrap().interval, Duration::from_millis(100));
    }
}
