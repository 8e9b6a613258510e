//! Interruptible four-frame gesture sequencer.
//!
//! **Architecture**: FrameSequencer does NOT own its output. It receives
//! `&mut impl FrameSink` on operations that present a frame, so the same
//! state machine drives a console sink, a render backend, or a test
//! recorder. The host owns the sink.
//!
//! **Why**: Interruptible gesture feedback requires:
//! - Fixed frame tables (engage and release are mirrored, with a held
//!   endpoint on the rest frame)
//! - Mid-release redirect without a visual jump (resume descent from the
//!   frame currently shown, no re-emission)
//! - Stale ticks after a stop must be harmless
//!
//! **Used by**: GestureRunner (trigger/stop/tick commands), demo host.
//!
//! # Timing Model
//!
//! The sequencer has no clock of its own. The host calls `tick()` at its
//! cadence (nominally [`DEFAULT_FPS`](crate::config::DEFAULT_FPS)); each
//! tick advances one position. Dropped or late ticks stretch the gesture
//! in wall time but never change the emission order.
//!
//! # Interruption Model
//!
//! - Trigger while idle: start the engage run from position 0.
//! - Trigger mid-engage: ignored, the run completes on its own.
//! - Trigger mid-release: redirect into the engage run at the position
//!   whose frame matches the frame on screen. Nothing is emitted at the
//!   redirect itself; the next tick resumes descent from there.
//!
//! # Invariant
//!
//! While playing, `current_frame() == direction().sequence()[position()]`.
//! While idle, `current_frame()` equals the configured rest frame.

use log::{debug, trace};

use crate::config::SequencerConfig;
use crate::core::traits::FrameSink;

/// Number of distinct animation frames, indexed 0..FRAME_COUNT
pub const FRAME_COUNT: usize = 4;

/// Positions per run, including the held endpoint
pub const SEQUENCE_LEN: usize = 5;

/// Engage run: rest toward fully-pressed, frame 0 held one extra tick
pub const DESCENDING_SEQUENCE: [usize; SEQUENCE_LEN] = [0, 0, 1, 2, 3];

/// Release run: fully-pressed back to rest, frame 0 held one extra tick
pub const ASCENDING_SEQUENCE: [usize; SEQUENCE_LEN] = [3, 2, 1, 0, 0];

/// Which frame table the sequencer is walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Engage: walking [`DESCENDING_SEQUENCE`]
    #[default]
    Descending,
    /// Release: walking [`ASCENDING_SEQUENCE`]
    Ascending,
}

impl Direction {
    /// Frame table for this direction.
    pub fn sequence(self) -> &'static [usize; SEQUENCE_LEN] {
        match self {
            Direction::Descending => &DESCENDING_SEQUENCE,
            Direction::Ascending => &ASCENDING_SEQUENCE,
        }
    }
}

/// Coarse playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// At rest, ticks are no-ops
    #[default]
    Idle,
    /// Walking a frame table
    Playing,
}

/// What a trigger did, for callers that log or test the reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Idle -> engage run started, frame 0 emitted
    Started,
    /// Release run redirected into the engage run, nothing emitted
    Redirected,
    /// Engage run already in flight, trigger dropped
    Ignored,
}

/// Point-in-time copy of sequencer state (lightweight query)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerSnapshot {
    pub state: PlaybackState,
    pub direction: Direction,
    pub frame: usize,
    pub position: usize,
}

/// Gesture state machine (does NOT own the sink)
///
/// FrameSequencer manages sequencing state only. The frame sink is passed
/// by reference to operations that emit, so the host keeps the single
/// output instance.
#[derive(Debug, Clone)]
pub struct FrameSequencer {
    config: SequencerConfig,
    state: PlaybackState,
    direction: Direction,
    /// Index into the current direction's frame table, 0..SEQUENCE_LEN
    position: usize,
    /// Frame currently shown, 0..FRAME_COUNT
    frame: usize,
}

impl FrameSequencer {
    /// Create a new sequencer at rest. Emits nothing; call
    /// [`initialize`](Self::initialize) to present the rest frame.
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            config,
            state: PlaybackState::Idle,
            direction: Direction::Descending,
            position: 0,
            frame: config.rest_frame,
        }
    }

    /// Reset to rest and present the rest frame.
    ///
    /// Idempotent: calling again re-emits the rest frame and changes
    /// nothing else.
    pub fn initialize<S: FrameSink>(&mut self, sink: &mut S) {
        self.reset_to_rest();
        debug!("Sequencer initialized at rest frame {}", self.frame);
        self.emit(sink);
    }

    /// React to a trigger gesture.
    ///
    /// - Idle: start the engage run, emit frame 0.
    /// - Playing release: redirect into the engage run at the position
    ///   matching the frame on screen. No emission; the frame shown is
    ///   already correct.
    /// - Playing engage: no-op, the run completes on its own.
    pub fn on_trigger<S: FrameSink>(&mut self, sink: &mut S) -> TriggerOutcome {
        match (self.state, self.direction) {
            (PlaybackState::Idle, _) => {
                self.state = PlaybackState::Playing;
                self.direction = Direction::Descending;
                self.position = 0;
                self.frame = DESCENDING_SEQUENCE[0];
                debug!("Trigger: engage run started");
                self.emit(sink);
                TriggerOutcome::Started
            }
            (PlaybackState::Playing, Direction::Ascending) => {
                self.direction = Direction::Descending;
                self.position = descending_position_for(self.frame);
                debug!(
                    "Trigger: release redirected to engage at position {}",
                    self.position
                );
                TriggerOutcome::Redirected
            }
            (PlaybackState::Playing, Direction::Descending) => {
                trace!("Trigger ignored: engage run already in flight");
                TriggerOutcome::Ignored
            }
        }
    }

    /// Advance one position and emit the frame there.
    /// Returns Some(frame) if a frame was emitted, None if idle.
    ///
    /// Walking past the end of the engage run hands off to the release
    /// run; walking past the end of the release run settles back to rest
    /// (emits the rest frame, goes idle). A tick arriving after a stop
    /// is a no-op.
    pub fn tick<S: FrameSink>(&mut self, sink: &mut S) -> Option<usize> {
        if self.state != PlaybackState::Playing {
            trace!("Tick ignored: sequencer idle");
            return None;
        }

        self.position += 1;
        let sequence = self.direction.sequence();
        if self.position < sequence.len() {
            self.frame = sequence[self.position];
        } else {
            match self.direction {
                Direction::Descending => {
                    self.direction = Direction::Ascending;
                    self.position = 0;
                    self.frame = ASCENDING_SEQUENCE[0];
                    debug!("Engage run complete, handing off to release");
                }
                Direction::Ascending => {
                    debug!("Release run complete, settling at rest frame {}", self.config.rest_frame);
                    self.reset_to_rest();
                }
            }
        }

        self.emit(sink);
        Some(self.frame)
    }

    /// Snap back to rest from any state and present the rest frame.
    ///
    /// Same post-state as [`initialize`](Self::initialize). Ticks already
    /// queued behind this call land in the idle state and do nothing.
    pub fn force_stop<S: FrameSink>(&mut self, sink: &mut S) {
        let was_playing = self.state == PlaybackState::Playing;
        self.reset_to_rest();
        if was_playing {
            debug!("Force stop: snapped to rest frame {}", self.frame);
        } else {
            trace!("Force stop while idle");
        }
        self.emit(sink);
    }

    fn reset_to_rest(&mut self) {
        self.state = PlaybackState::Idle;
        self.direction = Direction::Descending;
        self.position = 0;
        self.frame = self.config.rest_frame;
    }

    fn emit<S: FrameSink>(&mut self, sink: &mut S) {
        trace!("Display frame {}", self.frame);
        sink.display_frame(self.frame);
    }

    // === Accessors ===

    /// Check if a run is in flight
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Get playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Get current direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Get the frame currently shown
    pub fn current_frame(&self) -> usize {
        self.frame
    }

    /// Get position within the current frame table
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the config this sequencer runs with
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Get state snapshot for logging and assertions.
    pub fn snapshot(&self) -> SequencerSnapshot {
        SequencerSnapshot {
            state: self.state,
            direction: self.direction,
            frame: self.frame,
            position: self.position,
        }
    }
}

impl Default for FrameSequencer {
    fn default() -> Self {
        Self::new(SequencerConfig::default())
    }
}

/// Map a shown frame to its engage-run position for redirects.
///
/// Every frame 0..FRAME_COUNT appears in [`DESCENDING_SEQUENCE`], so the
/// lookup only misses for an out-of-table frame index; clamp instead of
/// panicking and let the run recover from there.
fn descending_position_for(frame: usize) -> usize {
    DESCENDING_SEQUENCE
        .iter()
        .position(|&f| f == frame)
        .unwrap_or_else(|| frame.min(SEQUENCE_LEN - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Sink that records every emitted frame index
    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<usize>,
    }

    impl FrameSink for RecordingSink {
        fn display_frame(&mut self, frame_idx: usize) {
            self.frames.push(frame_idx);
        }
    }

    fn sequencer() -> FrameSequencer {
        FrameSequencer::new(SequencerConfig::default())
    }

    /// Tick until the sequencer settles, with a runaway guard.
    fn run_to_rest(seq: &mut FrameSequencer, sink: &mut RecordingSink) {
        let mut guard = 0;
        while seq.is_playing() {
            seq.tick(sink);
            guard += 1;
            assert!(guard <= 2 * SEQUENCE_LEN + 1, "sequencer never settled");
        }
    }

    #[test]
    fn test_full_cycle_emission_order() {
        let mut seq = sequencer();
        let mut sink = RecordingSink::default();
        assert_eq!(seq.state(), PlaybackState::Idle);

        assert_eq!(seq.on_trigger(&mut sink), TriggerOutcome::Started);
        assert_eq!(seq.state(), PlaybackState::Playing);
        run_to_rest(&mut seq, &mut sink);

        // Engage 0,0,1,2,3 then release 3,2,1,0,0 then the rest frame
        assert_eq!(sink.frames, vec![0, 0, 1, 2, 3, 3, 2, 1, 0, 0, 0]);
        assert_eq!(seq.state(), PlaybackState::Idle);
        assert!(!seq.is_playing());
        assert_eq!(seq.current_frame(), 0);
    }

    #[test]
    fn test_restart_after_settle() {
        let mut seq = sequencer();
        let mut sink = RecordingSink::default();

        seq.on_trigger(&mut sink);
        run_to_rest(&mut seq, &mut sink);

        sink.frames.clear();
        assert_eq!(seq.on_trigger(&mut sink), TriggerOutcome::Started);
        assert_eq!(sink.frames, vec![0]);
        assert!(seq.is_playing());
        assert_eq!(seq.direction(), Direction::Descending);

        run_to_rest(&mut seq, &mut sink);
        assert_eq!(sink.frames, vec![0, 0, 1, 2, 3, 3, 2, 1, 0, 0, 0]);
    }

    #[test]
    fn test_trigger_mid_engage_is_noop() {
        // At every engage position before the hand-off
        for ticks in 0..SEQUENCE_LEN {
            let mut seq = sequencer();
            let mut sink = RecordingSink::default();

            seq.on_trigger(&mut sink);
            for _ in 0..ticks {
                seq.tick(&mut sink);
            }
            assert_eq!(seq.direction(), Direction::Descending);
            assert_eq!(seq.position(), ticks);
            let before = seq.snapshot();
            let emitted = sink.frames.len();

            assert_eq!(seq.on_trigger(&mut sink), TriggerOutcome::Ignored);
            assert_eq!(seq.snapshot(), before);
            assert_eq!(sink.frames.len(), emitted);
        }
    }

    #[test]
    fn test_trigger_during_release_redirects_without_emission() {
        let mut seq = sequencer();
        let mut sink = RecordingSink::default();

        // Drive into the release run: six ticks after the trigger land on
        // release position 1, frame 2.
        seq.on_trigger(&mut sink);
        for _ in 0..6 {
            seq.tick(&mut sink);
        }
        assert_eq!(seq.direction(), Direction::Ascending);
        assert_eq!(seq.current_frame(), 2);
        let emitted = sink.frames.len();

        assert_eq!(seq.on_trigger(&mut sink), TriggerOutcome::Redirected);
        // Redirect emits nothing: the frame on screen is already right
        assert_eq!(sink.frames.len(), emitted);
        assert_eq!(seq.direction(), Direction::Descending);
        assert_eq!(seq.current_frame(), 2);
        assert_eq!(DESCENDING_SEQUENCE[seq.position()], seq.current_frame());

        // Descent resumes from there and the cycle completes normally
        sink.frames.clear();
        run_to_rest(&mut seq, &mut sink);
        assert_eq!(sink.frames, vec![3, 3, 2, 1, 0, 0, 0]);
        assert!(!seq.is_playing());
    }

    #[test]
    fn test_redirect_position_mapping() {
        // Each release position maps to the engage position showing the
        // same frame. Frame 0 maps to engage position 0 (the earlier of
        // the two held slots).
        let cases = [(0, 4), (1, 3), (2, 2), (3, 0), (4, 0)];
        for (release_pos, engage_pos) in cases {
            let mut seq = sequencer();
            let mut sink = RecordingSink::default();
            seq.on_trigger(&mut sink);
            for _ in 0..SEQUENCE_LEN + release_pos {
                seq.tick(&mut sink);
            }
            assert_eq!(seq.direction(), Direction::Ascending);
            assert_eq!(seq.position(), release_pos);

            seq.on_trigger(&mut sink);
            assert_eq!(seq.direction(), Direction::Descending);
            assert_eq!(seq.position(), engage_pos);
            assert_eq!(DESCENDING_SEQUENCE[engage_pos], seq.current_frame());
        }
    }

    #[test]
    fn test_redirect_position_clamps_unknown_frames() {
        // In-table frames resolve to their first engage slot
        assert_eq!(descending_position_for(0), 0);
        assert_eq!(descending_position_for(3), SEQUENCE_LEN - 1);
        // Frames outside the table fall back to a clamped position
        // instead of panicking
        assert_eq!(descending_position_for(4), SEQUENCE_LEN - 1);
        assert_eq!(descending_position_for(9), SEQUENCE_LEN - 1);
        assert_eq!(descending_position_for(usize::MAX), SEQUENCE_LEN - 1);
    }

    #[test]
    fn test_force_stop_resets_and_emits_rest() {
        // Stop from idle, mid-engage and mid-release all land in the
        // same place: idle, rest frame shown.
        for ticks in [0, 2, 7] {
            let mut seq = sequencer();
            let mut sink = RecordingSink::default();
            if ticks > 0 {
                seq.on_trigger(&mut sink);
                for _ in 0..ticks - 1 {
                    seq.tick(&mut sink);
                }
            }

            sink.frames.clear();
            seq.force_stop(&mut sink);
            assert_eq!(sink.frames, vec![0]);
            assert!(!seq.is_playing());
            assert_eq!(seq.current_frame(), 0);
            assert_eq!(seq.position(), 0);
            assert_eq!(seq.direction(), Direction::Descending);
        }
    }

    #[test]
    fn test_stale_tick_after_stop_is_ignored() {
        let mut seq = sequencer();
        let mut sink = RecordingSink::default();

        seq.on_trigger(&mut sink);
        seq.tick(&mut sink);
        seq.force_stop(&mut sink);

        let emitted = sink.frames.len();
        assert_eq!(seq.tick(&mut sink), None);
        assert_eq!(sink.frames.len(), emitted);
        assert!(!seq.is_playing());
    }

    #[test]
    fn test_initialize_idempotent() {
        let mut seq = sequencer();
        let mut sink = RecordingSink::default();

        seq.initialize(&mut sink);
        let first = seq.snapshot();
        seq.initialize(&mut sink);

        assert_eq!(seq.snapshot(), first);
        assert_eq!(sink.frames, vec![0, 0]);
        assert!(!seq.is_playing());
    }

    #[test]
    fn test_custom_rest_frame() {
        let config = SequencerConfig {
            rest_frame: 2,
            ..SequencerConfig::default()
        };
        let mut seq = FrameSequencer::new(config);
        let mut sink = RecordingSink::default();

        seq.initialize(&mut sink);
        assert_eq!(sink.frames, vec![2]);

        sink.frames.clear();
        seq.on_trigger(&mut sink);
        run_to_rest(&mut seq, &mut sink);
        // Runs walk the fixed tables; only the settle emission changes
        assert_eq!(sink.frames, vec![0, 0, 1, 2, 3, 3, 2, 1, 0, 0, 2]);
        assert_eq!(seq.current_frame(), 2);
    }

    #[test]
    fn test_frame_position_invariant_random_walk() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seq = sequencer();
        let mut sink = RecordingSink::default();
        seq.initialize(&mut sink);

        for _ in 0..2000 {
            match rng.gen_range(0..10) {
                0..=2 => {
                    seq.on_trigger(&mut sink);
                }
                3 => seq.force_stop(&mut sink),
                _ => {
                    seq.tick(&mut sink);
                }
            }

            assert!(seq.current_frame() < FRAME_COUNT);
            assert!(seq.position() < SEQUENCE_LEN);
            if seq.is_playing() {
                assert_eq!(
                    seq.direction().sequence()[seq.position()],
                    seq.current_frame()
                );
            } else {
                assert_eq!(seq.current_frame(), seq.config().rest_frame);
                assert_eq!(seq.position(), 0);
            }
        }

        // Every emission stayed inside the frame table
        assert!(sink.frames.iter().all(|&f| f < FRAME_COUNT));
    }
}
