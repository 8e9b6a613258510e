//! FLIPBOOK - Interruptible gesture frame sequencer library
//!
//! Re-exports all modules for use by binary targets.

// Core engine (events, sequencer, ticker, runner)
pub mod core;

// App modules
pub mod cli;
pub mod config;

// Re-export commonly used types from core
pub use core::event_bus::{EventBus, EventEmitter, SubscriptionId};
pub use core::runner::GestureRunner;
pub use core::sequencer::{
    ASCENDING_SEQUENCE, DESCENDING_SEQUENCE, Direction, FRAME_COUNT, FrameSequencer,
    PlaybackState, SEQUENCE_LEN, SequencerSnapshot, TriggerOutcome,
};
pub use core::traits::FrameSink;

// Re-export config
pub use config::{DEFAULT_FPS, SequencerConfig};
