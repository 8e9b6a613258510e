//! Core engine modules - events, sequencer, ticker, runner
//!
//! These modules form the sequencing engine, independent of any host UI.

pub mod event_bus;
pub mod runner;
pub mod sequencer;
pub mod sequencer_events;
pub mod ticker;
pub mod traits;

// Re-exports for convenience
pub use event_bus::{EventBus, EventEmitter, SubscriptionId};
pub use runner::GestureRunner;
pub use sequencer::{Direction, FrameSequencer, PlaybackState, TriggerOutcome};
pub use ticker::Ticker;
pub use traits::FrameSink;
