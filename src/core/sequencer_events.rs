//! Gesture input and host control events.

// === Gesture Input ===

/// Trigger gesture event - starts or redirects the engage run
#[derive(Clone, Debug)]
pub struct TriggerEvent;

// === Host Control ===

/// Force-stop event - snaps the sequencer back to rest
#[derive(Clone, Debug)]
pub struct StopEvent;

/// Shutdown event - asks the runner thread to exit
#[derive(Clone, Debug)]
pub struct ShutdownEvent;
