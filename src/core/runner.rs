//! Gesture runner: event loop binding bus, ticker and sequencer.
//!
//! **Architecture**: the runner owns a [`FrameSequencer`] and its sink on
//! a dedicated thread. Bus subscriptions do no work themselves; each one
//! forwards its event into a single command channel, and the thread
//! drains that channel through `select!` alongside the tick channel. The
//! host never touches sequencer state directly.
//!
//! # Ordering
//!
//! One command channel for all input events means commands are processed
//! strictly in arrival order, one at a time, on one thread. Ticks
//! interleave at select granularity; a tick landing after a stop finds
//! the sequencer idle and does nothing.
//!
//! # Lifecycle
//!
//! - [`start`](GestureRunner::start): subscribe to bus events, spawn the
//!   thread, present the rest frame.
//! - [`shutdown`](GestureRunner::shutdown): drop this runner's bus
//!   subscriptions (others stay attached), snap the sequencer back to
//!   rest, stop the thread, join. Dropping the handle without calling
//!   shutdown does the same.

use std::thread;

use crossbeam_channel::{Receiver, Sender, select, unbounded};
use log::trace;

use crate::config::SequencerConfig;
use crate::core::event_bus::{EventBus, SubscriptionId};
use crate::core::sequencer::{FrameSequencer, TriggerOutcome};
use crate::core::sequencer_events::{ShutdownEvent, StopEvent, TriggerEvent};
use crate::core::ticker::Ticker;
use crate::core::traits::FrameSink;

/// Commands forwarded from bus subscriptions to the runner thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Trigger gesture arrived
    Trigger,
    /// Force-stop requested
    Stop,
    /// Exit the runner thread
    Shutdown,
}

/// Handle to a running sequencer thread.
pub struct GestureRunner {
    commands: Sender<Command>,
    subscriptions: Vec<SubscriptionId>,
    bus: EventBus,
    handle: Option<thread::JoinHandle<()>>,
}

impl GestureRunner {
    /// Subscribe to gesture events on `bus` and spawn the runner thread.
    ///
    /// The thread presents the rest frame immediately, then reacts to
    /// [`TriggerEvent`], [`StopEvent`] and [`ShutdownEvent`] from the bus.
    pub fn start(config: SequencerConfig, bus: &EventBus, sink: Box<dyn FrameSink + Send>) -> Self {
        let (tx, rx) = unbounded::<Command>();

        // All inputs funnel into one channel to keep arrival order
        let mut subscriptions = Vec::new();
        let trigger_tx = tx.clone();
        subscriptions.push(bus.subscribe::<TriggerEvent, _>(move |_| {
            let _ = trigger_tx.send(Command::Trigger);
        }));
        let stop_tx = tx.clone();
        subscriptions.push(bus.subscribe::<StopEvent, _>(move |_| {
            let _ = stop_tx.send(Command::Stop);
        }));
        let shutdown_tx = tx.clone();
        subscriptions.push(bus.subscribe::<ShutdownEvent, _>(move |_| {
            let _ = shutdown_tx.send(Command::Shutdown);
        }));

        let handle = thread::Builder::new()
            .name("gesture-runner".to_string())
            .spawn(move || run_loop(config, rx, sink))
            .expect("Failed to spawn gesture-runner thread");

        Self {
            commands: tx,
            subscriptions,
            bus: bus.clone(),
            handle: Some(handle),
        }
    }

    /// Detach from the bus, stop the runner thread and wait for it.
    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.bus.unsubscribe(id);
        }
        if let Some(handle) = self.handle.take() {
            let _ = self.commands.send(Command::Shutdown);
            let _ = handle.join();
        }
    }
}

impl Drop for GestureRunner {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn run_loop(config: SequencerConfig, commands: Receiver<Command>, mut sink: Box<dyn FrameSink + Send>) {
    trace!("Gesture runner started ({} fps)", config.fps);

    let mut sequencer = FrameSequencer::new(config);
    let mut ticker = Ticker::new(config.frame_duration());

    sequencer.initialize(&mut sink);

    loop {
        // Clone the tick receiver so arm/disarm inside the arms can swap
        // the live channel for the next iteration
        let ticks = ticker.channel().clone();
        select! {
            recv(commands) -> cmd => match cmd {
                Ok(Command::Trigger) => match sequencer.on_trigger(&mut sink) {
                    TriggerOutcome::Started => ticker.arm(),
                    TriggerOutcome::Redirected | TriggerOutcome::Ignored => {}
                },
                Ok(Command::Stop) => {
                    sequencer.force_stop(&mut sink);
                    ticker.disarm();
                }
                Ok(Command::Shutdown) | Err(_) => {
                    sequencer.force_stop(&mut sink);
                    break;
                }
            },
            recv(ticks) -> msg => {
                if msg.is_ok() {
                    sequencer.tick(&mut sink);
                    if !sequencer.is_playing() {
                        ticker.disarm();
                    }
                }
            }
        }
    }

    trace!("Gesture runner stopped");
}
