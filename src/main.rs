use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{debug, info, warn};

use flipbook::cli::Args;
use flipbook::config::SequencerConfig;
use flipbook::core::event_bus::EventBus;
use flipbook::core::runner::GestureRunner;
use flipbook::core::sequencer::{FRAME_COUNT, FrameSequencer};
use flipbook::core::sequencer_events::{ShutdownEvent, StopEvent, TriggerEvent};
use flipbook::core::traits::FrameSink;

/// Built-in button art, one label per frame (rest through fully pressed)
const DEFAULT_LABELS: [&str; FRAME_COUNT] = ["[####]", "[###_]", "[##__]", "[#___]"];

/// Console frame output: prints the art label for each emitted frame.
struct ConsoleSink {
    labels: Vec<Option<String>>,
}

impl ConsoleSink {
    fn new(labels: Vec<Option<String>>) -> Self {
        Self { labels }
    }
}

impl FrameSink for ConsoleSink {
    fn display_frame(&mut self, frame_idx: usize) {
        match self.labels.get(frame_idx).and_then(|l| l.as_deref()) {
            Some(label) => println!("{}  (frame {})", label, frame_idx),
            None => {
                // Missing art is non-fatal: sequencing continues either way
                warn!("No art for frame {}, showing index only", frame_idx);
                println!("(frame {})", frame_idx);
            }
        }
    }
}

/// Parse `--labels a,b,c,d` into per-frame slots; empty or missing
/// entries stay None and take the warn path on display.
fn parse_labels(arg: Option<&str>) -> Vec<Option<String>> {
    match arg {
        Some(list) => {
            let mut labels: Vec<Option<String>> = list
                .split(',')
                .map(|s| {
                    let s = s.trim();
                    if s.is_empty() { None } else { Some(s.to_string()) }
                })
                .collect();
            labels.resize(FRAME_COUNT, None);
            labels
        }
        None => DEFAULT_LABELS.iter().map(|s| Some(s.to_string())).collect(),
    }
}

/// Drive a sequencer directly at the configured cadence: one trigger,
/// `ticks` advances, no bus.
fn run_scripted(config: SequencerConfig, mut sink: ConsoleSink, ticks: usize) {
    info!("Scripted run: {} tick(s)", ticks);

    let mut sequencer = FrameSequencer::new(config);
    sequencer.initialize(&mut sink);
    sequencer.on_trigger(&mut sink);
    for _ in 0..ticks {
        std::thread::sleep(config.frame_duration());
        sequencer.tick(&mut sink);
    }

    let snapshot = sequencer.snapshot();
    info!("Scripted run done: {:?}", snapshot);
    println!(
        "Settled: {} (frame {}, {:?})",
        !sequencer.is_playing(),
        snapshot.frame,
        snapshot.state
    );
}

/// Full wiring: bus + runner thread, stdin as the input event source.
fn run_interactive(config: SequencerConfig, sink: ConsoleSink, autoplay: bool) -> anyhow::Result<()> {
    let bus = EventBus::new();
    let runner = GestureRunner::start(config, &bus, Box::new(sink));
    let emitter = bus.emitter();

    println!("Commands: t/enter = trigger, s = stop, q = quit");

    if autoplay {
        info!("Autoplay: triggering on startup");
        emitter.emit(TriggerEvent);
    }

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        match line.trim() {
            "" | "t" | "trigger" => emitter.emit(TriggerEvent),
            "s" | "stop" => emitter.emit(StopEvent),
            "q" | "quit" | "exit" => break,
            other => println!("Unknown command: {:?} (t=trigger, s=stop, q=quit)", other),
        }
    }

    emitter.emit(ShutdownEvent);
    runner.shutdown();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for log setup)
    let args = Args::parse();

    // Determine log level based on verbosity flags
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    // Initialize logger based on --log flag
    if let Some(log_path_opt) = &args.log_file {
        // File logging with specified verbosity level
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| PathBuf::from("flipbook.log"));

        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!(
            "Logging to file: {} (level: {:?})",
            log_path.display(),
            log_level
        );
    } else {
        // Console logging with specified verbosity level (respects RUST_LOG if set)
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp_millis()
            .init();
    }

    info!("Flipbook gesture sequencer starting...");
    debug!("Command-line args: {:?}", args);

    // Config file first, CLI overrides on top
    let mut config = match &args.config {
        Some(path) => SequencerConfig::from_json(path)?,
        None => SequencerConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    if let Some(rest_frame) = args.rest_frame {
        config.rest_frame = rest_frame;
    }
    config.validate()?;
    info!(
        "Config: fps={}, rest_frame={}",
        config.fps, config.rest_frame
    );

    let sink = ConsoleSink::new(parse_labels(args.labels.as_deref()));

    if let Some(ticks) = args.ticks {
        run_scripted(config, sink, ticks);
    } else {
        run_interactive(config, sink, args.autoplay)?;
    }

    info!("Application exiting");
    Ok(())
}
