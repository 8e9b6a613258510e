use clap::Parser;
use std::path::PathBuf;

use crate::core::sequencer::FRAME_COUNT;

// Build version with sequencer info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Frames: ", FRAME_COUNT, " (engage/release, held endpoints)\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Interactive four-frame gesture sequencer demo
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Tick rate in ticks per second (overrides config file)
    #[arg(long = "fps", value_name = "FPS")]
    pub fps: Option<f32>,

    /// Load sequencer config from JSON file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rest frame shown while idle (overrides config file)
    #[arg(long = "rest-frame", value_name = "N")]
    pub rest_frame: Option<usize>,

    /// Trigger one gesture immediately on startup
    #[arg(short = 'a', long = "autoplay")]
    pub autoplay: bool,

    /// Scripted mode: trigger once, advance N ticks, print final state and exit
    #[arg(short = 't', long = "ticks", value_name = "N")]
    pub ticks: Option<usize>,

    /// Comma-separated art labels for frames 0..3 (frames without a label warn)
    #[arg(short = 'L', long = "labels", value_name = "L0,L1,..")]
    pub labels: Option<String>,

    /// Enable debug logging to file (default: flipbook.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}
