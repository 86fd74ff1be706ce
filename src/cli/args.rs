//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::domain::recording::{Countdown, Duration};

/// VoiceRecord - record your voice, trimmed to a fixed length
#[derive(Parser, Debug)]
#[command(name = "voice-record")]
#[command(version)]
#[command(about = "Record from the microphone with an optional countdown, trimmed and saved as WAV")]
#[command(long_about = None)]
pub struct Cli {
    /// Countdown length in seconds for countdown recordings
    #[arg(short = 'c', long, value_name = "SECS")]
    pub countdown: Option<u32>,

    /// Keep at most this much of each recording (e.g., 5s, 1m, 1m30s)
    #[arg(short = 't', long, value_name = "TIME")]
    pub trim: Option<String>,

    /// Directory recordings are saved into
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Record a generated tone instead of the microphone
    #[arg(long)]
    pub synthetic: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Log level for this crate's modules
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            match self.verbose {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }
}

/// Initialize the logging system based on CLI arguments
pub fn init_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::new();

    // Keep dependencies (cpal, symphonia) at warn
    builder.filter_level(LevelFilter::Warn);
    builder.filter_module("voice_record", cli.log_level());

    // Audio backends only at -vvvv
    if cli.verbose >= 4 {
        builder.filter_module("cpal", cli.log_level());
        builder.filter_module("symphonia", cli.log_level());
    }

    builder.format_timestamp_millis().init();
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trim an existing recording and write it as WAV
    Trim {
        /// Audio file to trim (FLAC, WAV, Ogg Vorbis, WebM/Matroska)
        input: PathBuf,

        /// Output WAV path [default: <input stem>.wav next to the input]
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Keep at most this much audio
        #[arg(short = 't', long, value_name = "TIME")]
        trim: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed options for the interactive recorder
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub countdown: Countdown,
    pub trim: Duration,
    pub output_dir: PathBuf,
    pub synthetic: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["countdown", "trim", "output_dir"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
