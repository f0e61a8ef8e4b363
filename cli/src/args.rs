//! Command-line argument parsing.
//!
//! Explicit flags win over values loaded from `--config`, which in turn
//! win over built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, ArgGroup, Parser};
use static_carrier_core::config::CarrierConfig;
use static_carrier_core::constants::{DEFAULT_EXTENSION, TEXT_EXTENSION};

/// Static carrier command-line arguments
#[derive(Parser, Debug)]
#[command(name = "static-carrier")]
#[command(about = "Hide a file or message in grayscale static video, and get it back")]
#[command(group(ArgGroup::new("mode").required(true).args(["encode", "decode"])))]
pub struct CarrierArgs {
    /// Encode the input into a video
    #[arg(short = 'e', long)]
    pub encode: bool,

    /// Decode a video back into its payload
    #[arg(short = 'd', long)]
    pub decode: bool,

    /// Input file, video, or message text (with --text)
    #[arg(short = 'i', long)]
    pub input: String,

    /// Output path: the video on encode, the recovered file on decode
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Treat --input as a literal text message
    #[arg(short = 't', long)]
    pub text: bool,

    /// Minimum video length in seconds
    #[arg(long)]
    pub duration: Option<f64>,

    /// Frame width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Frame height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Frames per second
    #[arg(long)]
    pub fps: Option<f64>,

    /// Seed for the filler noise (reproducible output)
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON config file with encode defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write pass telemetry as JSON to this path
    #[arg(long)]
    pub stats: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings and errors; no progress bar
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encode,
    Decode,
}

impl CarrierArgs {
    pub fn mode(&self) -> Mode {
        if self.encode {
            Mode::Encode
        } else {
            Mode::Decode
        }
    }

    /// Session config: file (if any), then flag overrides, then validation.
    pub fn carrier_config(&self) -> Result<CarrierConfig> {
        let mut config = match &self.config {
            Some(path) => CarrierConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => CarrierConfig::default(),
        };

        if let Some(w) = self.width {
            config.width = w;
        }
        if let Some(h) = self.height {
            config.height = h;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(secs) = self.duration {
            config.min_duration_secs = secs;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        config.validate().context("invalid encode settings")?;
        Ok(config)
    }
}

/// Extension recorded for an input file: `.` plus the final suffix, or
/// the default when the name has none.
pub fn extension_for(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy()),
        _ => DEFAULT_EXTENSION.to_owned(),
    }
}

/// Payload bytes and extension tag for an encode run.
pub fn load_payload(args: &CarrierArgs) -> Result<(Vec<u8>, String)> {
    if args.text {
        return Ok((args.input.as_bytes().to_vec(), TEXT_EXTENSION.to_owned()));
    }
    let path = Path::new(&args.input);
    let payload = std::fs::read(path).with_context(|| format!("{} not found", path.display()))?;
    Ok((payload, extension_for(path)))
}
