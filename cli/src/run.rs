//! Encode and decode commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use static_carrier_core::constants::DEFAULT_OUTPUT_VIDEO;
use static_carrier_core::frames::{FrameDecoder, FrameEncoder, RecoveredKind};
use static_carrier_core::io::{InputSource, OutputSink, Y4mReader, Y4mWriter};
use static_carrier_core::telemetry::TelemetrySnapshot;
use tracing::info;

use crate::args::{load_payload, CarrierArgs, Mode};
use crate::bar::TerminalProgress;

const RULE_WIDTH: usize = 30;

pub fn run(args: &CarrierArgs) -> Result<()> {
    match args.mode() {
        Mode::Encode => encode(args),
        Mode::Decode => decode(args),
    }
}

fn encode(args: &CarrierArgs) -> Result<()> {
    let config = args.carrier_config()?;
    let (payload, extension) = load_payload(args)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_VIDEO));

    let encoder = FrameEncoder::from_config(&config)?;
    info!(
        extension = %extension,
        bytes = payload.len(),
        frames = encoder.frame_count_for(payload.len()),
        "encoding"
    );

    let mut sink = Y4mWriter::create(OutputSink::File(output.clone()), encoder.geometry(), encoder.fps())
        .with_context(|| format!("creating {}", output.display()))?;
    let progress = TerminalProgress::new("Encoding", !args.quiet);
    let snapshot = encoder
        .encode_to_sink(&payload, &extension, &mut sink, progress)
        .context("encode failed")?;

    info!("saved as {}", output.display());
    write_stats(args, &snapshot)
}

fn decode(args: &CarrierArgs) -> Result<()> {
    let input = PathBuf::from(&args.input);
    if !input.exists() {
        bail!("{} not found", input.display());
    }

    let mut source = Y4mReader::open(InputSource::File(input.clone()))
        .with_context(|| format!("opening {}", input.display()))?;
    let mut decoder = FrameDecoder::new(source.geometry());
    let progress = TerminalProgress::new("Decoding", !args.quiet);
    let recovered = decoder
        .decode_source(&mut source, progress)
        .context("decode failed")?;

    match recovered.kind() {
        RecoveredKind::Text(message) => {
            let rule = "=".repeat(RULE_WIDTH);
            println!("\nDecoded message:\n{rule}\n{message}\n{rule}");
        }
        RecoveredKind::File { file_name } => {
            let path = args.output.clone().unwrap_or_else(|| PathBuf::from(file_name));
            fs::write(&path, &recovered.payload)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(
                filetype = %recovered.extension,
                bytes = recovered.payload.len(),
                "detected filetype, saved as {}",
                path.display()
            );
        }
    }

    write_stats(args, &decoder.telemetry())
}

/// One `stage  ms` line per measured stage, sorted by stage name.
pub fn stage_lines(snapshot: &TelemetrySnapshot) -> Vec<String> {
    let times = &snapshot.stage_times;
    let mut stages: Vec<_> = times.iter().map(|(stage, _)| *stage).collect();
    stages.sort_by_key(|s| s.to_string());
    stages
        .into_iter()
        .map(|stage| format!("{:<9} {:>10.3} ms", stage.to_string(), times.get_ms(stage)))
        .collect()
}

fn write_stats(args: &CarrierArgs, snapshot: &TelemetrySnapshot) -> Result<()> {
    for line in stage_lines(snapshot) {
        tracing::debug!("{line}");
    }

    let Some(path) = &args.stats else {
        return Ok(());
    };
    let json = snapshot.to_json().context("serializing telemetry")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "telemetry written");
    Ok(())
}
