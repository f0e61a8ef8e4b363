//! frames/decode.rs
//!
//! Ordered frames -> recovered container.
//!
//! Design notes:
//! - Every pixel is re-thresholded (`> THRESHOLD` is a 1); exact 0/255 values
//!   are never assumed since the video round trip may drift them.
//! - Bits are packed MSB-first as they arrive, in the same row-major, frame
//!   order the encoder used.
//! - A frame of the wrong shape is fatal. Skipping it would misalign every
//!   bit that follows.
//! - Trailing bytes past `72 + payload_length` are noise and are dropped.

use std::time::Instant;

use crate::constants::{BITS_PER_BYTE, HEADER_LEN, THRESHOLD};
use crate::container::{decode_header_le, extract_payload};
use crate::frames::encode::frames_for_bits;
use crate::frames::types::{FrameError, FrameGeometry, GrayFrame, Recovered};
use crate::io::FrameSource;
use crate::progress::ProgressSink;
use crate::telemetry::{CarrierCounters, Stage, TelemetrySnapshot, TelemetryTimer};
use crate::types::CarrierError;
use crate::utils::BitPacker;

/// Threshold policy applied to every recovered pixel.
#[inline(always)]
pub fn threshold_bit(pixel: u8) -> bool {
    pixel > THRESHOLD
}

/// Pulls frames one at a time and accumulates their bits.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    expected: Option<FrameGeometry>,
    packer: BitPacker,
    frames_seen: u64,
    /// Frames already split into payload/noise by an earlier `finish`.
    frames_accounted: u64,
    counters: CarrierCounters,
    timer: TelemetryTimer,
}

impl FrameDecoder {
    /// Decoder that requires every frame to be `geometry`.
    pub fn new(geometry: FrameGeometry) -> Self {
        Self::with_expected(Some(geometry))
    }

    /// Decoder that locks onto the shape of the first frame it sees.
    pub fn adaptive() -> Self {
        Self::with_expected(None)
    }

    fn with_expected(expected: Option<FrameGeometry>) -> Self {
        Self {
            expected,
            packer: BitPacker::new(),
            frames_seen: 0,
            frames_accounted: 0,
            counters: CarrierCounters::default(),
            timer: TelemetryTimer::new(),
        }
    }

    pub fn geometry(&self) -> Option<FrameGeometry> {
        self.expected
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// Bits accumulated so far.
    pub fn bits_recovered(&self) -> u64 {
        self.packer.bit_count()
    }

    /// Threshold one frame and append its bits.
    pub fn push_frame(&mut self, frame: &GrayFrame) -> Result<(), FrameError> {
        let actual = frame.geometry();
        let expected = *self.expected.get_or_insert(actual);
        if actual != expected {
            return Err(FrameError::Shape { index: self.frames_seen, expected, actual });
        }

        let t = Instant::now();
        for &px in frame.pixels() {
            self.packer.push_bit(threshold_bit(px));
        }
        self.timer.add_stage_time(Stage::Threshold, t.elapsed());

        tracing::trace!(index = self.frames_seen, bits = self.packer.bit_count(), "frame thresholded");
        self.frames_seen += 1;
        Ok(())
    }

    /// Parse the accumulated bytes into a container. The bit buffer is
    /// consumed; calling again without new frames yields `InsufficientData`.
    /// Frames pushed afterwards start a fresh container and are counted
    /// on their own.
    pub fn finish(&mut self) -> Result<Recovered, FrameError> {
        let packer = std::mem::take(&mut self.packer);
        let batch = self.frames_seen - self.frames_accounted;
        self.frames_accounted = self.frames_seen;
        if packer.pending_bits() > 0 {
            tracing::debug!(bits = packer.pending_bits(), "discarding incomplete trailing byte");
        }
        let mut bytes = packer.into_bytes();

        if bytes.len() < HEADER_LEN {
            self.timer.finish();
            return Err(FrameError::InsufficientData { have: bytes.len(), need: HEADER_LEN });
        }

        let t = Instant::now();
        let header = decode_header_le(&bytes)?;
        let payload_len = extract_payload(&bytes, header.payload_length)?.len();
        let extension = header.extension();

        let trailing = bytes.len() - HEADER_LEN - payload_len;
        bytes.truncate(HEADER_LEN + payload_len);
        bytes.drain(..HEADER_LEN);
        self.timer.add_stage_time(Stage::Parse, t.elapsed());

        self.record_split(batch, payload_len, trailing);
        self.timer.finish();

        tracing::info!(
            extension = %extension,
            payload_bytes = payload_len,
            frames = self.frames_seen,
            trailing_bytes = trailing,
            "decode complete"
        );

        Ok(Recovered { extension, payload: bytes })
    }

    /// Split one batch of frames into payload-bearing and noise-only.
    fn record_split(&mut self, frames: u64, payload_len: usize, trailing: usize) {
        let ppf = self.expected.map_or(1, |g| g.pixels_per_frame());
        let container_bits = ((HEADER_LEN + payload_len) * BITS_PER_BYTE) as u64;
        let payload_frames = frames_for_bits(container_bits, ppf).min(frames);

        self.counters.frames_payload += payload_frames;
        self.counters.frames_noise += frames - payload_frames;
        self.counters.bits_payload += container_bits;
        self.counters.pixels_noise += (frames * ppf as u64).saturating_sub(container_bits);
        self.counters.add_header(HEADER_LEN);
        self.counters.add_payload(payload_len, trailing);
    }

    /// Decode an in-memory frame sequence.
    pub fn decode<I>(&mut self, frames: I) -> Result<Recovered, FrameError>
    where
        I: IntoIterator<Item = GrayFrame>,
    {
        for frame in frames {
            self.push_frame(&frame)?;
        }
        self.finish()
    }

    /// Decode everything a source yields, reporting progress per frame.
    pub fn decode_source<S, P>(&mut self, source: &mut S, mut progress: P) -> Result<Recovered, CarrierError>
    where
        S: FrameSource + ?Sized,
        P: ProgressSink,
    {
        let total = source.remaining_hint();
        loop {
            let t = Instant::now();
            let next = source.read_frame()?;
            self.timer.add_stage_time(Stage::Read, t.elapsed());

            let Some(frame) = next else { break };
            self.push_frame(&frame)?;
            progress.on_frame(self.frames_seen, total);
        }
        progress.on_finish();
        Ok(self.finish()?)
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }
}

/// `decode(frames)`: geometry taken from the first frame.
pub fn decode<I>(frames: I) -> Result<Recovered, CarrierError>
where
    I: IntoIterator<Item = GrayFrame>,
{
    Ok(FrameDecoder::adaptive().decode(frames)?)
}
