//! frames/encode.rs
//!
//! Payload -> ordered grayscale frames.
//!
//! Design notes:
//! - Each frame starts as pure binary noise; the next `min(remaining,
//!   pixels_per_frame)` bitstream bits then overwrite its leading pixels in
//!   row-major order.
//! - Frame count covers both the minimum duration and the bitstream, so a
//!   large payload at a short duration is never cut off.
//! - Frames are generated lazily, one per `next()`, and not retained.

use std::time::Instant;
use rand::rngs::StdRng;
use rand::RngCore;

use crate::config::CarrierConfig;
use crate::constants::{BITS_PER_BYTE, HEADER_LEN, PIXEL_OFF, PIXEL_ON};
use crate::container::build_container;
use crate::frames::types::{FrameError, FrameGeometry, GrayFrame};
use crate::io::FrameSink;
use crate::noise::NoiseSource;
use crate::progress::ProgressSink;
use crate::telemetry::{CarrierCounters, Stage, TelemetrySnapshot, TelemetryTimer};
use crate::types::CarrierError;
use crate::utils::{bit_at, ceil_div};

/// Minimum frames for the requested duration: `max(ceil(fps * secs), 1)`.
pub fn required_frame_count(fps: f64, min_duration_secs: f64) -> u64 {
    let raw = (fps * min_duration_secs).ceil();
    if raw.is_finite() && raw >= 1.0 {
        // Saturating float -> int cast.
        raw as u64
    } else {
        1
    }
}

/// Frames needed to hold `bits` at one bit per pixel.
pub fn frames_for_bits(bits: u64, pixels_per_frame: usize) -> u64 {
    ceil_div(bits, pixels_per_frame as u64)
}

/// Frames the encoder will emit for a payload of `payload_len` bytes.
pub fn total_frame_count(payload_len: u64, geometry: FrameGeometry, fps: f64, min_duration_secs: f64) -> u64 {
    let bits = (HEADER_LEN as u64 + payload_len).saturating_mul(BITS_PER_BYTE as u64);
    required_frame_count(fps, min_duration_secs).max(frames_for_bits(bits, geometry.pixels_per_frame()))
}

/// Encoder for one session: geometry, timing and a noise source.
pub struct FrameEncoder<R: RngCore = StdRng> {
    geometry: FrameGeometry,
    fps: f64,
    min_duration_secs: f64,
    noise: NoiseSource<R>,
}

impl FrameEncoder<StdRng> {
    /// Seeded from `config.seed` when present, otherwise from the OS.
    pub fn from_config(config: &CarrierConfig) -> Result<Self, CarrierError> {
        let noise = match config.seed {
            Some(seed) => NoiseSource::seeded(seed),
            None => NoiseSource::from_entropy(),
        };
        Self::with_noise(config, noise)
    }

    pub fn seeded(config: &CarrierConfig, seed: u64) -> Result<Self, CarrierError> {
        Self::with_noise(config, NoiseSource::seeded(seed))
    }
}

impl<R: RngCore> FrameEncoder<R> {
    pub fn new(config: &CarrierConfig, rng: R) -> Result<Self, CarrierError> {
        Self::with_noise(config, NoiseSource::new(rng))
    }

    fn with_noise(config: &CarrierConfig, noise: NoiseSource<R>) -> Result<Self, CarrierError> {
        config.validate()?;
        Ok(Self {
            geometry: config.geometry()?,
            fps: config.fps,
            min_duration_secs: config.min_duration_secs,
            noise,
        })
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Frames `encode` will yield for a payload of `payload_len` bytes.
    pub fn frame_count_for(&self, payload_len: usize) -> u64 {
        total_frame_count(payload_len as u64, self.geometry, self.fps, self.min_duration_secs)
    }

    /// Lazily encode `payload` tagged with `extension`.
    pub fn encode(self, payload: &[u8], extension: &str) -> Result<EncodedFrames<R>, FrameError> {
        let mut timer = TelemetryTimer::new();
        let container = timer.time(Stage::Serialize, || build_container(payload, extension));
        let total_bits = container
            .len()
            .checked_mul(BITS_PER_BYTE)
            .ok_or(FrameError::PayloadTooLarge { bytes: payload.len() })?;

        let total_frames = self.frame_count_for(payload.len());

        let mut counters = CarrierCounters::default();
        counters.add_header(HEADER_LEN);
        counters.add_payload(payload.len(), 0);

        tracing::debug!(
            payload_bytes = payload.len(),
            extension,
            geometry = %self.geometry,
            bitstream_bits = total_bits,
            min_frames = required_frame_count(self.fps, self.min_duration_secs),
            total_frames,
            "encoding payload"
        );

        Ok(EncodedFrames {
            container,
            total_bits,
            bits_placed: 0,
            geometry: self.geometry,
            total_frames,
            next_index: 0,
            noise: self.noise,
            counters,
            timer,
        })
    }

    /// Encode straight into a sink, reporting progress after every frame.
    pub fn encode_to_sink<S, P>(
        self,
        payload: &[u8],
        extension: &str,
        sink: &mut S,
        mut progress: P,
    ) -> Result<TelemetrySnapshot, CarrierError>
    where
        S: FrameSink + ?Sized,
        P: ProgressSink,
    {
        let mut frames = self.encode(payload, extension)?;
        let total = frames.total_frames();

        while let Some(frame) = frames.next() {
            let t = Instant::now();
            sink.write_frame(&frame)?;
            frames.timer.add_stage_time(Stage::Write, t.elapsed());
            progress.on_frame(frames.frames_emitted(), Some(total));
        }
        frames.timer.time(Stage::Write, || sink.finish())?;
        frames.timer.finish();
        progress.on_finish();

        let snapshot = frames.telemetry();
        tracing::info!(
            frames = snapshot.total_frames(),
            payload_frames = snapshot.frames_payload,
            noise_frames = snapshot.frames_noise,
            "encode complete"
        );
        Ok(snapshot)
    }
}

/// Lazy frame sequence for one payload.
pub struct EncodedFrames<R: RngCore = StdRng> {
    container: Vec<u8>,
    total_bits: usize,
    bits_placed: usize,
    geometry: FrameGeometry,
    total_frames: u64,
    next_index: u64,
    noise: NoiseSource<R>,
    counters: CarrierCounters,
    timer: TelemetryTimer,
}

impl<R: RngCore> EncodedFrames<R> {
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn frames_emitted(&self) -> u64 {
        self.next_index
    }

    /// Bitstream length, `8 * (72 + payload_length)`.
    pub fn bitstream_bits(&self) -> usize {
        self.total_bits
    }

    pub fn bits_placed(&self) -> usize {
        self.bits_placed
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }

    fn generate(&mut self) -> GrayFrame {
        let ppf = self.geometry.pixels_per_frame();
        let mut pixels = vec![PIXEL_OFF; ppf];
        self.noise.fill(&mut pixels);

        let chunk = (self.total_bits - self.bits_placed).min(ppf);
        for (i, px) in pixels[..chunk].iter_mut().enumerate() {
            *px = if bit_at(&self.container, self.bits_placed + i) == 1 { PIXEL_ON } else { PIXEL_OFF };
        }
        self.bits_placed += chunk;

        if chunk > 0 {
            self.counters.add_payload_frame(chunk, ppf);
        } else {
            self.counters.add_noise_frame(ppf);
        }

        GrayFrame::from_parts(self.geometry, pixels)
    }
}

impl<R: RngCore> Iterator for EncodedFrames<R> {
    type Item = GrayFrame;

    fn next(&mut self) -> Option<GrayFrame> {
        if self.next_index >= self.total_frames {
            return None;
        }
        let t = Instant::now();
        let frame = self.generate();
        self.timer.add_stage_time(Stage::Generate, t.elapsed());

        tracing::trace!(index = self.next_index, bits_placed = self.bits_placed, "frame generated");
        self.next_index += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total_frames - self.next_index;
        let left = usize::try_from(left).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}

impl<R: RngCore> ExactSizeIterator for EncodedFrames<R> {}

/// `encode(payload, extension, width, height, fps, min_duration)` with the
/// session parameters carried by `config`.
pub fn encode(payload: &[u8], extension: &str, config: &CarrierConfig) -> Result<EncodedFrames, CarrierError> {
    Ok(FrameEncoder::from_config(config)?.encode(payload, extension)?)
}
