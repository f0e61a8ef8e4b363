//! telemetry/counters.rs
//! Mutable counters collected while frames are produced or consumed.
//!
//! Converted into an immutable `TelemetrySnapshot` at the end of a pass.
use std::ops::AddAssign;
use serde::{Deserialize, Serialize};

/// Deterministic counters for one encode or decode pass.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierCounters {
    /// Frames holding at least one bitstream bit.
    pub frames_payload: u64,
    /// Frames made only of filler noise.
    pub frames_noise: u64,
    /// Header + payload bits placed (encode) or recovered (decode).
    pub bits_payload: u64,
    /// Pixels carrying no information.
    pub pixels_noise: u64,
    pub bytes_header: u64,
    pub bytes_payload: u64,
    /// Packed bytes past the end of the payload, discarded on decode.
    pub bytes_trailing: u64,
}

impl CarrierCounters {
    /// Record the container header.
    pub fn add_header(&mut self, header_len: usize) {
        self.bytes_header += header_len as u64;
    }

    /// Record one frame that carries `bits` bitstream bits. Any remaining
    /// pixels in the frame count as noise.
    pub fn add_payload_frame(&mut self, bits: usize, pixels_per_frame: usize) {
        self.frames_payload += 1;
        self.bits_payload += bits as u64;
        self.pixels_noise += pixels_per_frame.saturating_sub(bits) as u64;
    }

    /// Record one frame of pure noise.
    pub fn add_noise_frame(&mut self, pixels_per_frame: usize) {
        self.frames_noise += 1;
        self.pixels_noise += pixels_per_frame as u64;
    }

    /// Record the payload, and on decode whatever was thrown away behind it.
    pub fn add_payload(&mut self, payload_len: usize, trailing_len: usize) {
        self.bytes_payload += payload_len as u64;
        self.bytes_trailing += trailing_len as u64;
    }

    pub fn total_frames(&self) -> u64 {
        self.frames_payload + self.frames_noise
    }

    pub fn merge(&mut self, other: &CarrierCounters) {
        self.frames_payload += other.frames_payload;
        self.frames_noise += other.frames_noise;
        self.bits_payload += other.bits_payload;
        self.pixels_noise += other.pixels_noise;
        self.bytes_header += other.bytes_header;
        self.bytes_payload += other.bytes_payload;
        self.bytes_trailing += other.bytes_trailing;
    }
}

impl AddAssign for CarrierCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
