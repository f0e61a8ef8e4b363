//! telemetry/snapshot.rs
//!
//! Immutable view of one pass: counters, derived ratios, and stage times.

use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::telemetry::counters::CarrierCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub frames_payload: u64,
    pub frames_noise: u64,
    pub bits_payload: u64,
    pub pixels_noise: u64,
    pub bytes_header: u64,
    pub bytes_payload: u64,
    pub bytes_trailing: u64,
    /// Share of all pixels that carried bitstream bits, 0.0..=1.0.
    pub payload_density: f64,
    pub throughput_payload_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &CarrierCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let total_pixels = counters.bits_payload + counters.pixels_noise;
        let payload_density = if total_pixels > 0 {
            (counters.bits_payload as f64 / total_pixels as f64).min(1.0)
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_payload as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            frames_payload: counters.frames_payload,
            frames_noise: counters.frames_noise,
            bits_payload: counters.bits_payload,
            pixels_noise: counters.pixels_noise,
            bytes_header: counters.bytes_header,
            bytes_payload: counters.bytes_payload,
            bytes_trailing: counters.bytes_trailing,
            payload_density,
            throughput_payload_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_frames(&self) -> u64 {
        self.frames_payload + self.frames_noise
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Internal invariants:
    /// - placed bits never exceed the header + payload they came from
    /// - density stays within 0..=1
    /// - stage time never exceeds wall time
    pub fn sanity_check(&self) -> bool {
        self.bits_payload <= (self.bytes_header + self.bytes_payload) * 8
            && (0.0..=1.0).contains(&self.payload_density)
            && self.total_stage_time() <= self.elapsed
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
