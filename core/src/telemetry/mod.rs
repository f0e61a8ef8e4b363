//! telemetry/mod.rs
//! Per-run counters, stage timers, and immutable snapshots.
//!
//! Notes:
//! - Counters are plain integers owned by the encode or decode pass; no
//!   atomics, nothing is shared between frames.
//! - Snapshots are immutable and serialisable so a run can be dumped as JSON.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
