//! static-carrier-core
//!
//! Hides an arbitrary payload in a synthetic grayscale video, one bit per
//! pixel (black = 0, white = 255), and recovers it by thresholding the
//! decoded frames.
//!
//! Pure Rust, single-threaded, no video codec. Frames go out through a
//! `FrameSink` and come back through a `FrameSource`.
//!
//! ```rust
//! use static_carrier_core::prelude::*;
//!
//! let config = CarrierConfig::new(64, 48, 10.0, 0.5).with_seed(7);
//! let frames: Vec<GrayFrame> = encode(b"hello", ".txt", &config).unwrap().collect();
//! let recovered = decode(frames).unwrap();
//! assert_eq!(recovered.extension, ".txt");
//! assert_eq!(recovered.payload, b"hello");
//! ```

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Codec layers
pub mod container;
pub mod frames;
pub mod noise;

// Collaborators
pub mod io;
pub mod progress;
pub mod telemetry;

pub use types::CarrierError;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::CarrierConfig;
    pub use crate::container::{ContainerError, ContainerHeader};
    pub use crate::frames::{
        decode, encode, FrameDecoder, FrameEncoder, FrameError, FrameGeometry, GrayFrame,
        Recovered, RecoveredKind,
    };
    pub use crate::io::{FrameSink, FrameSource, MemorySink, MemorySource, Y4mReader, Y4mWriter};
    pub use crate::progress::{NoProgress, ProgressSink};
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::CarrierError;
}
