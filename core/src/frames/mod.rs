//! Frame codec: bitstream <-> fixed-size grayscale frames.
//!
//! Responsibilities:
//! - Map container bits onto pixels, one bit per pixel, row-major
//! - Pad with noise frames up to the minimum duration
//! - Threshold recovered pixels back into bits and bytes
//!
//! Non-responsibilities:
//! - Container layout (see `container`)
//! - Video compression and muxing (see `io`)

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{
    FrameError,
    FrameGeometry,
    GrayFrame,
    Recovered,
    RecoveredKind,
};
pub use encode::{
    encode,
    frames_for_bits,
    required_frame_count,
    total_frame_count,
    EncodedFrames,
    FrameEncoder,
};
pub use decode::{
    decode,
    threshold_bit,
    FrameDecoder,
};
