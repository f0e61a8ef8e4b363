//! constants.rs
//! Wire sizes, pixel policy values and encode defaults.
//!
//! Everything the container and frame codecs agree on lives here so the
//! encoder and decoder can never drift apart.

/// Bytes used by the little-endian `payload_length` field.
pub const PAYLOAD_LEN_FIELD: usize = 8;

/// Bytes reserved for the null-padded UTF-8 extension tag.
pub const EXTENSION_TAG_LEN: usize = 64;

/// Fixed container header size (`payload_length` + `extension_tag`).
pub const HEADER_LEN: usize = PAYLOAD_LEN_FIELD + EXTENSION_TAG_LEN; // 72

pub const BITS_PER_BYTE: usize = 8;

/// Pixel intensity for a `1` bit.
pub const PIXEL_ON: u8 = 255;
/// Pixel intensity for a `0` bit.
pub const PIXEL_OFF: u8 = 0;

/// Threshold policy: a recovered pixel strictly above this value reads as `1`.
///
/// Midpoint between `PIXEL_OFF` and `PIXEL_ON`, so up to 127 levels of
/// codec drift in either direction still recover the right bit.
pub const THRESHOLD: u8 = 127;

/// Extension marking a payload that should be displayed as text.
pub const TEXT_EXTENSION: &str = ".txt";

/// Extension used when an input file carries none.
pub const DEFAULT_EXTENSION: &str = ".bin";

/// Prefix for files written by the decoder (`recovered_file.png`, ...).
pub const RECOVERED_FILE_PREFIX: &str = "recovered_file";

/// Defaults when no config is supplied.
pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;
pub const DEFAULT_FPS: f64 = 30.0;
pub const DEFAULT_MIN_DURATION_SECS: f64 = 5.0;

/// Default encoder output name.
pub const DEFAULT_OUTPUT_VIDEO: &str = "static_smart.y4m";
