//! frames/types.rs
//! Frame geometry, grayscale frames, decode results and frame errors.

use std::fmt;
use thiserror::Error;

use crate::constants::{RECOVERED_FILE_PREFIX, TEXT_EXTENSION};
use crate::container::ContainerError;

/// Fixed `width x height` of every frame in one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameGeometry {
    width: u32,
    height: u32,
    pixels: usize,
}

impl FrameGeometry {
    /// Reject zero dimensions and pixel counts that do not fit in memory.
    pub fn new(width: u32, height: u32) -> Result<Self, FrameError> {
        let pixels = (width as usize)
            .checked_mul(height as usize)
            .filter(|&p| p > 0)
            .ok_or(FrameError::InvalidGeometry { width, height })?;
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// One bitstream position per pixel.
    pub fn pixels_per_frame(&self) -> usize {
        self.pixels
    }
}

impl fmt::Display for FrameGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One single-channel frame, pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayFrame {
    geometry: FrameGeometry,
    pixels: Vec<u8>,
}

impl GrayFrame {
    /// Wrap raw luma bytes; the length must be exactly `width * height`.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FrameError> {
        let geometry = FrameGeometry::new(width, height)?;
        if pixels.len() != geometry.pixels_per_frame() {
            return Err(FrameError::PixelCount { width, height, have: pixels.len() });
        }
        Ok(Self { geometry, pixels })
    }

    /// Frame with every pixel set to `value`.
    pub fn filled(geometry: FrameGeometry, value: u8) -> Self {
        Self { geometry, pixels: vec![value; geometry.pixels_per_frame()] }
    }

    /// Caller guarantees `pixels.len() == geometry.pixels_per_frame()`.
    pub(crate) fn from_parts(geometry: FrameGeometry, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), geometry.pixels_per_frame());
        Self { geometry, pixels }
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    pub fn width(&self) -> u32 {
        self.geometry.width
    }

    pub fn height(&self) -> u32 {
        self.geometry.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.geometry.width || y >= self.geometry.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.geometry.width as usize + x as usize)
            .copied()
    }

    /// Row `y` as a slice.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.geometry.height {
            return None;
        }
        let w = self.geometry.width as usize;
        let start = y as usize * w;
        self.pixels.get(start..start + w)
    }
}

/// A fully decoded container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered {
    pub extension: String,
    pub payload: Vec<u8>,
}

/// What the caller should do with a recovered payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveredKind {
    /// Payload tagged with the text marker, decoded leniently.
    Text(String),
    /// Anything else: raw bytes destined for `file_name`.
    File { file_name: String },
}

impl Recovered {
    pub fn is_text(&self) -> bool {
        self.extension == TEXT_EXTENSION
    }

    pub fn kind(&self) -> RecoveredKind {
        if self.is_text() {
            RecoveredKind::Text(String::from_utf8_lossy(&self.payload).into_owned())
        } else {
            RecoveredKind::File { file_name: self.file_name() }
        }
    }

    /// `recovered_file` + extension, with path separators and NUL
    /// neutralised so the name always stays in the working directory.
    pub fn file_name(&self) -> String {
        let ext: String = self
            .extension
            .chars()
            .map(|c| match c {
                '/' | '\\' | '\0' => '_',
                other => other,
            })
            .collect();
        format!("{RECOVERED_FILE_PREFIX}{ext}")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Zero-sized or overflowing frame dimensions.
    #[error("invalid frame geometry: {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },

    /// Raw pixel buffer does not match its declared dimensions.
    #[error("frame pixel count mismatch: {width}x{height} frame got {have} pixels")]
    PixelCount { width: u32, height: u32, have: usize },

    /// A frame in the sequence does not match the session geometry.
    #[error("frame {index} has shape {actual}, expected {expected}")]
    Shape { index: u64, expected: FrameGeometry, actual: FrameGeometry },

    /// Not even a header's worth of bytes came out of the frames.
    #[error("insufficient data: recovered {have} bytes, header needs {need}")]
    InsufficientData { have: usize, need: usize },

    /// Payload too large to address as a bit cursor.
    #[error("payload too large to encode: {bytes} bytes")]
    PayloadTooLarge { bytes: usize },

    #[error(transparent)]
    Container(#[from] ContainerError),
}
