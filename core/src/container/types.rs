//! container/types.rs
//! Container header struct and its error type.
//!
//! Layout notes:
//! - Fixed 72-byte header: `payload_length` (u64, little-endian) followed by
//!   a 64-byte null-padded UTF-8 extension tag.
//! - The payload follows immediately, `payload_length` bytes, no checksum.
//! - Field order must match `encode.rs` and `decode.rs` exactly.

use std::fmt;
use thiserror::Error;

use crate::constants::{BITS_PER_BYTE, EXTENSION_TAG_LEN, HEADER_LEN};
use crate::utils::fmt_bytes;

/// Container header as carried at the front of every bitstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Bytes in the payload only, header excluded.
    pub payload_length: u64,
    /// UTF-8 extension (leading `.` included), null-padded.
    pub extension_tag: [u8; EXTENSION_TAG_LEN],
}

impl ContainerHeader {
    /// Build a header, truncating the extension's UTF-8 bytes to 64.
    ///
    /// Truncation is lossy but not an error; it may split a multi-byte
    /// character, which then decodes as U+FFFD.
    pub fn new(payload_length: u64, extension: &str) -> Self {
        let raw = extension.as_bytes();
        if raw.len() > EXTENSION_TAG_LEN {
            tracing::warn!(
                len = raw.len(),
                max = EXTENSION_TAG_LEN,
                "extension tag truncated"
            );
        }
        let n = raw.len().min(EXTENSION_TAG_LEN);
        let mut extension_tag = [0u8; EXTENSION_TAG_LEN];
        extension_tag[..n].copy_from_slice(&raw[..n]);
        Self { payload_length, extension_tag }
    }

    /// Tag bytes with the null padding removed from the right.
    pub fn extension_bytes(&self) -> &[u8] {
        let end = self
            .extension_tag
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |i| i + 1);
        &self.extension_tag[..end]
    }

    /// Decoded extension. Invalid UTF-8 is replaced, never rejected.
    pub fn extension(&self) -> String {
        let raw = self.extension_bytes();
        match std::str::from_utf8(raw) {
            Ok(s) => s.to_owned(),
            Err(_) => {
                tracing::warn!(tag = %fmt_bytes(raw), "extension tag is not valid UTF-8");
                String::from_utf8_lossy(raw).into_owned()
            }
        }
    }

    /// Header + payload size in bytes. `None` when the declared length
    /// cannot be represented, as in a header read from all-white pixels.
    pub fn container_len(&self) -> Option<u64> {
        (HEADER_LEN as u64).checked_add(self.payload_length)
    }

    /// Bits the encoder must place for header + payload.
    pub fn bitstream_bits(&self) -> Option<u64> {
        self.container_len()?.checked_mul(BITS_PER_BYTE as u64)
    }

    pub fn summary(&self) -> String {
        format!(
            "payload_length={} extension={}",
            self.payload_length,
            fmt_bytes(self.extension_bytes())
        )
    }
}

impl fmt::Display for ContainerHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContainerError {
    /// Fewer than 72 bytes supplied where a header was expected.
    #[error("container header too short: {have} < {need}")]
    HeaderTooShort { have: usize, need: usize },

    /// The header claims more payload than the bitstream carries.
    #[error("payload truncated: header declares {declared} bytes, {available} available")]
    TruncatedPayload { declared: u64, available: usize },
}
