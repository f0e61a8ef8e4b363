//! utils.rs
//! Bit-level helpers shared by the frame encoder and decoder.
//!
//! Bit order is MSB-first within each byte, bytes in buffer order. This is
//! the single place that decides it.

use crate::constants::BITS_PER_BYTE;

/// Read bit `index` of `bytes`, MSB-first.
///
/// Caller guarantees `index < bytes.len() * 8`.
#[inline(always)]
pub fn bit_at(bytes: &[u8], index: usize) -> u8 {
    let byte = bytes[index / BITS_PER_BYTE];
    (byte >> (7 - (index % BITS_PER_BYTE))) & 1
}

/// Number of bits in a byte buffer.
#[inline]
pub fn bit_len(bytes: &[u8]) -> u64 {
    bytes.len() as u64 * BITS_PER_BYTE as u64
}

/// `ceil(n / d)` for `d > 0`.
#[inline]
pub fn ceil_div(n: u64, d: u64) -> u64 {
    debug_assert!(d > 0, "ceil_div by zero");
    n / d + u64::from(n % d != 0)
}

/// Incremental MSB-first bit packer.
///
/// Bits are folded into bytes as they arrive so the decoder never holds an
/// 8x expanded bit buffer. Only complete bytes are ever exposed.
#[derive(Debug, Default, Clone)]
pub struct BitPacker {
    bytes: Vec<u8>,
    pending: u8,
    pending_bits: u8,
}

impl BitPacker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self { bytes: Vec::with_capacity(bytes), ..Self::default() }
    }

    #[inline(always)]
    pub fn push_bit(&mut self, bit: bool) {
        self.pending = (self.pending << 1) | u8::from(bit);
        self.pending_bits += 1;
        if self.pending_bits as usize == BITS_PER_BYTE {
            self.bytes.push(self.pending);
            self.pending = 0;
            self.pending_bits = 0;
        }
    }

    /// Complete bytes packed so far.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bits waiting for a full byte.
    pub fn pending_bits(&self) -> u8 {
        self.pending_bits
    }

    /// Total bits pushed (complete bytes + pending).
    pub fn bit_count(&self) -> u64 {
        bit_len(&self.bytes) + u64::from(self.pending_bits)
    }

    /// Consume the packer, dropping any incomplete trailing byte.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Render bytes for logs and error messages: printable ASCII as a byte
/// string, anything else as hex.
pub fn fmt_bytes(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}
