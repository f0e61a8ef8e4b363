//! container/encode.rs
//!
//! Header serialization.
//!
//! Design notes:
//! - Serializes `ContainerHeader` into a fixed 72-byte buffer.
//! - `payload_length` is little-endian on every platform.
//! - Field order must match `decode.rs` exactly.

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::{EXTENSION_TAG_LEN, HEADER_LEN, PAYLOAD_LEN_FIELD};
use crate::container::types::ContainerHeader;

/// Serialize a header into its 72-byte wire form.
#[inline]
pub fn encode_header_le(h: &ContainerHeader) -> [u8; HEADER_LEN] {
    let mut out = [0u8; HEADER_LEN];
    let mut i = 0usize;

    LittleEndian::write_u64(&mut out[i..i + PAYLOAD_LEN_FIELD], h.payload_length); // 0..8  payload_length
    i += PAYLOAD_LEN_FIELD;
    out[i..i + EXTENSION_TAG_LEN].copy_from_slice(&h.extension_tag);              // 8..72 extension_tag
    i += EXTENSION_TAG_LEN;

    debug_assert_eq!(i, HEADER_LEN, "encoding wrote incorrect length");
    out
}

/// `serialize_header(payload_length, extension)`: build and encode in one step.
pub fn serialize_header(payload_length: u64, extension: &str) -> [u8; HEADER_LEN] {
    encode_header_le(&ContainerHeader::new(payload_length, extension))
}

/// Header followed by payload, the byte form of the bitstream.
pub fn build_container(payload: &[u8], extension: &str) -> Vec<u8> {
    let header = serialize_header(payload.len() as u64, extension);
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&header);
    out.extend_from_slice(payload);
    out
}
