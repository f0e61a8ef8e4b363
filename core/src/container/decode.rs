//! container/decode.rs
//!
//! Header parsing and payload extraction.
//!
//! Design notes:
//! - Every read is an explicit field-offset slice behind a length check;
//!   nothing is read in bulk and nothing indexes past the buffer.
//! - A header that promises more payload than exists is an error, never a
//!   silently clamped payload.

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::{EXTENSION_TAG_LEN, HEADER_LEN, PAYLOAD_LEN_FIELD};
use crate::container::types::{ContainerError, ContainerHeader};

/// Deserialize the first 72 bytes of `buf` into a `ContainerHeader`.
#[inline]
pub fn decode_header_le(buf: &[u8]) -> Result<ContainerHeader, ContainerError> {
    if buf.len() < HEADER_LEN {
        return Err(ContainerError::HeaderTooShort { have: buf.len(), need: HEADER_LEN });
    }

    let mut off = 0usize;

    let payload_length = LittleEndian::read_u64(&buf[off..off + PAYLOAD_LEN_FIELD]); // 0..8
    off += PAYLOAD_LEN_FIELD;

    let mut extension_tag = [0u8; EXTENSION_TAG_LEN];
    extension_tag.copy_from_slice(&buf[off..off + EXTENSION_TAG_LEN]);               // 8..72
    off += EXTENSION_TAG_LEN;

    debug_assert_eq!(off, HEADER_LEN);

    Ok(ContainerHeader { payload_length, extension_tag })
}

/// `parse_header(bytes)`: payload length and trimmed extension.
pub fn parse_header(buf: &[u8]) -> Result<(u64, String), ContainerError> {
    let h = decode_header_le(buf)?;
    Ok((h.payload_length, h.extension()))
}

/// `extract_payload(full_bytes, payload_length)`: the `payload_length` bytes
/// at offset 72. Bytes past the payload are ignored.
pub fn extract_payload(full: &[u8], payload_length: u64) -> Result<&[u8], ContainerError> {
    let available = full.len().saturating_sub(HEADER_LEN);
    let truncated = ContainerError::TruncatedPayload { declared: payload_length, available };

    let len = usize::try_from(payload_length).map_err(|_| truncated.clone())?;
    if len > available {
        return Err(truncated);
    }

    Ok(&full[HEADER_LEN..HEADER_LEN + len])
}

/// Parse a whole container: header plus a borrowed view of the payload.
pub fn decode_container(full: &[u8]) -> Result<(ContainerHeader, &[u8]), ContainerError> {
    let header = decode_header_le(full)?;
    let payload = extract_payload(full, header.payload_length)?;
    Ok((header, payload))
}
