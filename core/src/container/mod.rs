//! Container format: fixed header + payload bytes.
//!
//! Responsibilities:
//! - Define the 72-byte header
//! - Serialize header and payload into the bitstream's byte form
//! - Parse headers and slice payloads with strict bounds checks
//!
//! Non-responsibilities:
//! - Pixels and frames
//! - IO
//! - Checksums or encryption (the payload is opaque)

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{
    ContainerError,
    ContainerHeader,
};
pub use encode::{
    build_container,
    encode_header_le,
    serialize_header,
};
pub use decode::{
    decode_container,
    decode_header_le,
    extract_payload,
    parse_header,
};
