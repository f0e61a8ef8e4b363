use std::io;
use thiserror::Error;

use crate::{
    config::ConfigError,
    container::ContainerError,
    frames::FrameError,
    io::VideoError,
};

/// Unified error covering configuration, container, frame and video I/O.
/// - `From<T>` impls let `?` cross module boundaries.
/// - Every variant is terminal for the current encode or decode.
#[derive(Debug, Error)]
pub enum CarrierError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("video error: {0}")]
    Video(#[from] VideoError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CarrierError {
    /// Container errors surface either directly or through the frame decoder.
    pub fn container(&self) -> Option<&ContainerError> {
        match self {
            CarrierError::Container(e) | CarrierError::Frame(FrameError::Container(e)) => Some(e),
            _ => None,
        }
    }
}
