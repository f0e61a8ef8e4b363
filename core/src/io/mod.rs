// ## Frame I/O: sinks, sources, and the concrete video containers behind them.
//
// The codec only ever sees `FrameSink` and `FrameSource`. Compression and
// muxing belong to whatever sits behind them.

use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use thiserror::Error;

use crate::frames::{FrameError, GrayFrame};

pub mod memory;
pub mod y4m;

pub use memory::{MemorySink, MemorySource};
pub use y4m::{Colorspace, Y4mHeader, Y4mReader, Y4mWriter};

/// Accepts frames in call order at a fixed geometry and rate.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &GrayFrame) -> Result<(), VideoError>;

    /// Flush and close. Called once after the last frame.
    fn finish(&mut self) -> Result<(), VideoError> {
        Ok(())
    }
}

/// Yields frames until exhausted.
pub trait FrameSource {
    /// `Ok(None)` marks a clean end of stream.
    fn read_frame(&mut self) -> Result<Option<GrayFrame>, VideoError>;

    /// Frames left, when the source knows.
    fn remaining_hint(&self) -> Option<u64> {
        None
    }

    /// Pull frames through an iterator.
    fn frames(&mut self) -> Frames<'_, Self>
    where
        Self: Sized,
    {
        Frames { source: self, done: false }
    }
}

/// Iterator over a `FrameSource`. Stops after the first error.
pub struct Frames<'a, S: FrameSource> {
    source: &'a mut S,
    done: bool,
}

impl<S: FrameSource> Iterator for Frames<'_, S> {
    type Item = Result<GrayFrame, VideoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.source.read_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
}

/// Normalize input source into a buffered reader
pub fn open_input(src: InputSource) -> Result<Box<dyn BufRead + Send>, VideoError> {
    let reader: Box<dyn BufRead + Send> = match src {
        InputSource::Reader(r) => Box::new(BufReader::new(r)),
        InputSource::File(p) => Box::new(BufReader::new(std::fs::File::open(p)?)),
        InputSource::Memory(b) => Box::new(std::io::Cursor::new(b)),
    };
    Ok(reader)
}

/// Normalize output sink into a buffered writer
pub fn open_output(sink: OutputSink) -> Result<Box<dyn Write + Send>, VideoError> {
    let writer: Box<dyn Write + Send> = match sink {
        OutputSink::Writer(w) => Box::new(BufWriter::new(w)),
        OutputSink::File(p) => Box::new(BufWriter::new(std::fs::File::create(p)?)),
    };
    Ok(writer)
}

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("video I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a YUV4MPEG2 stream")]
    BadSignature,

    #[error("stream header is missing the {0} parameter")]
    MissingParameter(char),

    #[error("invalid stream header parameter: {0}")]
    InvalidParameter(String),

    #[error("unsupported colourspace: {0}")]
    UnsupportedColorspace(String),

    #[error("invalid frame rate {0}")]
    InvalidFrameRate(f64),

    #[error("frame {index}: missing FRAME marker")]
    BadFrameMarker { index: u64 },

    #[error("frame {index}: stream ended mid-frame")]
    TruncatedFrame { index: u64 },

    #[error(transparent)]
    Frame(#[from] FrameError),
}
