//! In-memory frame sink and source, for tests and for callers that hand
//! frames to their own video stack.

use std::collections::VecDeque;

use crate::frames::GrayFrame;
use crate::io::{FrameSink, FrameSource, VideoError};

#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    frames: Vec<GrayFrame>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[GrayFrame] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_frames(self) -> Vec<GrayFrame> {
        self.frames
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, frame: &GrayFrame) -> Result<(), VideoError> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), VideoError> {
        self.finished = true;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    frames: VecDeque<GrayFrame>,
}

impl MemorySource {
    pub fn new(frames: impl IntoIterator<Item = GrayFrame>) -> Self {
        Self { frames: frames.into_iter().collect() }
    }
}

impl From<Vec<GrayFrame>> for MemorySource {
    fn from(frames: Vec<GrayFrame>) -> Self {
        Self { frames: frames.into() }
    }
}

impl FrameSource for MemorySource {
    fn read_frame(&mut self) -> Result<Option<GrayFrame>, VideoError> {
        Ok(self.frames.pop_front())
    }

    fn remaining_hint(&self) -> Option<u64> {
        Some(self.frames.len() as u64)
    }
}
