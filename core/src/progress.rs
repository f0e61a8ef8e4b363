//! progress.rs
//! Per-frame progress reporting.
//!
//! The codec reports after each frame is fully emitted or consumed. How
//! that is shown (terminal bar, log line, nothing) is the caller's choice.

/// Receives `(done, total)` after every frame. `total` is `None` when the
/// frame source cannot say how many frames it holds.
pub trait ProgressSink {
    fn on_frame(&mut self, done: u64, total: Option<u64>);

    /// Called once after the last frame.
    fn on_finish(&mut self) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    #[inline]
    fn on_frame(&mut self, _done: u64, _total: Option<u64>) {}
}

impl<P: ProgressSink + ?Sized> ProgressSink for &mut P {
    fn on_frame(&mut self, done: u64, total: Option<u64>) {
        (**self).on_frame(done, total)
    }

    fn on_finish(&mut self) {
        (**self).on_finish()
    }
}

/// Closure adapter: `FnProgress(|done, total| ...)`.
pub struct FnProgress<F>(pub F);

impl<F: FnMut(u64, Option<u64>)> ProgressSink for FnProgress<F> {
    fn on_frame(&mut self, done: u64, total: Option<u64>) {
        (self.0)(done, total)
    }
}
