//! Single-line terminal progress bar on stderr.

use std::io::{self, Write};

use static_carrier_core::progress::ProgressSink;

const BAR_WIDTH: usize = 40;
const FILL: char = '█';
const EMPTY: char = '-';

/// Render one bar line (no carriage return).
///
/// With a known total: `Encoding: |████----| 50% (5/10 frames)`.
/// Without one only the running count is shown.
pub fn render(prefix: &str, done: u64, total: Option<u64>) -> String {
    match total {
        Some(total) if total > 0 => {
            let done = done.min(total);
            let filled = (BAR_WIDTH as u64 * done / total) as usize;
            let percent = 100 * done / total;
            let bar: String = std::iter::repeat(FILL)
                .take(filled)
                .chain(std::iter::repeat(EMPTY).take(BAR_WIDTH - filled))
                .collect();
            format!("{prefix}: |{bar}| {percent}% ({done}/{total} frames)")
        }
        _ => format!("{prefix}: {done} frames"),
    }
}

pub struct TerminalProgress {
    prefix: &'static str,
    enabled: bool,
    drawn: bool,
}

impl TerminalProgress {
    pub fn new(prefix: &'static str, enabled: bool) -> Self {
        Self { prefix, enabled, drawn: false }
    }
}

impl ProgressSink for TerminalProgress {
    fn on_frame(&mut self, done: u64, total: Option<u64>) {
        if !self.enabled {
            return;
        }
        let mut err = io::stderr().lock();
        // A broken stderr is not worth failing the run over.
        let _ = write!(err, "\r{}", render(self.prefix, done, total));
        let _ = err.flush();
        self.drawn = true;
    }

    fn on_finish(&mut self) {
        if self.drawn {
            eprintln!();
        }
    }
}
