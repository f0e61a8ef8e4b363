//! static-carrier-cli
//!
//! Command-line surface over `static-carrier-core`: argument parsing, a
//! terminal progress bar, and the encode/decode commands.

pub mod args;
pub mod bar;
pub mod run;

pub use args::{CarrierArgs, Mode};
