//! Output module for console reporting
//!
//! This module handles:
//! - The overwritten progress line shown during both phases
//! - The statistics block and summary line printed at the end of a run

pub mod progress;
pub mod stats;

pub use progress::{ConsoleProgress, ProgressSink, SilentProgress};
pub use stats::{print_statistics, summary_line, RunStatistics};
