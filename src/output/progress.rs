//! Progress reporting for both crawl phases
//!
//! Reporters are shared by concurrently running tasks, so every sink is
//! `Send + Sync` and takes `&self`.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Width the overwritten progress line is padded to
const LINE_WIDTH: usize = 100;

/// Receives progress events from the crawl and download phases
pub trait ProgressSink: Send + Sync {
    /// Called after a URL is newly claimed; `count` is the frontier size
    fn urls_found(&self, count: usize);

    /// Called once per page after image extraction with the running total
    fn images_found(&self, count: usize);

    /// Called after every image attempt, successful or not
    fn image_attempted(&self, done: usize, total: usize, host: &str, file_name: &str);

    /// Called at the end of a phase
    fn finish(&self);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn urls_found(&self, _count: usize) {}
    fn images_found(&self, _count: usize) {}
    fn image_attempted(&self, _done: usize, _total: usize, _host: &str, _file_name: &str) {}
    fn finish(&self) {}
}

/// Writes a single overwritten status line, to stdout by default
///
/// Counts only move forward: a reporter that arrives late with a smaller
/// count than one already shown is dropped.
pub struct ConsoleProgress {
    shown: Mutex<Shown>,
}

struct Shown {
    urls: usize,
    images: usize,
    attempts: usize,
    dirty: bool,
    out: Box<dyn Write + Send>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            shown: Mutex::new(Shown {
                urls: 0,
                images: 0,
                attempts: 0,
                dirty: false,
                out: Box::new(out),
            }),
        }
    }

    fn update(&self, advance: impl FnOnce(&mut Shown) -> Option<String>) {
        // Writing while holding the lock keeps the line order consistent
        // with the counters
        let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(text) = advance(&mut *shown) {
            shown.dirty = true;
            write_carriage_return(&mut shown.out, &text);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleProgress").finish_non_exhaustive()
    }
}

impl ProgressSink for ConsoleProgress {
    fn urls_found(&self, count: usize) {
        self.update(|shown| {
            (count > shown.urls).then(|| {
                shown.urls = count;
                format!("Found {} urls..", count)
            })
        });
    }

    fn images_found(&self, count: usize) {
        self.update(|shown| {
            (count >= shown.images).then(|| {
                shown.images = count;
                format!("Found {} urls with images..", count)
            })
        });
    }

    fn image_attempted(&self, done: usize, total: usize, host: &str, file_name: &str) {
        self.update(|shown| {
            (done > shown.attempts).then(|| {
                shown.attempts = done;
                format!("{}/{} | Downloaded from {} {}..", done, total, host, file_name)
            })
        });
    }

    fn finish(&self) {
        let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        if shown.dirty {
            let _ = writeln!(shown.out);
            let _ = shown.out.flush();
            shown.dirty = false;
        }
    }
}

fn write_carriage_return(out: &mut dyn Write, text: &str) {
    // Progress output is best effort; a closed stdout must not stop a crawl
    let _ = write!(out, "\r{:<width$}", text, width = LINE_WIDTH);
    let _ = out.flush();
}
