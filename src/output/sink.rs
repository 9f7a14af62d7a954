//! Destinations for tree output.
//!
//! The fundamental operation is [`Sink::write_str`]: implementations decide
//! where text goes. Every call carries one already-indented chunk (normally
//! a whole line), so a sink that serializes calls never tears lines even
//! when several reader tasks write at once.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use ansi_str::AnsiStr;

/// A shared, thread-safe text destination
pub trait Sink: Send + Sync {
    /// Write one chunk of text
    fn write_str(&self, s: &str) -> io::Result<()>;

    /// Flush output buffers
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Process stdout, with color auto-detection
///
/// Respects NO_COLOR, CLICOLOR_FORCE, and terminal capabilities: escape
/// sequences are stripped when stdout is not a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

impl Sink for Stdout {
    fn write_str(&self, s: &str) -> io::Result<()> {
        let mut out = anstream::stdout().lock();
        out.write_all(s.as_bytes())?;
        // Stream as we go; commands can run for a long time
        out.flush()
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Process stderr, with color auto-detection
#[derive(Debug, Clone, Copy, Default)]
pub struct Stderr;

impl Sink for Stderr {
    fn write_str(&self, s: &str) -> io::Result<()> {
        let mut err = anstream::stderr().lock();
        err.write_all(s.as_bytes())?;
        err.flush()
    }

    fn flush(&self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// In-memory sink that keeps everything written to it
///
/// ```
/// use std::sync::Arc;
/// use logtree::{Capture, Log};
///
/// let capture = Arc::new(Capture::new());
/// let log = Log::new(capture.clone());
/// let _step = log.note("Step 1").unwrap();
/// assert_eq!(capture.plain(), "* Step 1\n");
/// ```
#[derive(Debug, Default)]
pub struct Capture {
    buf: Mutex<String>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, escape sequences included
    pub fn contents(&self) -> String {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Everything written so far with ANSI escape sequences removed
    pub fn plain(&self) -> String {
        self.contents().ansi_strip().into_owned()
    }

    /// The plain contents split into lines
    pub fn lines(&self) -> Vec<String> {
        self.plain().lines().map(str::to_owned).collect()
    }
}

impl Sink for Capture {
    fn write_str(&self, s: &str) -> io::Result<()> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(s);
        Ok(())
    }
}
