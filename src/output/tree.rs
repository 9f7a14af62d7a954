//! The indenting writer and its sections.
//!
//! A [`Log`] is a cheap handle: a shared [`Sink`] plus the nesting depth the
//! handle writes at. Entering a section never mutates the handle it came
//! from; it hands back a [`Section`] carrying a handle one level deeper.
//! Dropping the section is what ends it, so the depth a caller sees after a
//! section is always the depth it had before, whatever path the body took.

use std::fmt;
use std::io;
use std::ops::Deref;
use std::sync::Arc;

use super::sink::{Sink, Stdout};

/// Indentation emitted per nesting level
pub const INDENT: &str = "  ";

/// Marker for plain notes
pub const NOTE_PREFIX: &str = "* ";

/// Marker for notes that flag a problem
pub const MOAN_PREFIX: &str = "! ";

/// Marker for echoed command invocations
pub const COMMAND_PREFIX: &str = "$ ";

/// Marker for lines captured from a command's stdout or stderr
pub const OUTPUT_PREFIX: &str = "| ";

/// Whitespace prefix for a line written at `depth`.
pub fn indent(depth: usize) -> String {
    INDENT.repeat(depth)
}

/// Indenting writer over a shared sink
///
/// Every write is prefixed with [`INDENT`] repeated [`Log::depth`] times and
/// forwarded to the sink in a single call. Text is not split on newlines:
/// only the start of each write gets the prefix.
#[derive(Clone)]
pub struct Log {
    sink: Arc<dyn Sink>,
    depth: usize,
}

impl Log {
    /// A top-level handle writing to `sink`.
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink, depth: 0 }
    }

    /// A top-level handle writing to process stdout.
    pub fn stdout() -> Self {
        Self::new(Arc::new(Stdout))
    }

    /// Number of sections enclosing this handle.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    /// Write `s` behind the current indentation.
    pub fn write(&self, s: &str) -> io::Result<()> {
        let mut chunk = indent(self.depth);
        chunk.push_str(s);
        self.sink.write_str(&chunk)
    }

    /// Write `s` as a full line behind the current indentation.
    pub fn line(&self, s: impl AsRef<str>) -> io::Result<()> {
        let s = s.as_ref();
        let mut chunk = String::with_capacity(self.depth * INDENT.len() + s.len() + 1);
        chunk.push_str(&indent(self.depth));
        chunk.push_str(s);
        chunk.push('\n');
        self.sink.write_str(&chunk)
    }

    /// Emit an empty line (no indentation, so no trailing whitespace).
    pub fn blank(&self) -> io::Result<()> {
        self.sink.write_str("\n")
    }

    pub fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Open a section one level deeper than this handle.
    pub fn enter(&self) -> Section {
        Section {
            log: Log {
                sink: Arc::clone(&self.sink),
                depth: self.depth + 1,
            },
        }
    }

    /// Write `{prefix}{message}` at the current depth and open a section
    /// beneath it.
    ///
    /// Drop the returned section right away to use this as a plain message.
    pub fn note_with(&self, prefix: &str, message: impl fmt::Display) -> io::Result<Section> {
        self.line(format!("{prefix}{message}"))?;
        Ok(self.enter())
    }

    /// Note a message and open a section beneath it.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use logtree::{Capture, Log};
    /// # let capture = Arc::new(Capture::new());
    /// # let log = Log::new(capture.clone());
    /// let task = log.note("Starting task A.")?;
    /// task.note("Looks good...")?;
    /// # assert_eq!(capture.plain(), "* Starting task A.\n  * Looks good...\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn note(&self, message: impl fmt::Display) -> io::Result<Section> {
        self.note_with(NOTE_PREFIX, message)
    }

    /// Like [`Log::note`] with the `"! "` marker.
    pub fn moan(&self, message: impl fmt::Display) -> io::Result<Section> {
        self.note_with(MOAN_PREFIX, message)
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log").field("depth", &self.depth).finish()
    }
}

impl fmt::Write for Log {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Log::write(self, s).map_err(|_| fmt::Error)
    }

    // One sink write per `write!` call rather than one per formatted piece
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        Log::write(self, &args.to_string()).map_err(|_| fmt::Error)
    }
}

/// An open section
///
/// Derefs to the [`Log`] for output nested inside it. The section ends when
/// this value is dropped.
#[derive(Debug, Clone)]
pub struct Section {
    log: Log,
}

impl Section {
    /// The handle for output inside this section, e.g. to move into a task.
    pub fn log(&self) -> &Log {
        &self.log
    }
}

impl Deref for Section {
    type Target = Log;

    fn deref(&self) -> &Log {
        &self.log
    }
}
