//! Error types for tree output and command execution.
//!
//! [`Error`] is a typed enum so callers can pattern-match the failure they
//! care about (most often [`Error::CommandFailed`]) and still use `?` into
//! `anyhow::Error` at the top of a program.

use std::io;
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced by [`crate::Log`] operations.
///
/// # Usage
///
/// ```ignore
/// match log.run(&Cmd::new(["make", "test"])).await {
///     Err(Error::CommandFailed { command, .. }) => log.moan(format!("{} failed", command[0]))?,
///     other => other.map(drop)?,
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A checked command exited unsuccessfully
    #[error("command failed: {}", .command.join(" "))]
    CommandFailed {
        /// The argument vector as requested, program first
        command: Vec<String>,
        /// Exit code, `None` when the process was terminated by a signal
        code: Option<i32>,
    },

    /// The program could not be launched (not found, not executable, ...)
    #[error("failed to spawn {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// `cd` could not enter the requested directory
    #[error("cannot enter {}", .path.display())]
    ChangeDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A command was requested with no program
    #[error("empty command")]
    EmptyCommand,

    /// A plan file could not be read
    #[error("cannot read plan {}", .path.display())]
    ReadPlan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A plan document could not be parsed
    #[error("invalid plan: {0}")]
    Plan(String),

    /// Writing to the sink or reading child output failed
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// The argument vector of a failed command, if this is a command failure.
    pub fn command(&self) -> Option<&[String]> {
        match self {
            Error::CommandFailed { command, .. } => Some(command),
            _ => None,
        }
    }
}
