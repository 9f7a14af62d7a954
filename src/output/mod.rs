//! Output layer: indented tree rendering.
//!
//! # Architecture
//!
//! - [`Sink`]: where text ends up (stdout, stderr, an in-memory [`Capture`])
//! - [`Log`]: an indenting writer over a shared sink, carrying its own depth
//! - [`Section`]: a scoped handle one level deeper, ended by dropping it
//! - [`root`]: the process-wide top-level `Log`, switchable with
//!   [`redirect`] or [`install`]/[`uninstall`]
//!
//! ## Usage Pattern
//!
//! ```rust,ignore
//! let log = output::root();
//! let step = log.note("Doing steps...")?;
//! step.run(&Cmd::new(["./step-1", "--flag"])).await?;
//! {
//!     let cleanup = step.note("Cleaning up...")?;
//!     let build = cleanup.cd("./step-2-build")?;
//!     build.run(&Cmd::new(["rm", "-rf", "tmp"])).await?;
//! }
//! ```
//!
//! renders as
//!
//! ```text
//! * Doing steps...
//!   $ ./step-1 --flag
//!     | ...
//!   * Cleaning up...
//!     * Entering /work/step-2-build.
//!       $ rm -rf tmp
//! ```

pub mod global;
mod sink;
mod tree;

pub use global::{Redirect, install, install_stdout, redirect, root, uninstall};
pub use sink::{Capture, Sink, Stderr, Stdout};
pub use tree::{
    COMMAND_PREFIX, INDENT, Log, MOAN_PREFIX, NOTE_PREFIX, OUTPUT_PREFIX, Section, indent,
};
