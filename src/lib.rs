//! Render the output of a program and the commands it runs as an indented
//! tree of sections.
//!
//! ```rust,no_run
//! use logtree::{Cmd, output};
//!
//! # async fn go() -> logtree::Result<()> {
//! let log = output::root();
//! {
//!     let check = log.note("System check.")?;
//!     {
//!         let epoch = check.note("Checking epoch date.")?;
//!         epoch.run(&Cmd::new(["date", "-u"])).await?;
//!     }
//!     check.note("System check done.")?;
//! }
//! let proc = log.cd("/proc")?;
//! proc.run(&Cmd::new(["wc", "-l", "modules"])).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ```text
//! * System check.
//!   * Checking epoch date.
//!     $ date -u
//!       | Thu Jan  1 00:00:00 UTC 1970
//!   * System check done.
//! * Entering /proc.
//!   $ wc -l modules
//!     | 204 modules
//! ```

pub mod cwd;
pub mod error;
pub mod output;
pub mod path;
pub mod plan;
pub mod shell_exec;
pub mod styling;

pub use cwd::Cd;
pub use error::{Error, Result};
pub use output::{Capture, Log, Section, Sink};
pub use plan::Plan;
pub use shell_exec::Cmd;
