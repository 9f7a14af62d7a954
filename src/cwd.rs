//! Verbose working-directory scopes.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::output::{Log, Section};
use crate::path::absolute;
use crate::styling::cyan;

/// Guard returned by [`Log::cd`]
///
/// Derefs to the [`Log`] of the section opened by the `Entering ...` note.
/// Dropping it changes the process working directory back to where it was
/// when the scope was entered.
#[must_use = "the previous directory is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct Cd {
    previous: PathBuf,
    section: Section,
}

impl Cd {
    /// Directory that will be restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Deref for Cd {
    type Target = Log;

    fn deref(&self) -> &Log {
        &self.section
    }
}

impl Drop for Cd {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            log::warn!(
                "Failed to restore working directory {}: {e}",
                self.previous.display()
            );
        }
    }
}

impl Log {
    /// Verbosely enter a working directory for the lifetime of the guard.
    ///
    /// ```rust,ignore
    /// let proc = log.cd("/proc")?;
    /// proc.run(&Cmd::new(["wc", "-l", "modules"])).await?;
    /// ```
    ///
    /// ```text
    /// * Entering /proc.
    ///   $ wc -l modules
    ///     | 204 modules
    /// ```
    ///
    /// If the directory can't be entered the note is still written, the
    /// error is returned, and the working directory is left untouched.
    pub fn cd(&self, path: impl AsRef<Path>) -> Result<Cd> {
        let path = path.as_ref();
        let previous = std::env::current_dir()?;
        let target = absolute(path)?;

        let section = self.note(format_args!("Entering {}.", cyan(target.display().to_string())))?;
        std::env::set_current_dir(path).map_err(|source| Error::ChangeDir {
            path: target.clone(),
            source,
        })?;
        log::debug!("Changed directory to {}", target.display());

        Ok(Cd { previous, section })
    }
}
