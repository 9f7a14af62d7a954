//! Process-wide root sink
//!
//! This provides a logging-like API where a program picks its output sink
//! once, then asks for the top-level [`Log`] anywhere with [`root`]:
//!
//! ```rust,ignore
//! let _redirect = output::redirect(Arc::new(Stderr));
//! let step = output::root().note("Step 1")?;
//! ```
//!
//! # Implementation
//!
//! Two slots behind one `Mutex`:
//! - `installed`: the sink [`root`] hands out, `None` meaning plain stdout
//! - `saved`: the sink [`install`] replaced, restored by [`uninstall`]
//!
//! There is a single save slot. Calling [`install`] twice overwrites it, so
//! one [`uninstall`] then restores the *first* installed sink rather than
//! plain stdout. Scoped [`redirect`] guards each remember their own
//! predecessor and nest correctly.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::sink::{Sink, Stdout};
use super::tree::Log;

struct Slots {
    installed: Option<Arc<dyn Sink>>,
    saved: Option<Arc<dyn Sink>>,
}

static SLOTS: Mutex<Slots> = Mutex::new(Slots {
    installed: None,
    saved: None,
});

fn slots() -> MutexGuard<'static, Slots> {
    SLOTS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A depth-0 [`Log`] over the installed sink, or stdout if none is installed.
pub fn root() -> Log {
    match slots().installed.clone() {
        Some(sink) => Log::new(sink),
        None => Log::new(Arc::new(Stdout)),
    }
}

/// Make `sink` the process-wide root until [`uninstall`].
pub fn install(sink: Arc<dyn Sink>) {
    let mut slots = slots();
    slots.saved = slots.installed.replace(sink);
    log::debug!("Installed root sink (previous saved)");
}

/// [`install`] with an indenting stdout sink.
pub fn install_stdout() {
    install(Arc::new(Stdout));
}

/// Undo the effect of [`install`], emptying the save slot.
pub fn uninstall() {
    let mut slots = slots();
    slots.installed = slots.saved.take();
    log::debug!("Restored saved root sink");
}

/// Guard returned by [`redirect`]; restores the replaced sink on drop.
#[must_use = "the redirect ends as soon as the guard is dropped"]
pub struct Redirect {
    previous: Option<Arc<dyn Sink>>,
}

/// Route [`root`] to `sink` until the returned guard is dropped.
///
/// ```rust,ignore
/// {
///     let _redirect = output::redirect(capture.clone());
///     output::root().note("captured")?;
/// }
/// // root() is back to whatever it was before
/// ```
pub fn redirect(sink: Arc<dyn Sink>) -> Redirect {
    let previous = slots().installed.replace(sink);
    Redirect { previous }
}

impl Drop for Redirect {
    fn drop(&mut self) {
        slots().installed = self.previous.take();
    }
}
