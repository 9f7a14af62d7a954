//! Styling for tree output.
//!
//! This module uses the anstyle ecosystem:
//! - anstyle for the style constants
//! - anstream (via [`crate::output::Stdout`]) for auto-detecting color support
//!
//! The helpers return strings with raw escape sequences embedded. Whether
//! those sequences reach the terminal is decided by the sink at write time,
//! so callers can style unconditionally.

use anstyle::{AnsiColor, Color, Style};
use color_print::cformat;

// ============================================================================
// Style Constants
// ============================================================================

/// Command invocation lines (`$ cmd args`)
pub const BOLD: Style = Style::new().bold();

/// Command output lines (`| ...`)
pub const DIM: Style = Style::new().dimmed();

/// Directory targets in `cd` notes
pub const CYAN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));

/// Problems worth flagging, typically inside a `moan`
pub const RED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));

/// Error emoji: `cformat!("{ERROR_EMOJI} <red>message</>")`
pub const ERROR_EMOJI: &str = "❌";

// ============================================================================
// Style Functions
// ============================================================================

fn paint(style: Style, text: impl AsRef<str>) -> String {
    format!("{style}{}{style:#}", text.as_ref())
}

/// Wrap `text` in the bold escape sequence.
pub fn bold(text: impl AsRef<str>) -> String {
    paint(BOLD, text)
}

/// Wrap `text` in the dim escape sequence.
pub fn dim(text: impl AsRef<str>) -> String {
    paint(DIM, text)
}

/// Wrap `text` in the cyan escape sequence.
pub fn cyan(text: impl AsRef<str>) -> String {
    paint(CYAN, text)
}

/// Wrap `text` in the red escape sequence.
pub fn red(text: impl AsRef<str>) -> String {
    paint(RED, text)
}

/// Format an error message with emoji and red styling
///
/// Content can include inner styling like `<bold>`:
/// ```ignore
/// error_message(cformat!("Command <bold>{cmd}</> failed"))
/// ```
pub fn error_message(content: impl AsRef<str>) -> String {
    cformat!("{ERROR_EMOJI} <red>{}</>", content.as_ref())
}
