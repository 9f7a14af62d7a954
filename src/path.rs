use std::io;
use std::path::{Path, PathBuf};

use normalize_path::NormalizePath;

/// Absolute form of `path`, resolved lexically against the current directory.
///
/// `.` and `..` components are folded without touching the filesystem, so
/// the result is meaningful for directories that don't exist (yet) and
/// symlinks are not expanded.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.normalize());
    }
    Ok(std::env::current_dir()?.join(path).normalize())
}
