//! Shared test helpers.
#![allow(dead_code)]

use std::process::Command;
use std::sync::Arc;

use logtree::{Capture, Log};
use rstest::fixture;

/// A depth-0 [`Log`] writing into an in-memory capture
pub struct TestTree {
    pub capture: Arc<Capture>,
    pub log: Log,
}

impl TestTree {
    pub fn new() -> Self {
        let capture = Arc::new(Capture::new());
        let log = Log::new(capture.clone());
        Self { capture, log }
    }

    /// Captured output as plain lines (styles stripped)
    pub fn lines(&self) -> Vec<String> {
        self.capture.lines()
    }
}

#[fixture]
pub fn tree() -> TestTree {
    TestTree::new()
}

/// Number of leading spaces on `line`
pub fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// The built `logtree` binary, uncolored and without diagnostic logging
pub fn logtree_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_logtree"));
    cmd.env("NO_COLOR", "1")
        .env_remove("CLICOLOR_FORCE")
        .env_remove("RUST_LOG");
    cmd
}
