//! Command execution with output captured into the tree
//!
//! Commands are argument vectors passed straight to process creation: no
//! shell is involved, so nothing is globbed, expanded, or split.
//!
//! Each run spawns the child with stdout and stderr piped separately and
//! drains both through two reader tasks on the tokio runtime. Neither reader
//! waits on the other, so a quiet stderr never holds back stdout lines (and
//! vice versa). Lines keep their order within a stream; how the two streams
//! interleave is up to the scheduler.

use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::{JoinError, JoinSet};

use crate::error::{Error, Result};
use crate::output::{COMMAND_PREFIX, Log, OUTPUT_PREFIX};
use crate::styling::{bold, dim};

/// How long readers may keep draining once the child has exited.
///
/// Output the child wrote before exiting is still sitting in the pipes; this
/// window lets the readers emit it. Readers still pending afterwards (a
/// grandchild holding the pipe open, typically) are aborted.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// A command to run through [`Log::run`]
///
/// ```
/// use logtree::Cmd;
///
/// let cmd = Cmd::new(["printenv", "FOO"]).env("FOO", "BAR").check(false);
/// assert_eq!(cmd.to_string(), "printenv FOO");
/// ```
#[derive(Debug, Clone)]
pub struct Cmd {
    argv: Vec<String>,
    check: bool,
    quiet: bool,
    env: Vec<(String, String)>,
    current_dir: Option<PathBuf>,
}

impl Cmd {
    /// A command from its argument vector, program first.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            check: true,
            quiet: false,
            env: Vec::new(),
            current_dir: None,
        }
    }

    /// Fail with [`Error::CommandFailed`] on unsuccessful exit (default `true`).
    pub fn check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Skip the `$ cmd` line and its section (default `false`).
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set an extra environment variable on top of the inherited environment.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Set several extra environment variables.
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Run in `dir` instead of the process working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

impl std::fmt::Display for Cmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}

impl Log {
    /// Run a command inside a new section.
    ///
    /// Writes `$ {command}` (bold) at the current depth, then streams the
    /// child's stdout and stderr one level beneath it as dim `| line`
    /// entries. With [`Cmd::quiet`] nothing is announced and output lands at
    /// the current depth.
    ///
    /// Returns whether the command exited successfully. With [`Cmd::check`]
    /// (the default) an unsuccessful exit is an [`Error::CommandFailed`]
    /// instead.
    pub async fn run(&self, cmd: &Cmd) -> Result<bool> {
        if cmd.quiet {
            return self.exec(cmd).await;
        }
        let section = self.note_with(COMMAND_PREFIX, bold(cmd.to_string()))?;
        section.exec(cmd).await
    }

    async fn exec(&self, cmd: &Cmd) -> Result<bool> {
        let (program, args) = cmd.argv.split_first().ok_or(Error::EmptyCommand)?;

        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .envs(cmd.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &cmd.current_dir {
            command.current_dir(dir);
        }

        log::debug!("Spawning: {cmd}");
        let mut child = command.spawn().map_err(|source| Error::Spawn {
            program: program.clone(),
            source,
        })?;

        let mut readers = JoinSet::new();
        if let Some(stdout) = child.stdout.take() {
            readers.spawn(pump(stdout, self.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.spawn(pump(stderr, self.clone()));
        }

        let status = child.wait().await?;
        log::debug!("{cmd} exited: {status}");
        settle(readers).await?;

        finish(cmd, status)
    }
}

fn finish(cmd: &Cmd, status: ExitStatus) -> Result<bool> {
    if cmd.check && !status.success() {
        return Err(Error::CommandFailed {
            command: cmd.argv.clone(),
            code: status.code(),
        });
    }
    Ok(status.success())
}

/// Copy lines from one child stream into the tree until EOF.
async fn pump<R>(stream: R, log: Log) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        log.line(dim(format!("{OUTPUT_PREFIX}{}", line.trim_end())))?;
    }
}

/// Wait out the drain window, abort what's left, and surface reader failures.
async fn settle(mut readers: JoinSet<io::Result<()>>) -> Result<()> {
    let drained = tokio::time::timeout(DRAIN_GRACE, async {
        while let Some(joined) = readers.join_next().await {
            reader_outcome(joined)?;
        }
        Ok::<(), Error>(())
    })
    .await;

    if let Ok(result) = drained {
        return result;
    }

    log::debug!("Aborting {} reader(s) still open after exit", readers.len());
    readers.abort_all();
    while let Some(joined) = readers.join_next().await {
        reader_outcome(joined)?;
    }
    Ok(())
}

/// Cancellation is how we stop readers, so it isn't a failure. Panics are
/// re-raised on the caller's task.
fn reader_outcome(joined: std::result::Result<io::Result<()>, JoinError>) -> Result<()> {
    match joined {
        Ok(result) => Ok(result?),
        Err(e) if e.is_cancelled() => Ok(()),
        Err(e) => std::panic::resume_unwind(e.into_panic()),
    }
}
