//! Declarative plans: a tree of notes, directory changes, and commands
//! described in TOML and rendered through a [`Log`].
//!
//! ```toml
//! [[step]]
//! note = "System check."
//!
//!   [[step.step]]
//!   note = "Checking epoch date."
//!
//!     [[step.step.step]]
//!     run = ["date", "-u"]
//!
//! [[step]]
//! cd = "/"
//!
//!   [[step.step]]
//!   run = ["ls"]
//!
//! [[step]]
//! run = ["printenv", "FOO"]
//! env = { FOO = "BAR" }
//! check = false
//! ```
//!
//! Every step carries exactly one action: `note`, `moan`, `cd`, or `run`.
//! Nested `step` arrays run inside the section their parent opened; `run`
//! steps take `check`, `quiet`, and `env` and cannot have children.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::output::Log;
use crate::shell_exec::Cmd;

/// A parsed plan
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub steps: Vec<Step>,
}

/// One node of a plan
#[derive(Debug, Clone)]
pub struct Step {
    pub action: Action,
    /// Steps run inside the section this step opens
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone)]
pub enum Action {
    Note(String),
    Moan(String),
    Cd(PathBuf),
    Run(Cmd),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPlan {
    #[serde(default)]
    step: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStep {
    note: Option<String>,
    moan: Option<String>,
    cd: Option<PathBuf>,
    run: Option<Vec<String>>,
    check: Option<bool>,
    quiet: Option<bool>,
    #[serde(default)]
    env: BTreeMap<String, String>,
    #[serde(default)]
    step: Vec<RawStep>,
}

impl Plan {
    /// Parse a plan from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let raw: RawPlan = toml::from_str(text).map_err(|e| Error::Plan(e.to_string()))?;
        let steps = convert_all(raw.step, "step")?;
        Ok(Self { steps })
    }

    /// Read and parse a plan file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ReadPlan {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
            .map_err(|e| Error::Plan(format!("{}: {}", path.display(), plan_detail(e))))
    }

    /// Run every step, stopping at the first error.
    pub async fn execute(&self, log: &Log) -> Result<()> {
        execute_steps(&self.steps, log).await
    }
}

fn plan_detail(err: Error) -> String {
    match err {
        Error::Plan(detail) => detail,
        other => other.to_string(),
    }
}

fn convert_all(raw: Vec<RawStep>, at: &str) -> Result<Vec<Step>> {
    raw.into_iter()
        .enumerate()
        .map(|(i, step)| convert(step, &format!("{at}[{i}]")))
        .collect()
}

fn convert(raw: RawStep, at: &str) -> Result<Step> {
    let mut actions = Vec::new();
    if let Some(message) = raw.note {
        actions.push(Action::Note(message));
    }
    if let Some(message) = raw.moan {
        actions.push(Action::Moan(message));
    }
    if let Some(path) = raw.cd {
        actions.push(Action::Cd(path));
    }
    if let Some(argv) = raw.run {
        if argv.is_empty() {
            return Err(Error::Plan(format!("{at}: `run` needs at least a program")));
        }
        let cmd = Cmd::new(argv)
            .check(raw.check.unwrap_or(true))
            .quiet(raw.quiet.unwrap_or(false))
            .envs(raw.env.clone());
        actions.push(Action::Run(cmd));
    }

    let action = match actions.len() {
        1 => actions.remove(0),
        0 => {
            return Err(Error::Plan(format!(
                "{at}: expected one of `note`, `moan`, `cd`, `run`"
            )));
        }
        _ => {
            return Err(Error::Plan(format!(
                "{at}: only one of `note`, `moan`, `cd`, `run` may be set"
            )));
        }
    };

    if !matches!(action, Action::Run(_))
        && (raw.check.is_some() || raw.quiet.is_some() || !raw.env.is_empty())
    {
        return Err(Error::Plan(format!(
            "{at}: `check`, `quiet`, and `env` only apply to `run`"
        )));
    }
    if matches!(action, Action::Run(_)) && !raw.step.is_empty() {
        return Err(Error::Plan(format!("{at}: `run` steps cannot have nested steps")));
    }

    let steps = convert_all(raw.step, &format!("{at}.step"))?;
    Ok(Step { action, steps })
}

fn execute_steps<'a>(
    steps: &'a [Step],
    log: &'a Log,
) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
    Box::pin(async move {
        for step in steps {
            match &step.action {
                Action::Note(message) => {
                    let section = log.note(message)?;
                    execute_steps(&step.steps, &section).await?;
                }
                Action::Moan(message) => {
                    let section = log.moan(message)?;
                    execute_steps(&step.steps, &section).await?;
                }
                Action::Cd(path) => {
                    let cd = log.cd(path)?;
                    execute_steps(&step.steps, &cd).await?;
                }
                Action::Run(cmd) => {
                    log.run(cmd).await?;
                }
            }
        }
        Ok(())
    })
}
