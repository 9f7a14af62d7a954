use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use logtree::styling::{error_message, red};
use logtree::{Cmd, Plan, output};

/// Built-in tour used by `logtree demo`
const DEMO_PLAN: &str = r#"
[[step]]
note = "System check."

  [[step.step]]
  note = "Checking the date."

    [[step.step.step]]
    run = ["date", "-u"]

  [[step.step]]
  note = "System check done."

[[step]]
cd = "/"

  [[step.step]]
  run = ["ls"]

[[step]]
run = ["printenv", "FOO"]
env = { FOO = "BAR" }

[[step]]
moan = "Oops, error."
"#;

#[derive(Parser)]
#[command(name = "logtree")]
#[command(about = "Run commands and render their output as an indented tree", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Diagnostic logging on stderr (-v info, -vv debug; RUST_LOG also works)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single command beneath a `$` line
    Exec {
        /// Don't fail when the command exits unsuccessfully
        #[arg(long)]
        no_check: bool,

        /// Don't announce the command or indent its output
        #[arg(short, long)]
        quiet: bool,

        /// Extra environment variable for the command
        #[arg(short = 'e', long = "env", value_name = "KEY=VALUE", value_parser = parse_env)]
        env: Vec<(String, String)>,

        /// Program and arguments (no shell interpretation)
        #[arg(last = true, required = true, value_name = "COMMAND")]
        argv: Vec<String>,
    },

    /// Run the steps described in a TOML plan file
    Plan {
        /// Path to the plan
        file: PathBuf,
    },

    /// Show a short tour of notes, directory changes, and commands
    Demo,
}

fn parse_env(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    if key.is_empty() {
        return Err(format!("empty variable name in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    output::install_stdout();
    let result = match cli.command {
        Commands::Exec {
            no_check,
            quiet,
            env,
            argv,
        } => handle_exec(argv, !no_check, quiet, env).await,
        Commands::Plan { file } => handle_plan(file).await,
        Commands::Demo => handle_demo().await,
    };
    output::uninstall();

    if let Err(e) = result {
        anstream::eprintln!("{}", error_message(format!("{e:#}")));
        process::exit(1);
    }
}

async fn handle_exec(
    argv: Vec<String>,
    check: bool,
    quiet: bool,
    env: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let cmd = Cmd::new(argv).check(check).quiet(quiet).envs(env);
    let log = output::root();
    if !log.run(&cmd).await? {
        log.moan(red(format!("{cmd} exited unsuccessfully")))?;
    }
    Ok(())
}

async fn handle_plan(file: PathBuf) -> anyhow::Result<()> {
    let plan = Plan::load(&file)?;
    plan.execute(&output::root())
        .await
        .with_context(|| format!("plan {} stopped", file.display()))
}

async fn handle_demo() -> anyhow::Result<()> {
    let plan = Plan::from_toml(DEMO_PLAN).context("built-in demo plan is invalid")?;
    plan.execute(&output::root()).await?;
    Ok(())
}
