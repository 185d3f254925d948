// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the commands of a
//! [`Plan`], using `tokio::process::Command`.
//!
//! - [`sync`] runs commands one after another and captures variable output.
//! - [`supervisor`] owns the polling loop that supervises concurrently
//!   spawned commands (parallel and multiplex plans).
//! - [`faketty`] rewrites commands to run under a pseudo-terminal and
//!   implements the harness that does so.

pub mod faketty;
pub mod supervisor;
pub mod sync;

pub use faketty::{apply_faketty, run_harness, run_harness_to};
pub use supervisor::{execute_concurrent, StreamPolicy};
pub use sync::{capture_variable, execute_sync};

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::process::Command as Process;
use tracing::{debug, info};

use crate::env::{Environment, RUNARGS_VAR, RUNVARS_VAR};
use crate::errors::Result;
use crate::fs::RealFileSystem;
use crate::plan::{ExecutionMode, Plan};

/// Readiness timeout used when polling concurrent output.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Knobs for running a plan.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Suppress `[run]` status lines and multiplex labels.
    pub quiet: bool,
    /// Harness executable used to run concurrent commands under a
    /// pseudo-terminal; `None` runs them directly.
    pub faketty: Option<PathBuf>,
    pub poll_interval: Duration,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            quiet: false,
            faketty: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Build a shell invocation of `code` with exactly the given environment.
pub(crate) fn shell_command(code: &str, env: &Environment) -> Process {
    let mut cmd = if cfg!(windows) {
        let mut c = Process::new("cmd");
        c.arg("/C").arg(code);
        c
    } else {
        let mut c = Process::new("sh");
        c.arg("-c").arg(code);
        c
    };
    cmd.env_clear().envs(env.iter());
    cmd
}

/// Run a plan: resolve variables, prepare the environment, then dispatch the
/// remaining commands by mode.
pub async fn execute_plan<W: Write + Send + ?Sized>(
    plan: Plan,
    argv: &[String],
    mut env: Environment,
    options: &ExecOptions,
    out: &mut W,
) -> Result<()> {
    let (commands, mode) = plan.into_parts();

    // Variables first, strictly one at a time.
    let mut remaining = commands.len();
    let mut variables: Vec<String> = Vec::new();
    let mut general = Vec::with_capacity(commands.len());
    for command in commands {
        let Some(variable) = command.variable() else {
            general.push(command);
            continue;
        };

        let value = capture_variable(&command, &env).await?;
        debug!(variable, value = %value, "variable resolved");
        env.set(variable, value);
        variables.push(variable.to_string());
        remaining -= 1;

        if remaining == 0 {
            let value = env.get(variable).unwrap_or_default();
            writeln!(out, "{value}")?;
            out.flush()?;
            return Ok(());
        }
    }

    env.set(RUNARGS_VAR, argv.join(" "));
    let runvars = env
        .get(RUNVARS_VAR)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);
    if let Some(path) = runvars {
        env.merge_env_file(&RealFileSystem, &path)?;
    }

    if !options.quiet {
        let items: Vec<String> = variables
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(RUNARGS_VAR))
            .map(|name| format!("{}={}", name, env.get(name).unwrap_or_default()))
            .collect();
        writeln!(out, "[run] Prepared '{}'", items.join("; "))?;
    }

    info!(%mode, commands = general.len(), "executing plan");
    let start = Instant::now();

    match mode {
        ExecutionMode::Directive | ExecutionMode::Sequence => {
            execute_sync(&general, &env, options.quiet, out).await?;
        }
        ExecutionMode::Parallel => {
            execute_concurrent(general, &env, options, StreamPolicy::FirstOnly, out).await?;
        }
        ExecutionMode::Multiplex => {
            execute_concurrent(general, &env, options, StreamPolicy::All, out).await?;
        }
    }

    if !options.quiet {
        let elapsed = start.elapsed().as_secs_f64();
        writeln!(out, "[run] Finished in {elapsed:.2} seconds")?;
    }
    out.flush()?;

    Ok(())
}
