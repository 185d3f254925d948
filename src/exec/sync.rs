// src/exec/sync.rs

//! Sequential execution.

use std::io::Write;
use std::process::Stdio;

use anyhow::Context;
use tracing::{debug, info};

use crate::env::Environment;
use crate::errors::{Result, RunError};
use crate::exec::shell_command;
use crate::plan::Command;

/// Run `commands` one after another with inherited stdio.
///
/// The first non-zero exit stops the run with [`RunError::CommandFailed`];
/// later commands are never spawned.
pub async fn execute_sync<W: Write + ?Sized>(
    commands: &[Command],
    env: &Environment,
    quiet: bool,
    out: &mut W,
) -> Result<()> {
    for command in commands {
        if !quiet {
            writeln!(out, "[run] Launched '{}'", command.code())?;
        }
        out.flush()?;

        info!(task = %command.name(), code = %command.code(), "starting command");

        let status = shell_command(command.code(), env)
            .status()
            .await
            .with_context(|| format!("spawning process for task '{}'", command.name()))?;

        let code = status.code().unwrap_or(-1);
        debug!(task = %command.name(), exit_code = code, "command exited");

        if !status.success() {
            return Err(RunError::CommandFailed {
                code: command.code().to_string(),
                status: code,
            });
        }
    }
    Ok(())
}

/// Run a variable command and return its stdout without trailing whitespace.
///
/// Stderr stays attached to the console.
pub async fn capture_variable(command: &Command, env: &Environment) -> Result<String> {
    debug!(task = %command.name(), code = %command.code(), "capturing variable");

    let output = shell_command(command.code(), env)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .await
        .with_context(|| format!("spawning process for variable '{}'", command.name()))?;

    if !output.status.success() {
        return Err(RunError::CommandFailed {
            code: command.code().to_string(),
            status: output.status.code().unwrap_or(-1),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}
