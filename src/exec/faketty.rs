// src/exec/faketty.rs

//! Pseudo-terminal harness for concurrently spawned commands.
//!
//! Commands run with piped output usually stop coloring it. With the
//! `faketty` option each concurrent command is rewritten to go through the
//! `run` executable itself in harness mode, which runs the command under a
//! pty and copies everything the pty produces to its own stdout.

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{anyhow, Context};
use portable_pty::{native_pty_system, CommandBuilder, PtySize};
use shell_escape::escape;
use tracing::debug;

/// Hidden flag that switches the executable into harness mode.
pub const HARNESS_FLAG: &str = "--run-faketty";

const DEFAULT_SIZE: (u16, u16) = (80, 24);

/// Rewrite `code` to run through the harness at `harness`.
///
/// Without a harness the code is returned unchanged.
pub fn apply_faketty(code: &str, harness: Option<&Path>) -> String {
    let Some(harness) = harness else {
        return code.to_string();
    };
    let exe = harness.to_string_lossy();
    format!(
        "{} {} /bin/sh -c {}",
        escape(exe),
        HARNESS_FLAG,
        escape(code.into())
    )
}

/// Run `argv` under a fresh pty, forwarding its output to stdout.
///
/// Blocks until the child exits and returns its exit code.
pub fn run_harness(argv: &[String]) -> anyhow::Result<i32> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    run_harness_to(argv, &mut stdout)
}

/// Like [`run_harness`], forwarding the pty output to `out`.
pub fn run_harness_to<W: Write>(argv: &[String], out: &mut W) -> anyhow::Result<i32> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| anyhow!("no command given to the pty harness"))?;

    let (cols, rows) = crossterm::terminal::size().unwrap_or(DEFAULT_SIZE);
    let pair = native_pty_system()
        .openpty(PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(|e| anyhow!("opening pty: {e}"))?;

    let mut cmd = CommandBuilder::new(program);
    cmd.args(args);
    let cwd = std::env::current_dir().context("reading current directory")?;
    cmd.cwd(cwd);

    let mut child = pair
        .slave
        .spawn_command(cmd)
        .map_err(|e| anyhow!("spawning '{program}' under pty: {e}"))?;
    drop(pair.slave);

    let mut reader = pair
        .master
        .try_clone_reader()
        .map_err(|e| anyhow!("reading from pty: {e}"))?;

    let mut buf = [0u8; 8192];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                out.write_all(&buf[..n])?;
                out.flush()?;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            // EIO once the slave side is closed.
            Err(e) => {
                debug!(error = %e, "pty reader closed");
                break;
            }
        }
    }

    let status = child.wait().context("waiting for pty child")?;
    debug!(program = %program, exit_code = status.exit_code(), "pty child exited");
    Ok(status.exit_code() as i32)
}
