// src/exec/supervisor.rs

//! Supervision of concurrently running commands.
//!
//! All commands are spawned up front, in plan order. Each output pipe gets
//! its own reader task that forwards chunks over a channel, so children
//! never block on a full pipe. A single loop then alternates between two
//! duties until every command is done:
//!
//! - collect the chunks that arrived and forward or hold them,
//! - check exit statuses.
//!
//! The first non-zero exit ends the run immediately. Only the process at
//! position 0 is removed from the live set on success; a sibling that
//! finishes early stays in the set until it reaches position 0.

use std::io::{self, Write};
use std::mem;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::style::Color;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::env::Environment;
use crate::errors::{Result, RunError};
use crate::exec::faketty::apply_faketty;
use crate::exec::{shell_command, ExecOptions};
use crate::output::{iter_colors, labeled_line};
use crate::plan::Command;

const READ_CHUNK: usize = 4096;

/// Upper bound on output held back for a process that is not streamed.
/// Older bytes are dropped first.
const HELD_LIMIT: usize = 1 << 20;

/// How long a finished process may keep its pipes open before the rest of
/// its output is abandoned. Background jobs inherit the pipes.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Which processes have their output forwarded while they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPolicy {
    /// Only the process at position 0 (parallel).
    FirstOnly,
    /// Every process, each line labeled (multiplex).
    All,
}

impl StreamPolicy {
    fn streams(self, index: usize) -> bool {
        self == StreamPolicy::All || index == 0
    }
}

/// Internal handle for a spawned command.
///
/// - `partial` holds bytes of an unfinished output line.
/// - `held` collects output received while the process is not streamed; it
///   is replayed once the process is streamed or flushed.
struct LiveProcess {
    command: Command,
    child: Child,
    output: mpsc::UnboundedReceiver<Vec<u8>>,
    readers: Vec<JoinHandle<()>>,
    color: Color,
    label: Option<String>,
    partial: Vec<u8>,
    held: Vec<u8>,
    truncated: bool,
}

impl LiveProcess {
    /// Take every chunk that already arrived, without waiting.
    fn collect<W: Write + ?Sized>(&mut self, streamed: bool, out: &mut W) -> io::Result<()> {
        while let Ok(chunk) = self.output.try_recv() {
            self.absorb(&chunk, streamed, out)?;
        }
        if streamed {
            self.absorb(&[], true, out)?;
        }
        Ok(())
    }

    /// Forward complete lines of `chunk` to `out`, or hold them back when the
    /// process is not streamed.
    fn absorb<W: Write + ?Sized>(&mut self, chunk: &[u8], streamed: bool, out: &mut W) -> io::Result<()> {
        if !streamed {
            self.hold(chunk);
            return Ok(());
        }

        if !self.held.is_empty() {
            let held = mem::take(&mut self.held);
            self.partial.extend_from_slice(&held);
        }
        self.partial.extend_from_slice(chunk);

        while let Some(pos) = self.partial.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=pos).collect();
            self.write_line(&line[..pos], out)?;
        }
        Ok(())
    }

    fn hold(&mut self, chunk: &[u8]) {
        self.held.extend_from_slice(chunk);
        if self.held.len() > HELD_LIMIT {
            let excess = self.held.len() - HELD_LIMIT;
            self.held.drain(..excess);
            if !self.truncated {
                warn!(task = %self.command.name(), limit = HELD_LIMIT, "held output too large; dropping oldest bytes");
                self.truncated = true;
            }
        }
    }

    /// Forward what the readers deliver until both pipes close or `grace`
    /// runs out, then write out everything left, including an unfinished
    /// line.
    async fn drain<W: Write + ?Sized>(&mut self, grace: Duration, out: &mut W) -> io::Result<()> {
        let deadline = Instant::now() + grace;
        loop {
            match timeout_at(deadline, self.output.recv()).await {
                Ok(Some(chunk)) => self.absorb(&chunk, true, out)?,
                Ok(None) => break,
                Err(_) => {
                    debug!(task = %self.command.name(), "pipes still open after exit; detaching");
                    break;
                }
            }
        }
        self.stop_readers();

        self.absorb(&[], true, out)?;
        if !self.partial.is_empty() {
            let rest = mem::take(&mut self.partial);
            self.write_line(&rest, out)?;
        }
        out.flush()
    }

    fn write_line<W: Write + ?Sized>(&self, raw: &[u8], out: &mut W) -> io::Result<()> {
        let text = String::from_utf8_lossy(raw);
        let text = text.trim_end_matches('\r');
        match &self.label {
            Some(label) => writeln!(out, "{}", labeled_line(label, self.color, text)),
            None => writeln!(out, "{text}"),
        }
    }

    fn stop_readers(&mut self) {
        for reader in self.readers.drain(..) {
            reader.abort();
        }
    }
}

impl Drop for LiveProcess {
    fn drop(&mut self) {
        self.stop_readers();
    }
}

/// Forward everything `pipe` yields until end of file.
fn spawn_reader<R>(
    task: String,
    mut pipe: R,
    tx: mpsc::UnboundedSender<Vec<u8>>,
    wake: Arc<Notify>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = [0u8; READ_CHUNK];
        loop {
            match pipe.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                    wake.notify_one();
                }
                Err(e) => {
                    warn!(task = %task, error = %e, "reading command output");
                    break;
                }
            }
        }
    })
}

/// Spawn every command and supervise them until all succeed or one fails.
///
/// On failure the failing command's remaining output is flushed, the other
/// live processes are killed and reaped, and
/// [`RunError::CommandFailed`] is returned.
pub async fn execute_concurrent<W: Write + ?Sized>(
    commands: Vec<Command>,
    env: &Environment,
    options: &ExecOptions,
    policy: StreamPolicy,
    out: &mut W,
) -> Result<()> {
    let labeled = policy == StreamPolicy::All && !options.quiet;
    let width = commands
        .iter()
        .map(|c| c.name().chars().count())
        .max()
        .unwrap_or(0);

    let wake = Arc::new(Notify::new());
    let mut colors = iter_colors();
    let mut live: Vec<LiveProcess> = Vec::with_capacity(commands.len());

    for command in commands {
        if !options.quiet {
            writeln!(out, "[run] Launched '{}'", command.code())?;
        }

        let code = apply_faketty(command.code(), options.faketty.as_deref());
        let mut child = shell_command(&code, env)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("spawning process for task '{}'", command.name()))?;

        info!(task = %command.name(), code = %command.code(), pid = ?child.id(), "spawned concurrent command");

        let (tx, output) = mpsc::unbounded_channel();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_reader(command.name().to_string(), stdout, tx.clone(), wake.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_reader(command.name().to_string(), stderr, tx, wake.clone()));
        }

        let label = labeled.then(|| format!("{:<width$}", command.name()));
        live.push(LiveProcess {
            child,
            output,
            readers,
            color: colors.next().unwrap_or(Color::Reset),
            label,
            command,
            partial: Vec::new(),
            held: Vec::new(),
            truncated: false,
        });
    }
    out.flush()?;

    'supervise: while !live.is_empty() {
        for (index, process) in live.iter_mut().enumerate() {
            process.collect(policy.streams(index), out)?;
        }
        out.flush()?;

        for index in 0..live.len() {
            let status = live[index]
                .child
                .try_wait()
                .context("polling command status")?;
            let Some(status) = status else {
                continue;
            };

            if !status.success() {
                let mut failed = live.remove(index);
                failed.drain(DRAIN_GRACE, out).await?;

                let code = status.code().unwrap_or(-1);
                warn!(
                    task = %failed.command.name(),
                    exit_code = code,
                    siblings = live.len(),
                    "concurrent command failed; stopping siblings"
                );
                terminate(live).await;

                return Err(RunError::CommandFailed {
                    code: failed.command.code().to_string(),
                    status: code,
                });
            }

            if index == 0 {
                let mut finished = live.remove(0);
                finished.drain(DRAIN_GRACE, out).await?;
                debug!(task = %finished.command.name(), "concurrent command finished");
                continue 'supervise;
            }
        }

        // Woken early by new output; exits are only seen by polling.
        let _ = timeout(options.poll_interval, wake.notified()).await;
    }

    Ok(())
}

/// Kill and reap the remaining processes so none outlive the run.
async fn terminate(mut live: Vec<LiveProcess>) {
    for process in &mut live {
        if let Err(e) = process.child.start_kill() {
            debug!(task = %process.command.name(), error = %e, "process already gone");
        }
    }
    for process in &mut live {
        if let Err(e) = process.child.wait().await {
            warn!(task = %process.command.name(), error = %e, "failed to reap process");
        }
    }
}
