// src/lib.rs

pub mod cli;
pub mod config;
pub mod env;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod output;
pub mod plan;
pub mod task;

use std::io::{self, Write};

use anyhow::Context;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::env::Environment;
use crate::errors::Result;
use crate::exec::{run_harness, ExecOptions};
use crate::task::help::render_help;
use crate::task::{complete, resolve, Resolution, TaskTree};

/// High-level entry point used by `main.rs`.
///
/// Returns the process exit code.
pub async fn run(args: CliArgs) -> Result<i32> {
    if args.faketty {
        let argv = args.args;
        let code = tokio::task::spawn_blocking(move || run_harness(&argv))
            .await
            .context("joining pty harness")??;
        return Ok(code);
    }

    let mut stdout = io::stdout();
    run_with(&args, &mut stdout).await
}

/// Same as [`run`] but writes the runner's own output to `out`.
///
/// This wires together:
/// - config loading and tree construction
/// - argument resolution (help / completion / plan)
/// - plan execution
///
/// Harness mode is not handled here.
pub async fn run_with<W: Write + Send>(args: &CliArgs, out: &mut W) -> Result<i32> {
    let cfg = load_and_validate(&args.path)?;
    let tree = TaskTree::from_config(&cfg)?;
    debug!(path = %args.path.display(), nodes = tree.len(), "task tree built");

    if args.complete {
        for name in complete(tree.root(), &args.args) {
            writeln!(out, "{name}")?;
        }
        out.flush()?;
        return Ok(0);
    }

    match resolve(tree.root(), &args.args)? {
        Resolution::RootHelp { root } => {
            render_help(out, root, root, None, None)?;
        }
        Resolution::Help {
            task,
            selected,
            plan,
            filters,
        } => {
            render_help(out, task, selected, Some(&plan), Some(&filters))?;
        }
        Resolution::Execute { task, plan, argv } => {
            let faketty = if tree.options().faketty {
                Some(std::env::current_exe().context("locating the run executable")?)
            } else {
                None
            };
            let options = ExecOptions {
                quiet: task.quiet(),
                faketty,
                ..ExecOptions::default()
            };

            info!(task = %task.qualified_name(), mode = %plan.mode(), "running task");
            plan.execute(&argv, Environment::from_process(), &options, out)
                .await?;
        }
    }

    out.flush()?;
    Ok(0)
}
