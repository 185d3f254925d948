// src/plan/mod.rs

//! Resolved commands and execution plans.

pub mod command;

pub use command::{Command, RUNARGS_PLACEHOLDER};

use std::fmt;
use std::io::Write;

use crate::env::Environment;
use crate::errors::Result;
use crate::exec::{self, ExecOptions};
use crate::task::TaskKind;

/// How the non-variable commands of a plan are run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Directive,
    Sequence,
    Parallel,
    Multiplex,
}

impl From<TaskKind> for ExecutionMode {
    fn from(kind: TaskKind) -> Self {
        match kind {
            TaskKind::Directive | TaskKind::Variable => ExecutionMode::Directive,
            TaskKind::Sequence => ExecutionMode::Sequence,
            TaskKind::Parallel => ExecutionMode::Parallel,
            TaskKind::Multiplex => ExecutionMode::Multiplex,
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutionMode::Directive => "directive",
            ExecutionMode::Sequence => "sequence",
            ExecutionMode::Parallel => "parallel",
            ExecutionMode::Multiplex => "multiplex",
        };
        f.write_str(s)
    }
}

/// Ordered commands plus the mode to run them in. Built once per
/// invocation and consumed by [`Plan::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    commands: Vec<Command>,
    mode: ExecutionMode,
}

impl Plan {
    pub fn new(commands: Vec<Command>, mode: ExecutionMode) -> Self {
        Self { commands, mode }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Human readable rendering used by help output.
    ///
    /// Grouped plans put a `[MODE]` header before the first non-variable
    /// command and indent everything from there on.
    pub fn explain(&self) -> String {
        let grouped = self.mode != ExecutionMode::Directive;
        let mut lines = Vec::with_capacity(self.commands.len() + 1);
        let mut plain = true;

        for command in &self.commands {
            if grouped && command.variable().is_none() && plain {
                lines.push(format!("[{}]", self.mode.to_string().to_uppercase()));
                plain = false;
            }
            let code = match command.variable() {
                Some(variable) => format!("{}='{}'", variable, command.code()),
                None => command.code().to_string(),
            };
            let indent = if plain { "" } else { "    " };
            lines.push(format!("{indent}{code}"));
        }

        lines.join("\n")
    }

    /// Run the plan.
    ///
    /// Variable commands are resolved first, one at a time, into `env`; the
    /// remaining commands then run according to the plan's mode. Console
    /// output produced by the runner (status lines, multiplexed output) goes
    /// to `out`.
    pub async fn execute<W: Write + Send>(
        self,
        argv: &[String],
        env: Environment,
        options: &ExecOptions,
        out: &mut W,
    ) -> Result<()> {
        exec::execute_plan(self, argv, env, options, out).await
    }

    pub(crate) fn into_parts(self) -> (Vec<Command>, ExecutionMode) {
        (self.commands, self.mode)
    }
}
