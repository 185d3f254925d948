// src/task/resolver.rs

//! CLI arguments -> plan.
//!
//! This is the pure core of an invocation: it walks the tree, applies the
//! `=pick` / `+enable` / `-disable` filters and builds the ordered command
//! list. It never prints or spawns anything; `lib.rs` acts on the returned
//! [`Resolution`].

use std::collections::HashSet;

use tracing::debug;

use crate::errors::{Result, RunError};
use crate::plan::{Command, ExecutionMode, Plan};
use crate::task::navigator::Task;
use crate::task::tree::TaskId;
use crate::task::TaskKind;

/// What an invocation asked for.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// No task path given (or just `?`): show help for the whole file.
    RootHelp { root: Task<'a> },
    /// A task path followed by `?`.
    Help {
        /// Top-level task the help is rendered for.
        task: Task<'a>,
        /// The task the path resolved to.
        selected: Task<'a>,
        plan: Plan,
        filters: Filters,
    },
    /// Run `plan` for `task`, forwarding `argv` through `$RUNARGS`.
    Execute {
        task: Task<'a>,
        plan: Plan,
        argv: Vec<String>,
    },
}

/// Task sets selected by filter arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub pick: HashSet<TaskId>,
    pub enable: HashSet<TaskId>,
    pub disable: HashSet<TaskId>,
}

impl Filters {
    fn includes(&self, task: &Task<'_>) -> bool {
        let id = task.id();
        if !self.pick.is_empty() {
            return self.pick.contains(&id);
        }
        if task.optional() && !self.enable.contains(&id) {
            return false;
        }
        !self.disable.contains(&id)
    }
}

#[derive(Debug, Clone, Copy)]
enum FilterKind {
    Pick,
    Enable,
    Disable,
}

const FILTER_PREFIXES: [(FilterKind, char); 3] = [
    (FilterKind::Pick, '='),
    (FilterKind::Enable, '+'),
    (FilterKind::Disable, '-'),
];

/// Resolve `argv` against `task`.
pub fn resolve<'a>(task: Task<'a>, argv: &[String]) -> Result<Resolution<'a>> {
    if let Some((first, rest)) = argv.split_first() {
        if let Some(child) = task.find_child_by_name(first) {
            debug!(task = %child.qualified_name(), "delegating by name");
            return resolve(child, rest);
        }

        if task.is_root() {
            if let Some(child) = task.find_child_task_by_abbreviation(first) {
                debug!(abbreviation = %first, task = %child.qualified_name(), "delegating by abbreviation");
                return resolve(child, rest);
            }
        }
    }

    if task.is_root() {
        if !argv.is_empty() && argv != ["?"] {
            return Err(RunError::TaskNotFound(argv[0].clone()));
        }
        return Ok(Resolution::RootHelp { root: task });
    }

    let (filters, mut argv) = extract_filters(task, argv);

    let help = argv == ["?"];
    if help {
        argv.clear();
    }

    let mut commands = Vec::new();

    for setup in task.flatten_setup_tasks() {
        commands.push(Command::new(
            setup.qualified_name(),
            setup.code().unwrap_or_default(),
            Some(setup.name().to_string()),
        ));
    }

    for general in task.flatten_general_tasks() {
        if general != task && !filters.includes(&general) {
            continue;
        }
        let variable = (general.kind() == TaskKind::Variable).then(|| general.name().to_string());
        commands.push(Command::new(
            general.qualified_name(),
            general.code().unwrap_or_default(),
            variable,
        ));
    }

    normalize_runargs(&mut commands);

    let plan = Plan::new(commands, ExecutionMode::from(task.kind()));
    debug!(task = %task.qualified_name(), mode = %plan.mode(), commands = plan.commands().len(), "plan resolved");

    if help {
        let parents = task.parents();
        let top = if parents.len() < 2 { task } else { parents[1] };
        return Ok(Resolution::Help {
            task: top,
            selected: task,
            plan,
            filters,
        });
    }

    Ok(Resolution::Execute { task, plan, argv })
}

/// Child names for shell completion of `argv` below `task`.
pub fn complete<'a>(task: Task<'a>, argv: &[String]) -> Vec<&'a str> {
    if let Some((first, rest)) = argv.split_first() {
        if let Some(child) = task.find_child_by_name(first) {
            return complete(child, rest);
        }
    }
    task.children()
        .into_iter()
        .map(|t| t.name())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Pull `=name`, `+name` and `-name` arguments that match descendants of
/// `task`. Arguments matching nothing are left in place for `$RUNARGS`.
fn extract_filters(task: Task<'_>, argv: &[String]) -> (Filters, Vec<String>) {
    let mut filters = Filters::default();
    let mut remaining = argv.to_vec();

    for (kind, prefix) in FILTER_PREFIXES {
        for arg in argv {
            let Some(name) = arg.strip_prefix(prefix) else {
                continue;
            };
            let matches = task.find_child_tasks_by_name(name);
            if matches.is_empty() {
                continue;
            }
            let set = match kind {
                FilterKind::Pick => &mut filters.pick,
                FilterKind::Enable => &mut filters.enable,
                FilterKind::Disable => &mut filters.disable,
            };
            set.extend(matches.iter().map(|t| t.id()));
            remaining.retain(|a| a != arg);
        }
    }

    (filters, remaining)
}

/// Make sure exactly one non-variable command receives `$RUNARGS`.
///
/// The first non-variable command that already references the placeholder
/// keeps it; otherwise the first non-variable command gets it appended. The
/// placeholder is stripped from every other command.
fn normalize_runargs(commands: &mut [Command]) {
    let explicit = commands
        .iter()
        .position(|c| c.variable().is_none() && c.references_runargs());

    let target = explicit.or_else(|| commands.iter().position(|c| c.variable().is_none()));

    for (index, command) in commands.iter_mut().enumerate() {
        if Some(index) == target {
            if explicit.is_none() {
                command.append_runargs();
            }
        } else if command.references_runargs() {
            command.strip_runargs();
        }
    }
}
