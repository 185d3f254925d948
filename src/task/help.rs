// src/task/help.rs

//! Help rendering for `run <path> ?` and bare `run`.

use std::io::{self, Write};

use crate::output::write_message;
use crate::plan::Plan;
use crate::task::navigator::Task;
use crate::task::resolver::Filters;
use crate::task::TaskKind;

/// Render help for `task`, marking `selected`.
///
/// `plan` and `filters` are present when help was requested for a concrete
/// task path; root help passes `None` for both.
pub fn render_help<W: Write + ?Sized>(
    out: &mut W,
    task: Task<'_>,
    selected: Task<'_>,
    plan: Option<&Plan>,
    filters: Option<&Filters>,
) -> io::Result<()> {
    write_message(out, &task.qualified_name())?;
    write_message(out, "---")?;

    if !task.desc().is_empty() {
        writeln!(out)?;
        write_message(out, "Description")?;
        writeln!(out, "{}", task.desc())?;
    }

    let mut nodes = vec![task];
    nodes.extend(task.flatten_childs_with_composite());

    let vars: Vec<_> = nodes
        .iter()
        .filter(|t| t.kind() == TaskKind::Variable)
        .collect();
    if !vars.is_empty() {
        writeln!(out)?;
        write_message(out, "Vars")?;
        for var in vars {
            writeln!(out, "{}", var.qualified_name())?;
        }
    }

    let tasks: Vec<_> = nodes
        .iter()
        .filter(|t| !t.name().is_empty() && t.kind() != TaskKind::Variable)
        .collect();
    if !tasks.is_empty() {
        writeln!(out)?;
        write_message(out, "Tasks")?;
        for child in tasks {
            let line = task_line(child, filters);
            if *child == selected {
                write_message(out, &format!("{line} (selected)"))?;
            } else {
                writeln!(out, "{line}")?;
            }
        }
    }

    if let Some(plan) = plan {
        writeln!(out)?;
        write_message(out, "Execution Plan")?;
        writeln!(out, "{}", plan.explain())?;
    }

    Ok(())
}

fn task_line(task: &Task<'_>, filters: Option<&Filters>) -> String {
    let mut line = task.qualified_name();
    if task.optional() {
        line.push_str(" (optional)");
    }
    if let Some(filters) = filters {
        let id = task.id();
        if filters.pick.contains(&id) {
            line.push_str(" (picked)");
        }
        if filters.enable.contains(&id) {
            line.push_str(" (enabled)");
        }
        if filters.disable.contains(&id) {
            line.push_str(" (disabled)");
        }
    }
    line
}
