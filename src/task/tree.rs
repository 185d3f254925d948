// src/task/tree.rs

//! Arena-backed task tree.
//!
//! Nodes live in a flat table; children and parent links are [`TaskId`]
//! indices, so the tree has no ownership cycles and is immutable once
//! [`TaskTree::build`] returns.

use tracing::debug;

use crate::config::model::{ConfigFile, Options, TaskDescriptor, TaskValue};
use crate::errors::{Result, RunError};
use crate::task::navigator::Task;
use crate::task::TaskKind;

pub const ROOT_DESCRIPTION: &str = "General run description";
pub const VARIABLE_DESCRIPTION: &str = "Prints the variable";

/// Index of a node inside its [`TaskTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(usize);

#[derive(Debug, Clone)]
pub(crate) struct TaskNode {
    pub(crate) name: String,
    /// `None` iff the node is composite.
    pub(crate) code: Option<String>,
    pub(crate) kind: TaskKind,
    pub(crate) desc: String,
    pub(crate) quiet: bool,
    pub(crate) optional: bool,
    pub(crate) children: Vec<TaskId>,
    pub(crate) parent: Option<TaskId>,
}

/// The whole task description, built once at startup.
#[derive(Debug, Clone)]
pub struct TaskTree {
    nodes: Vec<TaskNode>,
    options: Options,
}

impl TaskTree {
    /// Build the tree for a loaded task file.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        Self::build(&cfg.root, cfg.options.clone())
    }

    /// Build the tree rooted at `root`.
    ///
    /// Fails with [`RunError::UnsupportedNesting`] when a parenthesized group
    /// appears below a top-level task.
    pub fn build(root: &TaskDescriptor, options: Options) -> Result<Self> {
        let mut tree = Self {
            nodes: Vec::new(),
            options,
        };
        tree.insert(root, None, None, false)?;
        debug!(nodes = tree.nodes.len(), "task tree built");
        Ok(tree)
    }

    pub fn root(&self) -> Task<'_> {
        Task::new(self, TaskId(0))
    }

    /// View of the node with the given id.
    ///
    /// Ids are only handed out by this tree, so they are always in range.
    pub fn get(&self, id: TaskId) -> Task<'_> {
        Task::new(self, id)
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node(&self, id: TaskId) -> &TaskNode {
        &self.nodes[id.0]
    }

    fn ancestor_count(&self, parent: Option<TaskId>) -> usize {
        let mut count = 0;
        let mut current = parent;
        while let Some(id) = current {
            count += 1;
            current = self.node(id).parent;
        }
        count
    }

    fn insert(
        &mut self,
        descriptor: &TaskDescriptor,
        parent: Option<TaskId>,
        parent_kind: Option<TaskKind>,
        inherited_quiet: bool,
    ) -> Result<TaskId> {
        let (value, described) = split_description(&descriptor.value);
        let mut desc = match described {
            Some(desc) => desc.to_string(),
            None if parent.is_none() => ROOT_DESCRIPTION.to_string(),
            None => String::new(),
        };

        let mut name = descriptor.name.as_str();
        let mut optional = false;
        if let Some(rest) = name.strip_prefix('/') {
            name = rest;
            optional = true;
        }

        let mut name = name.to_string();
        let mut quiet = inherited_quiet;
        if name.contains('!') {
            name = name.replace('!', "");
            quiet = true;
        }

        let mut kind = TaskKind::Directive;
        if !name.is_empty() && name == name.to_uppercase() {
            kind = TaskKind::Variable;
            desc = VARIABLE_DESCRIPTION.to_string();
        }

        let (code, children) = match value {
            Body::Group(children) if !children.is_empty() => {
                kind = TaskKind::Sequence;

                if let Some(parent_kind) = parent_kind.filter(|k| k.is_concurrent()) {
                    kind = parent_kind;
                }

                if let Some(inner) = strip_parens(&name) {
                    if self.ancestor_count(parent) >= 2 {
                        return Err(RunError::UnsupportedNesting {
                            task: descriptor.name.clone(),
                        });
                    }
                    name = inner.to_string();
                    kind = TaskKind::Parallel;
                }

                if let Some(inner) = strip_parens(&name) {
                    name = inner.to_string();
                    kind = TaskKind::Multiplex;
                }

                (None, children)
            }
            Body::Group(_) => (Some(String::new()), &[][..]),
            Body::Code(code) => (Some(code.to_string()), &[][..]),
        };

        let id = TaskId(self.nodes.len());
        self.nodes.push(TaskNode {
            name,
            code,
            kind,
            desc,
            quiet,
            optional,
            children: Vec::with_capacity(children.len()),
            parent,
        });

        for child in children {
            let child_id = self.insert(child, Some(id), Some(kind), quiet)?;
            self.nodes[id.0].children.push(child_id);
        }

        Ok(id)
    }
}

/// A task value with its description wrappers removed.
enum Body<'a> {
    Code(&'a str),
    Group(&'a [TaskDescriptor]),
}

/// Peel `{code, desc}` wrappers, keeping the outermost description.
fn split_description(value: &TaskValue) -> (Body<'_>, Option<&str>) {
    let mut described = None;
    let mut current = value;
    loop {
        match current {
            TaskValue::Described { code, desc } => {
                described = described.or(Some(desc.as_str()));
                current = code;
            }
            TaskValue::Code(code) => return (Body::Code(code), described),
            TaskValue::Group(children) => return (Body::Group(children), described),
        }
    }
}

fn strip_parens(name: &str) -> Option<&str> {
    name.strip_prefix('(')?.strip_suffix(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> TaskValue {
        TaskValue::Code(s.to_string())
    }

    fn entry(name: &str, value: TaskValue) -> TaskDescriptor {
        TaskDescriptor::new(name, value)
    }

    #[test]
    fn strip_parens_needs_both_sides() {
        assert_eq!(strip_parens("(a)"), Some("a"));
        assert_eq!(strip_parens("((a))"), Some("(a)"));
        assert_eq!(strip_parens("(a"), None);
        assert_eq!(strip_parens("a)"), None);
    }

    #[test]
    fn empty_group_is_a_leaf_with_empty_code() {
        let root = entry("run", TaskValue::Group(vec![entry("noop", TaskValue::Group(vec![]))]));
        let tree = TaskTree::build(&root, Options::default()).unwrap();
        let noop = tree.root().children()[0];
        assert!(!noop.is_composite());
        assert_eq!(noop.code(), Some(""));
    }

    #[test]
    fn outer_description_wins() {
        let nested = TaskValue::Described {
            code: Box::new(TaskValue::Described {
                code: Box::new(code("make")),
                desc: "inner".to_string(),
            }),
            desc: "outer".to_string(),
        };
        let root = entry("run", TaskValue::Group(vec![entry("build", nested)]));
        let tree = TaskTree::build(&root, Options::default()).unwrap();
        let build = tree.root().children()[0];
        assert_eq!(build.desc(), "outer");
        assert_eq!(build.code(), Some("make"));
    }

    #[test]
    fn described_group_keeps_children() {
        let group = TaskValue::Described {
            code: Box::new(TaskValue::Group(vec![entry("", code("make")), entry("", code("make test"))])),
            desc: "build and test".to_string(),
        };
        let root = entry("run", TaskValue::Group(vec![entry("ci", group)]));
        let tree = TaskTree::build(&root, Options::default()).unwrap();
        let ci = tree.root().children()[0];
        assert!(ci.is_composite());
        assert_eq!(ci.desc(), "build and test");
        assert_eq!(ci.children().len(), 2);
    }
}
