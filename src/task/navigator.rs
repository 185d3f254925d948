// src/task/navigator.rs

//! Read-only views and traversals over a [`TaskTree`].

use std::fmt;

use crate::task::tree::{TaskId, TaskNode, TaskTree};
use crate::task::TaskKind;

/// Borrowed handle to one node of a [`TaskTree`].
///
/// Cheap to copy; two handles are equal when they point at the same node of
/// the same tree.
#[derive(Clone, Copy)]
pub struct Task<'a> {
    tree: &'a TaskTree,
    id: TaskId,
}

impl PartialEq for Task<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl Eq for Task<'_> {}

impl fmt::Debug for Task<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

impl<'a> Task<'a> {
    pub(crate) fn new(tree: &'a TaskTree, id: TaskId) -> Self {
        Self { tree, id }
    }

    fn node(&self) -> &'a TaskNode {
        self.tree.node(self.id)
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn tree(&self) -> &'a TaskTree {
        self.tree
    }

    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    /// Shell code of a leaf; `None` for composite tasks.
    pub fn code(&self) -> Option<&'a str> {
        self.node().code.as_deref()
    }

    pub fn kind(&self) -> TaskKind {
        self.node().kind
    }

    pub fn desc(&self) -> &'a str {
        &self.node().desc
    }

    pub fn quiet(&self) -> bool {
        self.node().quiet
    }

    pub fn optional(&self) -> bool {
        self.node().optional
    }

    pub fn is_composite(&self) -> bool {
        !self.node().children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    pub fn parent(&self) -> Option<Task<'a>> {
        self.node().parent.map(|id| Task::new(self.tree, id))
    }

    pub fn children(&self) -> Vec<Task<'a>> {
        self.node()
            .children
            .iter()
            .map(|&id| Task::new(self.tree, id))
            .collect()
    }

    /// Ancestor chain, root first.
    pub fn parents(&self) -> Vec<Task<'a>> {
        let mut parents = Vec::new();
        let mut current = self.parent();
        while let Some(task) = current {
            parents.push(task);
            current = task.parent();
        }
        parents.reverse();
        parents
    }

    /// Space-joined non-empty names of the ancestors and this task.
    pub fn qualified_name(&self) -> String {
        let mut names: Vec<&str> = self
            .parents()
            .iter()
            .map(|t| t.name())
            .filter(|n| !n.is_empty())
            .collect();
        if !self.name().is_empty() {
            names.push(self.name());
        }
        names.join(" ")
    }

    /// Variable tasks declared before the branch holding this task, at every
    /// ancestor level, root-to-leaf and left-to-right.
    pub fn flatten_setup_tasks(&self) -> Vec<Task<'a>> {
        let parents = self.parents();
        let mut tasks = Vec::new();
        for parent in &parents {
            for task in parent.children() {
                if task == *self || parents.contains(&task) {
                    break;
                }
                if task.kind() == TaskKind::Variable {
                    tasks.push(task);
                }
            }
        }
        tasks
    }

    /// Depth-first leaves; a leaf yields itself.
    pub fn flatten_general_tasks(&self) -> Vec<Task<'a>> {
        if !self.is_composite() {
            return vec![*self];
        }
        let mut tasks = Vec::new();
        for task in self.children() {
            if task.is_composite() {
                tasks.extend(task.flatten_general_tasks());
            } else {
                tasks.push(task);
            }
        }
        tasks
    }

    /// Preorder descendants, composite tasks included.
    pub fn flatten_childs_with_composite(&self) -> Vec<Task<'a>> {
        let mut tasks = Vec::new();
        for task in self.children() {
            tasks.push(task);
            if task.is_composite() {
                tasks.extend(task.flatten_childs_with_composite());
            }
        }
        tasks
    }

    pub fn find_child_tasks_by_name(&self, name: &str) -> Vec<Task<'a>> {
        self.flatten_general_tasks()
            .into_iter()
            .filter(|t| t.name() == name)
            .collect()
    }

    /// Direct child with exactly this name.
    pub fn find_child_by_name(&self, name: &str) -> Option<Task<'a>> {
        self.children().into_iter().find(|t| t.name() == name)
    }

    /// Walk one tree level per character of `abbreviation`, taking the first
    /// child whose name starts with that character.
    pub fn find_child_task_by_abbreviation(&self, abbreviation: &str) -> Option<Task<'a>> {
        let mut chars = abbreviation.chars();
        let letter = chars.next()?;
        let rest = chars.as_str();
        let task = self
            .children()
            .into_iter()
            .find(|t| t.name().starts_with(letter))?;
        if rest.is_empty() {
            Some(task)
        } else {
            task.find_child_task_by_abbreviation(rest)
        }
    }
}
