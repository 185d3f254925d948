// src/task/mod.rs

//! Task tree and resolution.
//!
//! - [`tree`] builds the immutable, typed tree from descriptors (type
//!   inference happens exactly once, here).
//! - [`navigator`] holds the read-only algorithms over the tree: ancestor
//!   chains, qualified names, flattening and name/abbreviation lookup.
//! - [`resolver`] turns a node plus CLI arguments into a [`crate::plan::Plan`],
//!   a help request, or a completion listing. It performs no IO.
//! - [`help`] renders help text for a resolved node.

pub mod help;
pub mod navigator;
pub mod resolver;
pub mod tree;

pub use navigator::Task;
pub use resolver::{complete, resolve, Filters, Resolution};
pub use tree::{TaskId, TaskTree};

/// Kind of a task node, decided from its name syntax and value shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Plain leaf command.
    Directive,
    /// Upper-case leaf whose stdout is captured into the environment.
    Variable,
    /// Composite whose children run one after another.
    Sequence,
    /// Composite whose children run concurrently, first one streamed.
    Parallel,
    /// Composite whose children run concurrently, all streamed and labeled.
    Multiplex,
}

impl TaskKind {
    /// Whether children of this kind are run concurrently.
    pub fn is_concurrent(self) -> bool {
        matches!(self, TaskKind::Parallel | TaskKind::Multiplex)
    }
}
