// src/config/model.rs

use serde::Deserialize;

/// Name given to the root descriptor that owns all top-level entries.
pub const ROOT_TASK_NAME: &str = "run";

/// One `(name, value)` entry of the task description.
///
/// A `run.yml` like:
///
/// ```yaml
/// # Build everything
/// build:
///   - cargo build
///   - /docs: cargo doc
/// PORT: echo 8080
/// ---
/// faketty: true
/// ```
///
/// becomes a root descriptor named `run` whose group holds `build` (with a
/// description taken from the comment) and `PORT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    pub name: String,
    pub value: TaskValue,
}

impl TaskDescriptor {
    pub fn new(name: impl Into<String>, value: TaskValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Shape of a descriptor's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValue {
    /// A shell fragment.
    Code(String),
    /// Ordered sub-descriptors; makes the task composite.
    Group(Vec<TaskDescriptor>),
    /// A `{code, desc}` mapping.
    Described { code: Box<TaskValue>, desc: String },
}

/// Second YAML document of the task file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Options {
    /// Run concurrently executed commands under a pseudo-terminal.
    #[serde(default)]
    pub faketty: bool,
}

/// A loaded and validated task file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub root: TaskDescriptor,
    pub options: Options,
}

/// Raw YAML documents before conversion into descriptors.
#[derive(Debug, Clone)]
pub struct RawConfigFile {
    /// Document 1: ordered mapping of top-level tasks.
    pub tasks: serde_yaml::Value,
    /// Description collected from comments, per top-level key.
    pub descriptions: Vec<(String, String)>,
    /// Document 2, if present.
    pub options: Option<serde_yaml::Value>,
}
