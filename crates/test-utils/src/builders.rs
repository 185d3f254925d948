#![allow(dead_code)]

use std::io::Write;

use run::config::{Options, TaskDescriptor, TaskValue, ROOT_TASK_NAME};
use run::task::TaskTree;
use tempfile::NamedTempFile;

/// Builder for a root [`TaskDescriptor`] to simplify test setup.
///
/// Entries keep insertion order, like keys of a `run.yml` mapping.
pub struct DescriptorBuilder {
    name: String,
    children: Vec<TaskDescriptor>,
    desc: Option<String>,
}

impl DescriptorBuilder {
    /// Builder for the root (`run`) descriptor.
    pub fn new() -> Self {
        Self::named(ROOT_TASK_NAME)
    }

    /// Builder for a group descriptor called `name`.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
            desc: None,
        }
    }

    /// Add a leaf entry.
    pub fn code(mut self, name: &str, code: &str) -> Self {
        self.children
            .push(TaskDescriptor::new(name, TaskValue::Code(code.to_string())));
        self
    }

    /// Add a leaf entry carrying a description.
    pub fn described(mut self, name: &str, code: &str, desc: &str) -> Self {
        self.children.push(TaskDescriptor::new(
            name,
            TaskValue::Described {
                code: Box::new(TaskValue::Code(code.to_string())),
                desc: desc.to_string(),
            },
        ));
        self
    }

    /// Add a nested group built by another builder.
    pub fn group(mut self, group: DescriptorBuilder) -> Self {
        self.children.push(group.build());
        self
    }

    /// Describe the group being built.
    pub fn desc(mut self, desc: &str) -> Self {
        self.desc = Some(desc.to_string());
        self
    }

    pub fn build(self) -> TaskDescriptor {
        let group = TaskValue::Group(self.children);
        let value = match self.desc {
            Some(desc) => TaskValue::Described {
                code: Box::new(group),
                desc,
            },
            None => group,
        };
        TaskDescriptor::new(self.name, value)
    }

    /// Build straight into a [`TaskTree`] with default options.
    pub fn tree(self) -> TaskTree {
        TaskTree::build(&self.build(), Options::default())
            .expect("Failed to build task tree from builder")
    }
}

impl Default for DescriptorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `contents` to a temporary `run.yml`.
///
/// The file is removed when the returned handle is dropped.
pub fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("run")
        .suffix(".yml")
        .tempfile()
        .expect("Failed to create temporary config");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temporary config");
    file
}
