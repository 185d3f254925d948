// src/plan/command.rs

/// Placeholder expanded by the shell to the forwarded CLI arguments.
pub const RUNARGS_PLACEHOLDER: &str = "$RUNARGS";

/// A resolved, executable step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    code: String,
    variable: Option<String>,
}

impl Command {
    pub fn new(name: impl Into<String>, code: impl Into<String>, variable: Option<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            variable,
        }
    }

    /// Qualified name of the task this command came from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Output-variable binding, for variable tasks.
    pub fn variable(&self) -> Option<&str> {
        self.variable.as_deref()
    }

    pub fn references_runargs(&self) -> bool {
        self.code.contains(RUNARGS_PLACEHOLDER)
    }

    pub(crate) fn strip_runargs(&mut self) {
        self.code = self.code.replace(RUNARGS_PLACEHOLDER, "");
    }

    pub(crate) fn append_runargs(&mut self) {
        self.code = format!("{} {}", self.code, RUNARGS_PLACEHOLDER);
    }
}
