// src/env.rs

//! Environment handed to spawned commands.
//!
//! The environment is written only while variable commands are resolved,
//! one at a time. Every spawned process receives its own snapshot, so the
//! concurrent phase only ever reads it.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::fs::FileSystem;

/// Set to the forwarded CLI arguments before commands run.
pub const RUNARGS_VAR: &str = "RUNARGS";
/// Names an env file merged into the environment before commands run.
pub const RUNVARS_VAR: &str = "RUNVARS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Merge a `.env` style file. Variables already present keep their
    /// value. A missing file is skipped with a warning; a malformed one is an
    /// error and merges nothing.
    ///
    /// Returns how many variables were added.
    pub fn merge_env_file(&mut self, fs: &dyn FileSystem, path: &Path) -> Result<usize> {
        if !fs.is_file(path) {
            warn!(path = %path.display(), "RUNVARS file not found; skipping");
            return Ok(0);
        }
        let contents = fs.read_to_string(path)?;
        let pairs = dotenvy::from_read_iter(contents.as_bytes())
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("parsing env file {}", path.display()))?;

        let mut added = 0;
        for (name, value) in pairs {
            if !self.vars.contains_key(&name) {
                self.vars.insert(name, value);
                added += 1;
            }
        }
        debug!(path = %path.display(), added, "merged env file");
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn merged(contents: &str) -> Environment {
        let fs = MockFileSystem::new();
        fs.add_file("vars.env", contents);
        let mut env = Environment::new();
        env.merge_env_file(&fs, Path::new("vars.env")).unwrap();
        env
    }

    #[test]
    fn reads_comments_exports_and_quotes() {
        let env = merged("# comment\nA=1\nexport B=two\nC='lit $X'\nD=\"a b\"\n");
        assert_eq!(env.len(), 4);
        assert_eq!(env.get("A"), Some("1"));
        assert_eq!(env.get("B"), Some("two"));
        assert_eq!(env.get("C"), Some("lit $X"));
        assert_eq!(env.get("D"), Some("a b"));
    }

    #[test]
    fn expands_earlier_variables() {
        let env = merged("RUN_ENV_TEST_ROOT=/srv/app\nRUN_ENV_TEST_DATA=${RUN_ENV_TEST_ROOT}/data\n");
        assert_eq!(env.get("RUN_ENV_TEST_DATA"), Some("/srv/app/data"));
    }

    #[test]
    fn keeps_multi_line_quoted_values() {
        let env = merged("CERT=\"line one\nline two\"\nNEXT=1\n");
        assert_eq!(env.get("CERT"), Some("line one\nline two"));
        assert_eq!(env.get("NEXT"), Some("1"));
    }

    #[test]
    fn malformed_file_merges_nothing() {
        let fs = MockFileSystem::new();
        fs.add_file("vars.env", "A=1\nnot a line\n");
        let mut env = Environment::new();
        assert!(env.merge_env_file(&fs, Path::new("vars.env")).is_err());
        assert!(env.is_empty());
    }

    #[test]
    fn merge_keeps_existing_values() {
        let fs = MockFileSystem::new();
        fs.add_file("vars.env", "A=from-file\nB=new\n");

        let mut env = Environment::new();
        env.set("A", "existing");
        let added = env.merge_env_file(&fs, Path::new("vars.env")).unwrap();

        assert_eq!(added, 1);
        assert_eq!(env.get("A"), Some("existing"));
        assert_eq!(env.get("B"), Some("new"));
    }

    #[test]
    fn missing_env_file_is_skipped() {
        let fs = MockFileSystem::new();
        let mut env = Environment::new();
        assert_eq!(env.merge_env_file(&fs, Path::new("nope.env")).unwrap(), 0);
        assert!(env.is_empty());
    }
}
