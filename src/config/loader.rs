// src/config/loader.rs

use std::path::Path;

use serde::Deserialize;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, RunError};
use crate::fs::{FileSystem, RealFileSystem};

/// Load a task file from a given path and return the raw `RawConfigFile`.
///
/// This only splits and deserializes the YAML documents and collects the
/// comment descriptions; it does **not** turn them into descriptors. Use
/// [`load_and_validate`] for that.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    if !fs.is_file(path) {
        return Err(RunError::ConfigNotFound(path.display().to_string()));
    }
    let contents = fs.read_to_string(path)?;
    parse_str(&contents)
}

/// Parse the contents of a task file.
pub fn parse_str(contents: &str) -> Result<RawConfigFile> {
    let (tasks_text, options_text) = split_documents(contents);

    let tasks = serde_yaml::from_str::<serde_yaml::Value>(tasks_text)?;
    let options = match options_text {
        Some(text) => {
            let mut docs = serde_yaml::Deserializer::from_str(text);
            match docs.next() {
                Some(doc) => Some(serde_yaml::Value::deserialize(doc)?),
                None => None,
            }
        }
        None => None,
    };

    let keys = top_level_keys(&tasks);
    let descriptions = collect_descriptions(tasks_text, &keys);

    Ok(RawConfigFile {
        tasks,
        descriptions,
        options,
    })
}

/// Load a task file from path and convert it into descriptors.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads YAML (document 1: tasks, document 2: options).
/// - Attaches comment descriptions to top-level tasks.
/// - Checks the task document shape (see `validate.rs`).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    load_and_validate_with(&RealFileSystem, path)
}

/// Same as [`load_and_validate`], reading through the given filesystem.
pub fn load_and_validate_with(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(fs, &path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Split the file into the task document and the optional options document.
fn split_documents(contents: &str) -> (&str, Option<&str>) {
    let body = contents
        .strip_prefix("---\n")
        .or_else(|| contents.strip_prefix("---\r\n"))
        .unwrap_or(contents);

    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let rest = &body[offset + line.len()..];
            return (&body[..offset], Some(rest));
        }
        offset += line.len();
    }
    (body, None)
}

fn top_level_keys(tasks: &serde_yaml::Value) -> Vec<String> {
    match tasks {
        serde_yaml::Value::Mapping(map) => map
            .keys()
            .filter_map(|k| k.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// A run of `# ` lines directly above a top-level key describes that key.
fn collect_descriptions(text: &str, keys: &[String]) -> Vec<(String, String)> {
    let mut descriptions = Vec::new();
    let mut comments: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(comment) = line.strip_prefix("# ") {
            comments.push(comment);
            continue;
        }

        if let Some(key) = line_key(line) {
            if keys.iter().any(|k| k == key) && !comments.is_empty() {
                descriptions.push((key.to_string(), comments.join("\n")));
            }
        }
        comments.clear();
    }

    descriptions
}

/// Key of an unindented `key: value` line, without surrounding quotes.
fn line_key(line: &str) -> Option<&str> {
    if line.starts_with(char::is_whitespace) || line.starts_with('#') || line.starts_with('-') {
        return None;
    }
    let (key, _) = line.split_once(':')?;
    let key = key.trim();
    let unquoted = key
        .strip_prefix('"')
        .and_then(|k| k.strip_suffix('"'))
        .or_else(|| key.strip_prefix('\'').and_then(|k| k.strip_suffix('\'')))
        .unwrap_or(key);
    Some(unquoted)
}
