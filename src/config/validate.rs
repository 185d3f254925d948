// src/config/validate.rs

use serde_yaml::Value;

use crate::config::model::{
    ConfigFile, Options, RawConfigFile, TaskDescriptor, TaskValue, ROOT_TASK_NAME,
};
use crate::errors::{Result, RunError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::RunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let entries = top_level_entries(&raw)?;
        let options = options_from(raw.options)?;

        Ok(ConfigFile {
            root: TaskDescriptor::new(ROOT_TASK_NAME, TaskValue::Group(entries)),
            options,
        })
    }
}

fn top_level_entries(raw: &RawConfigFile) -> Result<Vec<TaskDescriptor>> {
    let map = match &raw.tasks {
        Value::Mapping(map) if !map.is_empty() => map,
        Value::Mapping(_) | Value::Null => {
            return Err(RunError::ConfigError(
                "task file must describe at least one task".to_string(),
            ));
        }
        other => {
            return Err(RunError::ConfigError(format!(
                "task file must start with a mapping of tasks, got {}",
                kind_of(other)
            )));
        }
    };

    let mut entries = Vec::with_capacity(map.len());
    for (key, value) in map {
        let name = key_name(key)?;
        let mut task_value = task_value(value)?;

        if let Some((_, desc)) = raw.descriptions.iter().find(|(k, _)| *k == name) {
            if !matches!(task_value, TaskValue::Described { .. }) {
                task_value = TaskValue::Described {
                    code: Box::new(task_value),
                    desc: desc.clone(),
                };
            }
        }

        entries.push(TaskDescriptor::new(name, task_value));
    }
    Ok(entries)
}

/// Convert one YAML value into a descriptor value.
///
/// - scalars become code (`null` is empty code)
/// - sequences become groups; a single-key mapping item is a named child,
///   anything else an unnamed one
/// - mappings become groups of named children, unless they are exactly a
///   `{code, desc}` pair
pub fn task_value(value: &Value) -> Result<TaskValue> {
    match value {
        Value::Null => Ok(TaskValue::Code(String::new())),
        Value::Bool(b) => Ok(TaskValue::Code(b.to_string())),
        Value::Number(n) => Ok(TaskValue::Code(n.to_string())),
        Value::String(s) => Ok(TaskValue::Code(s.clone())),
        Value::Sequence(items) => {
            let mut children = Vec::with_capacity(items.len());
            for item in items {
                children.push(sequence_item(item)?);
            }
            Ok(TaskValue::Group(children))
        }
        Value::Mapping(map) => {
            if let Some(described) = described_value(map)? {
                return Ok(described);
            }
            let mut children = Vec::with_capacity(map.len());
            for (key, value) in map {
                children.push(TaskDescriptor::new(key_name(key)?, task_value(value)?));
            }
            Ok(TaskValue::Group(children))
        }
        Value::Tagged(tagged) => Err(RunError::ConfigError(format!(
            "tagged value '{}' is not supported in task descriptions",
            tagged.tag
        ))),
    }
}

fn sequence_item(item: &Value) -> Result<TaskDescriptor> {
    if let Value::Mapping(map) = item {
        if map.len() == 1 && described_value(map)?.is_none() {
            if let Some((key, value)) = map.iter().next() {
                return Ok(TaskDescriptor::new(key_name(key)?, task_value(value)?));
            }
        }
    }
    Ok(TaskDescriptor::new("", task_value(item)?))
}

fn described_value(map: &serde_yaml::Mapping) -> Result<Option<TaskValue>> {
    if map.len() != 2 {
        return Ok(None);
    }
    let (Some(code), Some(desc)) = (map.get("code"), map.get("desc")) else {
        return Ok(None);
    };
    let desc = match desc {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => {
            return Err(RunError::ConfigError(format!(
                "task description must be a string, got {}",
                kind_of(other)
            )));
        }
    };
    Ok(Some(TaskValue::Described {
        code: Box::new(task_value(code)?),
        desc,
    }))
}

fn key_name(key: &Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(RunError::ConfigError(format!(
            "task names must be strings, got {}",
            kind_of(other)
        ))),
    }
}

fn options_from(value: Option<Value>) -> Result<Options> {
    match value {
        None | Some(Value::Null) => Ok(Options::default()),
        Some(value) => Ok(serde_yaml::from_value(value)?),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
