// src/config/mod.rs

//! Task file loading and validation.
//!
//! Responsibilities:
//! - Define the descriptor data model (`model.rs`).
//! - Load a `run.yml` from disk (`loader.rs`).
//! - Turn raw YAML documents into descriptors (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_and_validate_with, load_from_path};
pub use model::{ConfigFile, Options, RawConfigFile, TaskDescriptor, TaskValue, ROOT_TASK_NAME};
