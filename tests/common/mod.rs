#![allow(dead_code)]

use std::path::Path;

use run::cli::CliArgs;
use run::errors::Result;

/// CLI arguments for running `argv` against the task file at `path`.
pub fn cli_args(path: &Path, argv: &[&str]) -> CliArgs {
    CliArgs {
        path: path.to_path_buf(),
        complete: false,
        log_level: None,
        faketty: false,
        args: argv.iter().map(|s| s.to_string()).collect(),
    }
}

/// Run `argv` against the task file at `path`, capturing the runner's own
/// output (status lines, printed variables, concurrent output).
pub async fn run_captured(path: &Path, argv: &[&str]) -> (Result<i32>, String) {
    let args = cli_args(path, argv);
    let mut out = Vec::new();
    let result = run::run_with(&args, &mut out).await;
    (result, String::from_utf8_lossy(&out).into_owned())
}

/// Shell-quoted path for embedding in task code.
pub fn sh_path(path: &Path) -> String {
    format!("'{}'", path.display())
}
