// tests/executor_sequential.rs

mod common;

use std::error::Error;
use std::fs;

use common::{run_captured, sh_path};
use run::errors::RunError;
use run_test_utils::builders::write_config;
use run_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn test_sequence_runs_in_order() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("log");
    let config = write_config(&format!(
        "build:\n  - echo one >> {log}\n  - echo two >> {log}\n",
        log = sh_path(&log)
    ));

    let (result, out) = with_timeout(run_captured(config.path(), &["build"])).await;
    assert_eq!(result?, 0);
    assert_eq!(fs::read_to_string(&log)?, "one\ntwo\n");

    assert!(out.contains("[run] Prepared 'RUNARGS='"));
    assert!(out.contains("[run] Launched 'echo one >>"));
    assert!(out.contains("[run] Finished in "));
    Ok(())
}

#[tokio::test]
async fn test_sequence_stops_at_first_failure() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let before = dir.path().join("before");
    let after = dir.path().join("after");
    let config = write_config(&format!(
        "build:\n  - touch {}\n  - exit 3\n  - touch {}\n",
        sh_path(&before),
        sh_path(&after)
    ));

    let (result, out) = with_timeout(run_captured(config.path(), &["build"])).await;
    match result {
        Err(RunError::CommandFailed { code, status }) => {
            assert_eq!(code, "exit 3");
            assert_eq!(status, 3);
        }
        other => panic!("Expected CommandFailed, got: {:?}", other),
    }
    assert!(before.exists());
    assert!(!after.exists(), "commands after a failure must not spawn");
    assert!(!out.contains("[run] Finished"));
    Ok(())
}

#[tokio::test]
async fn test_variable_is_exported_before_dependents() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("port");
    let config = write_config(&format!(
        "PORT: echo 8080\nserve: printf '%s' \"$PORT\" > {}\n",
        sh_path(&log)
    ));

    let (result, out) = with_timeout(run_captured(config.path(), &["serve"])).await;
    assert_eq!(result?, 0);
    assert_eq!(fs::read_to_string(&log)?, "8080");
    assert!(out.contains("[run] Prepared 'PORT=8080; RUNARGS='"));
    Ok(())
}

#[tokio::test]
async fn test_variable_only_plan_prints_value() -> TestResult {
    init_tracing();
    let config = write_config("HOST: echo example.org\nPORT: printf '8080\\n\\n'\n");

    let (result, out) = with_timeout(run_captured(config.path(), &["PORT"])).await;
    assert_eq!(result?, 0);
    assert_eq!(out, "8080\n");
    Ok(())
}

#[tokio::test]
async fn test_arguments_are_forwarded() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("args");
    let config = write_config(&format!(
        "greet: printf '%s' \"$RUNARGS\" > {}\n",
        sh_path(&log)
    ));

    let (result, out) =
        with_timeout(run_captured(config.path(), &["greet", "hello", "--loud"])).await;
    assert_eq!(result?, 0);
    assert_eq!(fs::read_to_string(&log)?, "hello --loud");
    assert!(out.contains("RUNARGS=hello --loud"));
    Ok(())
}

#[tokio::test]
async fn test_runvars_file_is_merged() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let vars = dir.path().join("vars.env");
    let log = dir.path().join("greeting");
    fs::write(&vars, "# defaults\nGREETING=\"hi there\"\n")?;

    let config = write_config(&format!(
        "RUNVARS: echo {}\nshow: printf '%s' \"$GREETING\" > {}\n",
        sh_path(&vars),
        sh_path(&log)
    ));

    let (result, _) = with_timeout(run_captured(config.path(), &["show"])).await;
    assert_eq!(result?, 0);
    assert_eq!(fs::read_to_string(&log)?, "hi there");
    Ok(())
}

#[tokio::test]
async fn test_quiet_task_prints_no_status_lines() -> TestResult {
    init_tracing();
    let config = write_config("\"check!\":\n  - 'true'\n  - 'true'\n");

    let (result, out) = with_timeout(run_captured(config.path(), &["check"])).await;
    assert_eq!(result?, 0);
    assert!(!out.contains("[run]"), "unexpected output: {out}");
    Ok(())
}

#[tokio::test]
async fn test_unknown_task_is_an_error() -> TestResult {
    let config = write_config("build: make\n");
    let (result, out) = run_captured(config.path(), &["nope"]).await;
    assert!(matches!(result, Err(RunError::TaskNotFound(_))));
    assert!(out.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_completion_mode_prints_children() -> TestResult {
    let config = write_config("build:\n  - compile: make\n  - /docs: make docs\n  - echo\n");
    let mut args = common::cli_args(config.path(), &["build"]);
    args.complete = true;

    let mut out = Vec::new();
    assert_eq!(run::run_with(&args, &mut out).await?, 0);
    assert_eq!(String::from_utf8(out)?, "compile\ndocs\n");
    Ok(())
}
