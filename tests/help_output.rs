// tests/help_output.rs

use std::error::Error;

use run::task::help::render_help;
use run::task::{resolve, Resolution, TaskTree};
use run_test_utils::builders::DescriptorBuilder;

type TestResult = Result<(), Box<dyn Error>>;

fn project() -> TaskTree {
    DescriptorBuilder::new()
        .code("HOST", "hostname")
        .group(
            DescriptorBuilder::named("build")
                .desc("Build everything")
                .code("compile", "make")
                .code("/docs", "make docs")
                .code("test", "make test"),
        )
        .group(
            DescriptorBuilder::named("((dev))")
                .code("api", "./api")
                .code("web", "./web"),
        )
        .tree()
}

fn render(tree: &TaskTree, argv: &[&str]) -> Result<String, Box<dyn Error>> {
    let argv: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
    let mut out = Vec::new();
    match resolve(tree.root(), &argv)? {
        Resolution::RootHelp { root } => render_help(&mut out, root, root, None, None)?,
        Resolution::Help {
            task,
            selected,
            plan,
            filters,
        } => render_help(&mut out, task, selected, Some(&plan), Some(&filters))?,
        Resolution::Execute { .. } => panic!("Expected help"),
    }
    Ok(String::from_utf8(out)?)
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} missing from:\n{haystack}"))
}

#[test]
fn test_root_help_lists_everything() -> TestResult {
    let tree = project();
    let text = render(&tree, &[])?;

    assert!(text.contains("General run description"));
    assert!(text.contains("run HOST"));
    assert!(text.contains("run build docs (optional)"));
    assert!(text.contains("run dev web"));
    assert!(text.contains("run (selected)"));
    assert!(!text.contains("Execution Plan"));

    assert!(position(&text, "Description") < position(&text, "Vars"));
    assert!(position(&text, "Vars") < position(&text, "Tasks"));
    Ok(())
}

#[test]
fn test_task_help_marks_filters() -> TestResult {
    let tree = project();
    let text = render(&tree, &["build", "+docs", "-compile", "?"])?;

    assert!(text.contains("Build everything"));
    assert!(text.contains("run build (selected)"));
    assert!(text.contains("run build docs (optional) (enabled)"));
    assert!(text.contains("run build compile (disabled)"));
    assert!(!text.contains("run dev"), "only the top-level branch is shown");

    assert!(text.contains("Execution Plan"));
    assert!(text.contains("HOST='hostname'\n[SEQUENCE]\n    make docs $RUNARGS\n    make test"));
    Ok(())
}

#[test]
fn test_leaf_help_selects_the_leaf() -> TestResult {
    let tree = project();
    let text = render(&tree, &["build", "test", "?"])?;

    assert!(text.contains("Build everything"), "help is rendered for the top-level task");
    assert!(text.contains("run build test (selected)"));
    assert!(!text.contains("run build (selected)"));
    assert!(text.contains("HOST='hostname'\nmake test $RUNARGS"));
    Ok(())
}

#[test]
fn test_grouped_plan_is_explained_with_header() -> TestResult {
    let tree = project();
    let text = render(&tree, &["dev", "?"])?;

    assert!(text.contains("HOST='hostname'\n[MULTIPLEX]\n    ./api $RUNARGS\n    ./web"));
    Ok(())
}

#[test]
fn test_picked_tasks_are_marked() -> TestResult {
    let tree = project();
    let text = render(&tree, &["build", "=test", "?"])?;
    assert!(text.contains("run build test (picked)"));
    assert!(text.contains("HOST='hostname'\n[SEQUENCE]\n    make test $RUNARGS"));
    Ok(())
}
