// tests/navigator.rs

use run::task::TaskTree;
use run_test_utils::builders::DescriptorBuilder;

fn sample_tree() -> TaskTree {
    DescriptorBuilder::new()
        .code("HOST", "echo localhost")
        .group(
            DescriptorBuilder::named("build")
                .code("PROFILE", "echo release")
                .code("compile", "cargo build")
                .group(
                    DescriptorBuilder::named("docs")
                        .code("api", "cargo doc")
                        .code("book", "mdbook build"),
                )
                .code("", "echo done"),
        )
        .code("PORT", "echo 8080")
        .code("test", "cargo test")
        .tree()
}

fn names(tasks: &[run::task::Task<'_>]) -> Vec<String> {
    tasks.iter().map(|t| t.qualified_name()).collect()
}

#[test]
fn test_qualified_names_skip_unnamed_nodes() {
    let tree = sample_tree();
    let build = tree.root().find_child_by_name("build").unwrap();
    let children = build.children();

    assert_eq!(build.qualified_name(), "run build");
    assert_eq!(children[2].children()[1].qualified_name(), "run build docs book");
    assert_eq!(children[3].qualified_name(), "run build");
}

#[test]
fn test_parents_are_root_first() {
    let tree = sample_tree();
    let build = tree.root().find_child_by_name("build").unwrap();
    let book = build.find_child_by_name("docs").unwrap().children()[1];

    let parents: Vec<&str> = book.parents().iter().map(|t| t.name()).collect();
    assert_eq!(parents, vec!["run", "build", "docs"]);
    assert!(tree.root().parents().is_empty());
}

#[test]
fn test_flatten_general_tasks_expands_in_place() {
    let tree = sample_tree();
    let build = tree.root().find_child_by_name("build").unwrap();

    assert_eq!(
        names(&build.flatten_general_tasks()),
        vec![
            "run build PROFILE",
            "run build compile",
            "run build docs api",
            "run build docs book",
            "run build",
        ]
    );

    let test = tree.root().find_child_by_name("test").unwrap();
    assert_eq!(test.flatten_general_tasks(), vec![test]);
}

#[test]
fn test_setup_tasks_precede_the_branch() {
    let tree = sample_tree();
    let build = tree.root().find_child_by_name("build").unwrap();
    let api = build.find_child_by_name("docs").unwrap().children()[0];

    // PORT is declared after `build`, so it is not part of its setup.
    assert_eq!(
        names(&api.flatten_setup_tasks()),
        vec!["run HOST", "run build PROFILE"]
    );

    let test = tree.root().find_child_by_name("test").unwrap();
    assert_eq!(names(&test.flatten_setup_tasks()), vec!["run HOST", "run PORT"]);
}

#[test]
fn test_preorder_includes_composites() {
    let tree = sample_tree();
    let build = tree.root().find_child_by_name("build").unwrap();

    assert_eq!(
        names(&build.flatten_childs_with_composite()),
        vec![
            "run build PROFILE",
            "run build compile",
            "run build docs",
            "run build docs api",
            "run build docs book",
            "run build",
        ]
    );
}

#[test]
fn test_find_by_name_searches_leaves() {
    let tree = sample_tree();
    let root = tree.root();

    let found = root.find_child_tasks_by_name("book");
    assert_eq!(names(&found), vec!["run build docs book"]);

    // Composite nodes are not leaves.
    assert!(root.find_child_tasks_by_name("docs").is_empty());
}

#[test]
fn test_abbreviation_walks_one_level_per_letter() {
    let tree = sample_tree();
    let root = tree.root();

    let book = root.find_child_task_by_abbreviation("bdb").unwrap();
    assert_eq!(book.qualified_name(), "run build docs book");

    let test = root.find_child_task_by_abbreviation("t").unwrap();
    assert_eq!(test.qualified_name(), "run test");

    assert!(root.find_child_task_by_abbreviation("bx").is_none());
    assert!(root.find_child_task_by_abbreviation("").is_none());
}
