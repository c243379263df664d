use explain_core::{discover, RunConfig};
use std::fs;
use tempfile::TempDir;

fn create_test_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::write(root.join("main.py"), "print('hi')\n").unwrap();
    fs::write(root.join("schema.sql"), "CREATE TABLE t (id INT);\n").unwrap();
    fs::write(root.join("README.md"), "# readme\n").unwrap();

    fs::create_dir(root.join("pkg")).unwrap();
    fs::write(root.join("pkg/b.py"), "x = 1\n").unwrap();
    fs::write(root.join("pkg/a.py"), "y = 2\n").unwrap();

    fs::create_dir_all(root.join(".github/workflows")).unwrap();
    fs::write(root.join(".github/workflows/ci.py"), "ci = True\n").unwrap();

    fs::create_dir_all(root.join("venv/lib")).unwrap();
    fs::write(root.join("venv/lib/site.py"), "site = 1\n").unwrap();

    fs::create_dir_all(root.join("pkg/__pycache__")).unwrap();
    fs::write(root.join("pkg/__pycache__/cached.py"), "c = 1\n").unwrap();

    dir
}

fn names(config: &RunConfig) -> Vec<String> {
    discover(config)
        .unwrap()
        .into_iter()
        .map(|f| f.display_name)
        .collect()
}

#[test]
fn test_discovers_default_extensions_in_order() {
    let dir = create_test_repo();
    let config = RunConfig::new(dir.path());

    assert_eq!(
        names(&config),
        vec!["main.py", "schema.sql", "pkg/a.py", "pkg/b.py"]
    );
}

#[test]
fn test_skip_markers_prune_subtrees() {
    let dir = create_test_repo();
    let found = names(&RunConfig::new(dir.path()));

    assert!(!found.iter().any(|f| f.contains(".github")));
    assert!(!found.iter().any(|f| f.contains("venv")));
    assert!(!found.iter().any(|f| f.contains("__pycache__")));
}

#[test]
fn test_extra_skip_marker() {
    let dir = create_test_repo();
    let config = RunConfig::new(dir.path()).with_skip_markers(["pkg"]);

    assert_eq!(names(&config), vec!["main.py", "schema.sql"]);
}

#[test]
fn test_custom_extensions() {
    let dir = create_test_repo();
    let config = RunConfig::new(dir.path()).with_extensions([".md"]);

    assert_eq!(names(&config), vec!["README.md"]);
}

#[test]
fn test_excluded_file_is_skipped() {
    let dir = create_test_repo();
    let config = RunConfig::new(dir.path()).with_excluded(dir.path().join("main.py"));

    let found = names(&config);
    assert!(!found.contains(&"main.py".to_string()));
    assert!(found.contains(&"schema.sql".to_string()));
}

#[test]
fn test_source_paths_exist() {
    let dir = create_test_repo();
    for file in discover(&RunConfig::new(dir.path())).unwrap() {
        assert!(file.path.is_file(), "{} should exist", file.path.display());
    }
}

#[test]
fn test_empty_tree_yields_nothing() {
    let dir = TempDir::new().unwrap();
    assert!(discover(&RunConfig::new(dir.path())).unwrap().is_empty());
}

#[test]
fn test_missing_root_is_config_error() {
    let dir = TempDir::new().unwrap();
    let config = RunConfig::new(dir.path().join("nope"));
    assert!(discover(&config).is_err());
}

#[cfg(unix)]
#[test]
fn test_symlinked_file_is_discovered() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("real.txt"), "z = 3\n").unwrap();
    std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.py")).unwrap();

    let files = discover(&RunConfig::new(root)).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].display_name, "link.py");
    assert_eq!(fs::read_to_string(&files[0].path).unwrap(), "z = 3\n");
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_is_not_followed() {
    let dir = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("far.py"), "far = 1\n").unwrap();
    std::os::unix::fs::symlink(outside.path(), dir.path().join("linked")).unwrap();

    assert!(names(&RunConfig::new(dir.path())).is_empty());
}
