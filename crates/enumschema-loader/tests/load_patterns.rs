//! Filesystem pattern loading tests.

use enumschema_loader::{BuildContext, ConstValue, GoSourceLoader, LoadError, SourceLoader};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn fruit_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "b_fruit.go",
        "package fruit\n\nconst (\n\tCherry Fruit = iota + 2 // cherry\n)\n",
    );
    write(
        temp.path(),
        "a_fruit.go",
        "package fruit\n\ntype Fruit uint8\n\nconst (\n\tApple Fruit = iota\n\tBanana\n)\n",
    );
    write(
        temp.path(),
        "fruit_test.go",
        "package fruit_test\n\nconst Broken = \n",
    );
    temp
}

#[test]
fn test_directory_pattern_sorts_files_and_skips_tests() {
    let temp = fruit_dir();
    let loader = GoSourceLoader::new();
    let packages = loader
        .load(&[temp.path().display().to_string()])
        .unwrap();

    assert_eq!(packages.len(), 1);
    let pkg = &packages[0];
    assert_eq!(pkg.name, "fruit");
    assert_eq!(pkg.files.len(), 2);
    assert!(pkg.files[0].name.ends_with("a_fruit.go"));
    assert_eq!(pkg.lookup_const("Cherry").unwrap().value, ConstValue::Int(2));
    assert!(pkg.diagnostics.is_empty());
}

#[test]
fn test_base_dir_and_default_pattern() {
    let temp = fruit_dir();
    let packages = GoSourceLoader::new()
        .with_base_dir(temp.path())
        .load(&[])
        .unwrap();
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].dir, temp.path().join("."));
}

#[test]
fn test_file_patterns_keep_given_order() {
    let temp = fruit_dir();
    let packages = GoSourceLoader::new()
        .with_base_dir(temp.path())
        .load(&["b_fruit.go".to_string(), "a_fruit.go".to_string()])
        .unwrap();

    let pkg = &packages[0];
    assert!(pkg.files[0].name.ends_with("b_fruit.go"));
    assert!(pkg.files[1].name.ends_with("a_fruit.go"));
    assert_eq!(pkg.symbols.len(), 3);
}

#[test]
fn test_mixing_files_and_directories_fails() {
    let temp = fruit_dir();
    let err = GoSourceLoader::new()
        .with_base_dir(temp.path())
        .load(&["a_fruit.go".to_string(), ".".to_string()])
        .unwrap_err();
    assert!(matches!(err, LoadError::MixedPatterns { ref pattern } if pattern == "."));
}

#[test]
fn test_missing_pattern_fails() {
    let temp = TempDir::new().unwrap();
    let err = GoSourceLoader::new()
        .with_base_dir(temp.path())
        .load(&["nope".to_string()])
        .unwrap_err();
    assert!(matches!(err, LoadError::PatternNotFound { .. }));
}

#[test]
fn test_directory_without_go_files_fails() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "README.md", "# nothing here\n");
    let err = GoSourceLoader::new()
        .load(&[temp.path().display().to_string()])
        .unwrap_err();
    assert!(matches!(err, LoadError::NoGoFiles { .. }));
}

#[test]
fn test_recursive_pattern_skips_special_directories() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "root.go", "package root\nconst A = 1\n");
    write(temp.path(), "sub/sub.go", "package sub\nconst B = 2\n");
    write(temp.path(), "sub/deeper/deep.go", "package deeper\n");
    write(temp.path(), "testdata/t.go", "package broken (\n");
    write(temp.path(), "vendor/v.go", "package broken (\n");
    write(temp.path(), ".hidden/h.go", "package broken (\n");
    write(temp.path(), "empty/notes.txt", "no go here\n");

    let packages = GoSourceLoader::new()
        .with_base_dir(temp.path())
        .load(&["./...".to_string()])
        .unwrap();

    let names: Vec<_> = packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["root", "sub", "deeper"]);
}

#[test]
fn test_syntax_error_reports_file_and_line() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "bad.go", "package bad\n\nconst (\n\tA = )\n");
    let err = GoSourceLoader::new()
        .load(&[temp.path().display().to_string()])
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("bad.go:4:"), "{message}");
}

#[test]
fn test_mixed_package_clauses_in_directory() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.go", "package a\n");
    write(temp.path(), "b.go", "package b\n");
    let err = GoSourceLoader::new()
        .load(&[temp.path().display().to_string()])
        .unwrap_err();
    assert!(matches!(err, LoadError::MixedPackages { .. }));
}

fn linux_loader() -> GoSourceLoader {
    GoSourceLoader::new().with_build_context(BuildContext::new("linux", "amd64"))
}

#[test]
fn test_ignored_generator_file_is_skipped() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "fruit.go",
        "package fruit\n\ntype Fruit int\n\nconst Apple Fruit = 0\n",
    );
    write(
        temp.path(),
        "gen.go",
        "//go:build ignore\n\npackage main\n\nfunc main() {}\n",
    );

    let packages = linux_loader()
        .load(&[temp.path().display().to_string()])
        .unwrap();

    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].name, "fruit");
    assert_eq!(packages[0].files.len(), 1);
}

#[test]
fn test_other_platform_files_are_skipped() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "fruit.go",
        "package fruit\n\ntype Fruit int\n\nconst Apple Fruit = 0\n",
    );
    write(temp.path(), "x_windows.go", "package fruit\n\nconst Extra Fruit = 1\n");
    write(temp.path(), "x_linux_arm64.go", "package fruit\n\nconst Apple Fruit = 9\n");
    write(temp.path(), "x_linux.go", "package fruit\n\nconst Native Fruit = 2\n");
    write(
        temp.path(),
        "tagged.go",
        "//go:build darwin || windows\n\npackage fruit\n\nconst Tagged Fruit = 3\n",
    );

    let packages = linux_loader()
        .load(&[temp.path().display().to_string()])
        .unwrap();

    let pkg = &packages[0];
    let mut names: Vec<_> = pkg.symbols.iter().map(|(_, obj)| obj.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Apple", "Native"]);
    assert!(pkg.diagnostics.is_empty());
    assert_eq!(pkg.lookup_const("Apple").unwrap().value, ConstValue::Int(0));
}

#[test]
fn test_windows_context_picks_windows_files() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "fruit.go", "package fruit\n\nconst Apple = 0\n");
    write(temp.path(), "x_windows.go", "package fruit\n\nconst Extra = 1\n");

    let packages = GoSourceLoader::new()
        .with_build_context(BuildContext::new("windows", "amd64"))
        .load(&[temp.path().display().to_string()])
        .unwrap();
    assert!(packages[0].lookup_const("Extra").is_some());
}

#[test]
fn test_named_files_ignore_constraints() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "gen.go",
        "//go:build ignore\n\npackage main\n\nconst A = 1\n",
    );
    let packages = linux_loader()
        .with_base_dir(temp.path())
        .load(&["gen.go".to_string()])
        .unwrap();
    assert_eq!(packages[0].name, "main");
}

#[test]
fn test_all_files_excluded_is_no_go_files() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "gen.go", "//go:build ignore\n\npackage main\n");
    let err = linux_loader()
        .load(&[temp.path().display().to_string()])
        .unwrap_err();
    assert!(matches!(err, LoadError::NoGoFiles { .. }));
}

#[test]
fn test_malformed_build_line_fails() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "bad.go", "//go:build linux &&\n\npackage bad\n");
    let err = linux_loader()
        .load(&[temp.path().display().to_string()])
        .unwrap_err();
    assert!(matches!(err, LoadError::BuildConstraint { .. }));
    assert!(err.to_string().contains("bad.go"));
}
