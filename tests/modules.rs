use std::{fs, path::PathBuf};

use tox::{
    ToxError,
    error::{LoadError, TypeError},
    interpreter::loader::LoaderConfig,
    run_file_captured,
};

/// Builds a throwaway project tree under the system temp directory.
///
/// `files` maps project-relative paths to file contents. The tree is removed
/// when the fixture drops.
struct Project {
    root: PathBuf,
}

impl Project {
    fn new(name: &str, files: &[(&str, &str)]) -> Self {
        let root = std::env::temp_dir().join(format!("tox-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        for (path, contents) in files {
            let full = root.join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).expect("create fixture directory");
            }
            fs::write(full, contents).expect("write fixture file");
        }
        Self { root }
    }

    fn entry(&self) -> PathBuf {
        self.root.join("src/main.tox")
    }
}

impl Drop for Project {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn config() -> LoaderConfig {
    LoaderConfig::default()
}

#[test]
fn pub_functions_are_reachable_through_their_module() {
    let project = Project::new("visible",
                               &[("src/main.tox",
                                  "package main\nimport mathx\nfnc main () >> void { \
                                   log(mathx.add(2,3)) }\n"),
                                 ("src/mathx/mathx.tox",
                                  "package mathx\npub fnc add (a int, b int) >> int { return a \
                                   + b }\n")]);

    let lines = run_file_captured(&project.entry(), &config()).expect("program runs");
    assert_eq!(lines, vec!["5".to_string()]);
}

#[test]
fn private_functions_are_not_reachable() {
    let project = Project::new("private",
                               &[("src/main.tox",
                                  "package main\nimport mathx\nfnc main () >> void { \
                                   log(mathx.add(2,3)) }\n"),
                                 ("src/mathx/mathx.tox",
                                  "package mathx\nfnc add (a int, b int) >> int { return a + b \
                                   }\n")]);

    match run_file_captured(&project.entry(), &config()) {
        Err(ToxError::Type(errors)) => {
            assert!(errors.iter()
                          .any(|e| matches!(e, TypeError::UnknownFunction { name, .. }
                                            if name == "mathx.add")),
                    "{errors:?}");
        },
        other => panic!("expected an unknown-function diagnostic, got {other:?}"),
    }
}

#[test]
fn pub_lets_are_aliased_too() {
    let project = Project::new("publet",
                               &[("src/main.tox",
                                  "package main\nimport consts\nfnc main () >> void { \
                                   log(consts.answer) }\n"),
                                 ("src/consts/consts.tox",
                                  "package consts\npub let answer int >> 42\n")]);

    let lines = run_file_captured(&project.entry(), &config()).expect("program runs");
    assert_eq!(lines, vec!["42".to_string()]);
}

#[test]
fn imports_chain_across_modules() {
    let project = Project::new("chain",
                               &[("src/main.tox",
                                  "package main\nimport outer\nfnc main () >> void { \
                                   log(outer.double(4)) }\n"),
                                 ("src/outer/outer.tox",
                                  "package outer\nimport inner\npub fnc double (n int) >> int \
                                   { return inner.twice(n) }\n"),
                                 ("src/inner/inner.tox",
                                  "package inner\npub fnc twice (n int) >> int { return n + n \
                                   }\n")]);

    let lines = run_file_captured(&project.entry(), &config()).expect("program runs");
    assert_eq!(lines, vec!["8".to_string()]);
}

#[test]
fn all_files_of_a_directory_form_one_package() {
    let project = Project::new("siblings",
                               &[("src/main.tox",
                                  "package main\nfnc main () >> void { log(helper()) }\n"),
                                 ("src/extra.tox",
                                  "package main\nfnc helper () >> int { return 11 }\n")]);

    let lines = run_file_captured(&project.entry(), &config()).expect("program runs");
    assert_eq!(lines, vec!["11".to_string()]);
}

#[test]
fn package_mismatch_in_a_directory_is_fatal() {
    let project = Project::new("mismatch",
                               &[("src/main.tox",
                                  "package main\nfnc main () >> void { log(1) }\n"),
                                 ("src/extra.tox", "package other\n")]);

    match run_file_captured(&project.entry(), &config()) {
        Err(ToxError::Load(LoadError::PackageMismatch { .. })) => {},
        other => panic!("expected a package mismatch, got {other:?}"),
    }
}

#[test]
fn missing_imports_are_fatal() {
    let project = Project::new("missing",
                               &[("src/main.tox",
                                  "package main\nimport ghost\nfnc main () >> void { log(1) \
                                   }\n")]);

    match run_file_captured(&project.entry(), &config()) {
        Err(ToxError::Load(LoadError::ImportNotFound { path })) => assert_eq!(path, "ghost"),
        other => panic!("expected a missing import, got {other:?}"),
    }
}

#[test]
fn declared_package_must_match_the_directory() {
    let project = Project::new("badname",
                               &[("src/main.tox",
                                  "package main\nimport mathx\nfnc main () >> void { \
                                   log(mathx.add(1,1)) }\n"),
                                 ("src/mathx/mathx.tox",
                                  "package sums\npub fnc add (a int, b int) >> int { return a \
                                   + b }\n")]);

    match run_file_captured(&project.entry(), &config()) {
        Err(ToxError::Load(LoadError::PackageNameMismatch { .. })) => {},
        other => panic!("expected a package name mismatch, got {other:?}"),
    }
}

#[test]
fn project_prefix_is_stripped_from_imports() {
    let mut config = config();
    config.package_prefix = "myproj".to_string();

    let project = Project::new("prefix",
                               &[("src/main.tox",
                                  "package myproj\nimport myproj.mathx\nfnc main () >> void { \
                                   log(mathx.add(20, 1)) }\n"),
                                 ("src/mathx/mathx.tox",
                                  "package myproj.mathx\npub fnc add (a int, b int) >> int { \
                                   return a + b }\n")]);

    let lines = run_file_captured(&project.entry(), &config).expect("program runs");
    assert_eq!(lines, vec!["21".to_string()]);
}

#[test]
fn parse_errors_in_an_imported_file_are_fatal() {
    let project = Project::new("badimport",
                               &[("src/main.tox",
                                  "package main\nimport broken\nfnc main () >> void { log(1) \
                                   }\n"),
                                 ("src/broken/broken.tox", "package broken\nlet >> nope\n")]);

    match run_file_captured(&project.entry(), &config()) {
        Err(ToxError::Load(LoadError::Parse { errors, .. })) => assert!(!errors.is_empty()),
        other => panic!("expected parse errors, got {other:?}"),
    }
}
