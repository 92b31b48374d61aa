mod common;

use common::*;
use create_ps_core::engine::{FeatureOutcome, RunState};
use create_ps_core::{ConflictPolicy, ModuleSystem, Selection};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

#[tokio::test]
async fn test_writes_exactly_the_selected_outputs() {
    let dir = package_dir();
    let selection = Selection::new("my-lib", ModuleSystem::CommonJs)
        .features(["src", "readme", "changelog", "assets", "workflows"]);

    let report = scaffold(
        dir.path(),
        &selection,
        &mut ScriptedPrompter::new(),
        &FakeTemplates::online(),
        &FakeRegistry::default(),
        &FakeRunner::ok(),
        ConflictPolicy::default(),
    )
    .await
    .unwrap();

    assert!(report.is_success());
    assert_eq!(report.state, RunState::Reported);
    assert_eq!(
        tree(dir.path()),
        paths(&[
            ".github",
            ".github/workflows",
            ".github/workflows/workflow.yml",
            "CHANGELOG.md",
            "README.md",
            "assets",
            "src",
            "src/index.js",
        ])
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
        "# Changelog\n\n## v1.0.0 (2025-03-14)\n\n* Initial commit\n"
    );
}

#[tokio::test]
async fn test_second_run_with_overwrite_is_idempotent() {
    let dir = package_dir();
    let selection = Selection::new("my-lib", ModuleSystem::Esm)
        .features(["src", "test", "docs", "readme", "changelog", "i18n", "dependabot"]);

    let templates = FakeTemplates::online();
    let registry = FakeRegistry::default();
    let runner = FakeRunner::ok();

    scaffold(
        dir.path(),
        &selection,
        &mut ScriptedPrompter::new(),
        &templates,
        &registry,
        &runner,
        ConflictPolicy::default(),
    )
    .await
    .unwrap();
    let first: Vec<(PathBuf, Vec<u8>)> = snapshot(dir.path());
    let first_manifest = fs::read_to_string(dir.path().join("package.json")).unwrap();

    // Everything collides now; declining the skip rewrites it all
    let mut prompter = ScriptedPrompter::new().answer_confirm(false);
    let report = scaffold(
        dir.path(),
        &selection,
        &mut prompter,
        &templates,
        &registry,
        &runner,
        ConflictPolicy::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.succeeded().count(), 7);
    assert_eq!(snapshot(dir.path()), first);
    assert_eq!(
        fs::read_to_string(dir.path().join("package.json")).unwrap(),
        first_manifest
    );
}

fn snapshot(root: &std::path::Path) -> Vec<(PathBuf, Vec<u8>)> {
    tree(root)
        .into_iter()
        .filter(|p| root.join(p).is_file())
        .map(|p| {
            let bytes = fs::read(root.join(&p)).unwrap();
            (p, bytes)
        })
        .collect()
}

#[tokio::test]
async fn test_esm_entry_point_updates_manifest() {
    let dir = package_dir();
    let selection = Selection::new("my-lib", ModuleSystem::Esm).feature("src");

    let report = scaffold(
        dir.path(),
        &selection,
        &mut ScriptedPrompter::new(),
        &FakeTemplates::online(),
        &FakeRegistry::default(),
        &FakeRunner::ok(),
        ConflictPolicy::default(),
    )
    .await
    .unwrap();

    assert!(report.is_success());
    assert_eq!(tree(dir.path()), paths(&["src", "src/index.mjs"]));
    assert_eq!(fs::read_to_string(dir.path().join("src/index.mjs")).unwrap(), "");

    let manifest = read_manifest(dir.path());
    assert_eq!(manifest["type"], "module");
    assert_eq!(manifest["exports"], "./src/index.mjs");
    assert!(manifest.get("main").is_none());
}

#[tokio::test]
async fn test_commonjs_entry_point_updates_manifest() {
    let dir = package_dir();
    let selection = Selection::new("my-lib", ModuleSystem::CommonJs).feature("src");

    scaffold(
        dir.path(),
        &selection,
        &mut ScriptedPrompter::new(),
        &FakeTemplates::online(),
        &FakeRegistry::default(),
        &FakeRunner::ok(),
        ConflictPolicy::default(),
    )
    .await
    .unwrap();

    assert!(dir.path().join("src/index.js").is_file());
    let manifest = read_manifest(dir.path());
    assert_eq!(manifest["type"], "commonjs");
    assert_eq!(manifest["main"], "./src/index.js");
    assert!(manifest.get("exports").is_none());
}

#[tokio::test]
async fn test_readme_links_contributing_and_license() {
    let dir = package_dir();
    let selection = Selection::new("my-lib", ModuleSystem::CommonJs)
        .features(["readme", "contributing", "license"]);
    let mut prompter = ScriptedPrompter::new().answer_select("mit");

    let report = scaffold(
        dir.path(),
        &selection,
        &mut prompter,
        &FakeTemplates::online(),
        &FakeRegistry::default(),
        &FakeRunner::ok(),
        ConflictPolicy::default(),
    )
    .await
    .unwrap();

    assert!(report.is_success());
    let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert!(readme.starts_with("# my-lib\n"));
    assert!(readme.contains("const myLib = require('my-lib');"));
    assert!(readme.contains("[contributing guidelines](CONTRIBUTING.md)"));
    assert!(readme.contains("This project is licensed under the [MIT License](LICENSE)."));

    assert_eq!(
        fs::read_to_string(dir.path().join("LICENSE")).unwrap(),
        "MIT License\n\nCopyright (c) 2025 Ada Lovelace\n"
    );
}

#[tokio::test]
async fn test_readme_alone_has_no_links() {
    let dir = package_dir();
    let selection = Selection::new("my-lib", ModuleSystem::Esm).feature("readme");

    scaffold(
        dir.path(),
        &selection,
        &mut ScriptedPrompter::new(),
        &FakeTemplates::online(),
        &FakeRegistry::default(),
        &FakeRunner::ok(),
        ConflictPolicy::default(),
    )
    .await
    .unwrap();

    let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert!(readme.contains("import myLib from 'my-lib';"));
    assert!(!readme.contains("CONTRIBUTING.md"));
    assert!(!readme.contains("(LICENSE)"));
}

#[tokio::test]
async fn test_declined_skip_overwrites_existing_file() {
    let dir = package_dir();
    fs::write(dir.path().join("README.md"), "old readme\n").unwrap();
    let selection = Selection::new("my-lib", ModuleSystem::CommonJs).feature("readme");
    let mut prompter = ScriptedPrompter::new().answer_confirm(false);

    let report = scaffold(
        dir.path(),
        &selection,
        &mut prompter,
        &FakeTemplates::online(),
        &FakeRegistry::default(),
        &FakeRunner::ok(),
        ConflictPolicy::SkipColliding,
    )
    .await
    .unwrap();

    assert_eq!(
        prompter.confirm_calls,
        vec!["Skip the features whose files already exist?".to_string()]
    );
    assert!(matches!(
        report.get("readme"),
        Some(FeatureOutcome::Succeeded { .. })
    ));
    let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert!(readme.starts_with("# my-lib\n"));
}

#[tokio::test]
async fn test_accepted_skip_leaves_existing_file() {
    let dir = package_dir();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs/guide.md"), "mine\n").unwrap();
    let selection = Selection::new("my-lib", ModuleSystem::CommonJs).features(["docs", "readme"]);
    let mut prompter = ScriptedPrompter::new().answer_confirm(true);

    let report = scaffold(
        dir.path(),
        &selection,
        &mut prompter,
        &FakeTemplates::online(),
        &FakeRegistry::default(),
        &FakeRunner::ok(),
        ConflictPolicy::SkipColliding,
    )
    .await
    .unwrap();

    assert!(matches!(report.get("docs"), Some(FeatureOutcome::Skipped { .. })));
    assert!(!dir.path().join("docs/example.md").exists());
    assert!(dir.path().join("README.md").is_file());
}

#[tokio::test]
async fn test_abort_policy_writes_nothing() {
    let dir = package_dir();
    fs::write(dir.path().join("README.md"), "old readme\n").unwrap();
    let selection = Selection::new("my-lib", ModuleSystem::CommonJs).features(["readme", "changelog"]);
    let mut prompter = ScriptedPrompter::new().answer_confirm(false);

    let report = scaffold(
        dir.path(),
        &selection,
        &mut prompter,
        &FakeTemplates::online(),
        &FakeRegistry::default(),
        &FakeRunner::ok(),
        ConflictPolicy::AbortOnDecline,
    )
    .await
    .unwrap();

    assert!(report.is_aborted());
    assert_eq!(
        fs::read_to_string(dir.path().join("README.md")).unwrap(),
        "old readme\n"
    );
    assert!(!dir.path().join("CHANGELOG.md").exists());
}

#[tokio::test]
async fn test_unknown_feature_is_ignored() {
    let dir = package_dir();
    let selection = Selection::new("my-lib", ModuleSystem::CommonJs).features(["bogus", "changelog"]);

    let report = scaffold(
        dir.path(),
        &selection,
        &mut ScriptedPrompter::new(),
        &FakeTemplates::online(),
        &FakeRegistry::default(),
        &FakeRunner::ok(),
        ConflictPolicy::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.get("bogus"), Some(&FeatureOutcome::Ignored));
    assert!(report.is_success());
    assert_eq!(tree(dir.path()), paths(&["CHANGELOG.md"]));
}

#[tokio::test]
async fn test_gitignore_falls_back_offline() {
    let dir = package_dir();
    let selection = Selection::new("my-lib", ModuleSystem::CommonJs)
        .features(["gitignore", "code_of_conduct", "changelog"]);
    let mut prompter = ScriptedPrompter::new();

    let report = scaffold(
        dir.path(),
        &selection,
        &mut prompter,
        &FakeTemplates::offline(),
        &FakeRegistry::default(),
        &FakeRunner::ok(),
        ConflictPolicy::default(),
    )
    .await
    .unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join(".gitignore")).unwrap(),
        "node_modules/\n"
    );
    match report.get("gitignore") {
        Some(FeatureOutcome::Succeeded { note, .. }) => assert!(note.is_some()),
        other => panic!("unexpected gitignore outcome: {:?}", other),
    }

    // No fallback for the code of conduct, and the run carries on
    assert!(matches!(
        report.get("code_of_conduct"),
        Some(FeatureOutcome::Failed { .. })
    ));
    assert!(!dir.path().join("CODE_OF_CONDUCT.md").exists());
    assert!(dir.path().join("CHANGELOG.md").is_file());
    assert_eq!(prompter.warnings.len(), 1);
}

#[tokio::test]
async fn test_remote_templates_get_project_name() {
    let dir = package_dir();
    let selection = Selection::new("my-lib", ModuleSystem::CommonJs).features(["code_of_conduct", "gitignore"]);

    scaffold(
        dir.path(),
        &selection,
        &mut ScriptedPrompter::new(),
        &FakeTemplates::online(),
        &FakeRegistry::default(),
        &FakeRunner::ok(),
        ConflictPolicy::default(),
    )
    .await
    .unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("CODE_OF_CONDUCT.md")).unwrap(),
        "# Code of Conduct for my-lib\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join(".gitignore")).unwrap(),
        "node_modules/\ndist/\n"
    );
}

#[tokio::test]
async fn test_name_and_description_are_persisted_in_place() {
    let dir = package_dir();
    let selection = Selection::new("renamed-lib", ModuleSystem::CommonJs)
        .description("  A tiny package  ")
        .feature("changelog");

    scaffold(
        dir.path(),
        &selection,
        &mut ScriptedPrompter::new(),
        &FakeTemplates::online(),
        &FakeRegistry::default(),
        &FakeRunner::ok(),
        ConflictPolicy::default(),
    )
    .await
    .unwrap();

    let manifest = read_manifest(dir.path());
    assert_eq!(manifest["name"], "renamed-lib");
    assert_eq!(manifest["description"], "A tiny package");
    let keys: Vec<&str> = manifest
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["name", "version", "main", "description"]);
}

#[tokio::test]
async fn test_malformed_manifest_is_fatal() {
    let dir = package_dir();
    fs::write(dir.path().join("package.json"), "[1, 2]").unwrap();
    let selection = Selection::new("my-lib", ModuleSystem::CommonJs).feature("readme");

    let err = scaffold(
        dir.path(),
        &selection,
        &mut ScriptedPrompter::new(),
        &FakeTemplates::online(),
        &FakeRegistry::default(),
        &FakeRunner::ok(),
        ConflictPolicy::default(),
    )
    .await
    .unwrap_err();

    assert!(err.is_fatal());
    assert!(!dir.path().join("README.md").exists());
}
