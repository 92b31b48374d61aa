mod common;

use common::*;
use create_ps_core::config_update::{self, ConfigField, ConfigOutcome, ConfigUpdateOptions};
use create_ps_core::ManifestEditor;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;

fn no_fix() -> ConfigUpdateOptions {
    ConfigUpdateOptions {
        run_fix: false,
        ..ConfigUpdateOptions::default()
    }
}

#[tokio::test]
async fn test_homepage_is_reprompted_until_valid() {
    let dir = package_dir();
    let mut manifest = ManifestEditor::load_from_dir(dir.path()).await.unwrap();
    let mut prompter = ScriptedPrompter::new()
        .answer_text("not a url")
        .answer_text("https://example.com")
        .answer_confirm(true);

    let outcome = config_update::run(
        &mut manifest,
        &[ConfigField::Homepage],
        &mut prompter,
        &FakeRunner::ok(),
        &no_fix(),
    )
    .await
    .unwrap();

    assert!(matches!(outcome, ConfigOutcome::Updated { .. }));
    assert_eq!(prompter.warnings.len(), 1);
    // The rejected answer is pre-filled for correction
    assert_eq!(prompter.text_calls[1].1, "not a url");
    assert_eq!(read_manifest(dir.path())["homepage"], "https://example.com");
}

#[tokio::test]
async fn test_blank_funding_type_defaults_to_individual() {
    let dir = package_dir();
    let mut manifest = ManifestEditor::load_from_dir(dir.path()).await.unwrap();
    let mut prompter = ScriptedPrompter::new()
        .answer_text("")
        .answer_text("https://example.com/sponsor")
        .answer_confirm(true);

    config_update::run(
        &mut manifest,
        &[ConfigField::Funding],
        &mut prompter,
        &FakeRunner::ok(),
        &no_fix(),
    )
    .await
    .unwrap();

    assert!(prompter.warnings[0].contains("individual"));
    assert_eq!(
        read_manifest(dir.path())["funding"],
        json!({ "type": "individual", "url": "https://example.com/sponsor" })
    );
}

#[tokio::test]
async fn test_fields_are_written_in_their_shapes() {
    let dir = package_dir();
    let mut manifest = ManifestEditor::load_from_dir(dir.path()).await.unwrap();
    // Prompts follow field order, not selection order
    let mut prompter = ScriptedPrompter::new()
        .answer_text("Ada Lovelace")
        .answer_text("git+https://github.com/ada/my-lib.git")
        .answer_text("cli, scaffold,, npm ")
        .answer_text("MIT")
        .answer_text("bugs@example.com")
        .answer_confirm(true);

    let outcome = config_update::run(
        &mut manifest,
        &[
            ConfigField::Bugs,
            ConfigField::License,
            ConfigField::Keywords,
            ConfigField::Repository,
            ConfigField::Author,
        ],
        &mut prompter,
        &FakeRunner::ok(),
        &no_fix(),
    )
    .await
    .unwrap();

    let ConfigOutcome::Updated { changes, fix_error } = outcome else {
        panic!("expected an update");
    };
    assert_eq!(changes.len(), 5);
    assert_eq!(fix_error, None);

    let written = read_manifest(dir.path());
    assert_eq!(written["author"], "Ada Lovelace");
    assert_eq!(
        written["repository"],
        json!({ "type": "git", "url": "git+https://github.com/ada/my-lib.git" })
    );
    assert_eq!(written["keywords"], json!(["cli", "scaffold", "npm"]));
    assert_eq!(written["license"], "MIT");
    assert_eq!(written["bugs"], json!({ "email": "bugs@example.com" }));
}

#[tokio::test]
async fn test_bugs_accepts_url() {
    let dir = package_dir();
    let mut manifest = ManifestEditor::load_from_dir(dir.path()).await.unwrap();
    let mut prompter = ScriptedPrompter::new()
        .answer_text("nobody")
        .answer_text("https://github.com/ada/my-lib/issues")
        .answer_confirm(true);

    config_update::run(
        &mut manifest,
        &[ConfigField::Bugs],
        &mut prompter,
        &FakeRunner::ok(),
        &no_fix(),
    )
    .await
    .unwrap();

    assert_eq!(
        read_manifest(dir.path())["bugs"],
        json!({ "url": "https://github.com/ada/my-lib/issues" })
    );
}

#[tokio::test]
async fn test_declined_confirmation_writes_nothing() {
    let dir = package_dir();
    let before = fs::read_to_string(dir.path().join("package.json")).unwrap();
    let mut manifest = ManifestEditor::load_from_dir(dir.path()).await.unwrap();
    let mut prompter = ScriptedPrompter::new().answer_text("MIT").answer_confirm(false);
    let runner = FakeRunner::ok();

    let outcome = config_update::run(
        &mut manifest,
        &[ConfigField::License],
        &mut prompter,
        &runner,
        &ConfigUpdateOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, ConfigOutcome::Declined);
    assert!(prompter.infos[0].contains("license: MIT"));
    assert_eq!(
        fs::read_to_string(dir.path().join("package.json")).unwrap(),
        before
    );
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_pkg_fix_failure_keeps_the_write() {
    let dir = package_dir();
    let mut manifest = ManifestEditor::load_from_dir(dir.path()).await.unwrap();
    let mut prompter = ScriptedPrompter::new().answer_text("MIT").answer_confirm(true);
    let runner = FakeRunner::failing();

    let outcome = config_update::run(
        &mut manifest,
        &[ConfigField::License],
        &mut prompter,
        &runner,
        &ConfigUpdateOptions::default(),
    )
    .await
    .unwrap();

    let ConfigOutcome::Updated { fix_error, .. } = outcome else {
        panic!("expected an update");
    };
    assert!(fix_error.is_some());
    assert_eq!(
        runner.calls(),
        vec![("npm".to_string(), vec!["pkg".to_string(), "fix".to_string()])]
    );
    assert_eq!(read_manifest(dir.path())["license"], "MIT");
    assert!(prompter.warnings[0].contains("pkg fix"));
}

#[tokio::test]
async fn test_without_confirmation_writes_directly() {
    let dir = package_dir();
    let mut manifest = ManifestEditor::load_from_dir(dir.path()).await.unwrap();
    let mut prompter = ScriptedPrompter::new().answer_text("https://example.com/docs");
    let options = ConfigUpdateOptions {
        confirm: false,
        run_fix: false,
        ..ConfigUpdateOptions::default()
    };

    config_update::run(
        &mut manifest,
        &[ConfigField::Homepage],
        &mut prompter,
        &FakeRunner::ok(),
        &options,
    )
    .await
    .unwrap();

    assert!(prompter.confirm_calls.is_empty());
    assert_eq!(read_manifest(dir.path())["homepage"], "https://example.com/docs");
}

#[tokio::test]
async fn test_nothing_selected() {
    let dir = package_dir();
    let mut manifest = ManifestEditor::load_from_dir(dir.path()).await.unwrap();
    let mut prompter = ScriptedPrompter::new().answer_multiselect(&[]);

    let fields = config_update::prompt_fields(&mut prompter).unwrap();
    let outcome = config_update::run(
        &mut manifest,
        &fields,
        &mut prompter,
        &FakeRunner::ok(),
        &ConfigUpdateOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, ConfigOutcome::NothingSelected);
}
