//! Edit metadata fields of an existing package.json
//!
//! Values are collected one field at a time, URL-shaped fields are re-asked
//! until they parse, and nothing is written until the user confirms the full
//! set of pending changes.

pub mod fields;

pub use fields::ConfigField;

use crate::collab::{Choice, CommandRunner, Prompter};
use crate::error::Result;
use crate::manifest::{ManifestEditor, ManifestPatch};
use fields::{is_email, parse_keywords, validate_repository_url, validate_url};
use serde_json::{json, Value};
use url::Url;

/// Funding type written when the user leaves it blank
pub const DEFAULT_FUNDING_TYPE: &str = "individual";

#[derive(Debug, Clone)]
pub struct ConfigUpdateOptions {
    /// Show the pending changes and ask before writing
    pub confirm: bool,
    /// Run `<package manager> pkg fix` after writing
    pub run_fix: bool,
    pub package_manager: String,
    /// Suggested author when the manifest has none (usually the git user name)
    pub default_author: Option<String>,
}

impl Default for ConfigUpdateOptions {
    fn default() -> Self {
        Self {
            confirm: true,
            run_fix: true,
            package_manager: "npm".to_string(),
            default_author: None,
        }
    }
}

/// One collected field value
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChange {
    pub field: ConfigField,
    pub value: Value,
}

impl PendingChange {
    fn summary(&self) -> String {
        let rendered = match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        format!("{}: {}", self.field.key(), rendered)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOutcome {
    NothingSelected,
    /// The user declined the confirmation; the manifest is untouched
    Declined,
    Updated {
        changes: Vec<PendingChange>,
        /// Why `pkg fix` failed, if it ran and failed
        fix_error: Option<String>,
    },
}

/// Ask which fields to edit
pub fn prompt_fields<P: Prompter>(prompter: &mut P) -> Result<Vec<ConfigField>> {
    let options: Vec<Choice> = ConfigField::ALL
        .iter()
        .map(|f| Choice::new(f.key(), f.label()))
        .collect();
    let picked = prompter.multiselect("Select the fields you'd like to update:", &options, false)?;
    Ok(picked.iter().filter_map(|k| k.parse().ok()).collect())
}

/// Collect, confirm, persist, then optionally run `pkg fix`
pub async fn run<P: Prompter, C: CommandRunner>(
    manifest: &mut ManifestEditor,
    selected: &[ConfigField],
    prompter: &mut P,
    runner: &C,
    options: &ConfigUpdateOptions,
) -> Result<ConfigOutcome> {
    if selected.is_empty() {
        return Ok(ConfigOutcome::NothingSelected);
    }

    let mut changes = Vec::with_capacity(selected.len());
    for field in ConfigField::ALL.iter().filter(|f| selected.contains(f)) {
        let value = collect_field(*field, manifest, prompter, options)?;
        changes.push(PendingChange {
            field: *field,
            value,
        });
    }

    if options.confirm {
        let summary = changes
            .iter()
            .map(PendingChange::summary)
            .collect::<Vec<_>>()
            .join("\n");
        prompter.info(&format!("Pending changes:\n{}", summary));
        if !prompter.confirm("Write these changes to package.json?", true)? {
            return Ok(ConfigOutcome::Declined);
        }
    }

    let patch = changes
        .iter()
        .fold(ManifestPatch::new(), |patch, c| patch.set(c.field.key(), c.value.clone()));
    manifest.apply(&patch);
    manifest.persist().await?;
    tracing::debug!(fields = changes.len(), "updated manifest");

    let mut fix_error = None;
    if options.run_fix {
        let dir = manifest
            .path()
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();
        let args = ["pkg".to_string(), "fix".to_string()];
        let result = runner.run(&options.package_manager, &args, &dir).await;
        let failure = match result {
            Ok(out) if out.success => None,
            Ok(out) => Some(out.summary()),
            Err(e) => Some(e.to_string()),
        };
        if let Some(reason) = failure {
            prompter.warn(&format!(
                "`{} pkg fix` failed: {}. package.json was still updated.",
                options.package_manager, reason
            ));
            fix_error = Some(reason);
        }
    }

    Ok(ConfigOutcome::Updated { changes, fix_error })
}

fn collect_field<P: Prompter>(
    field: ConfigField,
    manifest: &ManifestEditor,
    prompter: &mut P,
    options: &ConfigUpdateOptions,
) -> Result<Value> {
    let current = current_display(manifest, field);

    let value = match field {
        ConfigField::Author => {
            let suggestion = current
                .clone()
                .or_else(|| options.default_author.clone())
                .unwrap_or_default();
            let name = required_text(
                prompter,
                "Enter the author of this package:",
                &suggestion,
            )?;
            Value::String(name)
        }
        ConfigField::Repository => {
            let url = prompt_url(
                prompter,
                "Enter a repository URL:",
                current.as_deref().unwrap_or(""),
                validate_repository_url,
            )?;
            json!({ "type": "git", "url": url })
        }
        ConfigField::Keywords => {
            let input = prompter.text(
                "Enter some keywords (comma-separated):",
                current.as_deref().unwrap_or(""),
                "",
            )?;
            Value::from(parse_keywords(&input))
        }
        ConfigField::Homepage => {
            let url = prompt_url(
                prompter,
                "Enter a homepage URL:",
                current.as_deref().unwrap_or(""),
                validate_url,
            )?;
            Value::String(url)
        }
        ConfigField::Funding => {
            let kind = prompter.text(
                "Enter the funding type (e.g. github, patreon, opencollective):",
                DEFAULT_FUNDING_TYPE,
                "",
            )?;
            let kind = match kind.trim() {
                "" => {
                    prompter.warn(&format!(
                        "No funding type given, using '{}'",
                        DEFAULT_FUNDING_TYPE
                    ));
                    DEFAULT_FUNDING_TYPE.to_string()
                }
                other => other.to_string(),
            };
            let url = prompt_url(
                prompter,
                "Enter a funding URL:",
                current.as_deref().unwrap_or(""),
                validate_url,
            )?;
            json!({ "type": kind, "url": url })
        }
        ConfigField::License => {
            let license = required_text(
                prompter,
                "Enter the license you wish to use (SPDX identifier):",
                current.as_deref().unwrap_or(""),
            )?;
            Value::String(license)
        }
        ConfigField::Bugs => loop {
            let input = prompter.text(
                "Enter a URL or email address for bug reports:",
                current.as_deref().unwrap_or(""),
                "",
            )?;
            let input = input.trim();
            if validate_url(input).is_ok() {
                break json!({ "url": input });
            }
            if is_email(input) {
                break json!({ "email": input });
            }
            prompter.warn(&format!("'{}' is neither a URL nor an email address", input));
        },
    };

    Ok(value)
}

/// Re-ask until the answer passes `validate`; returns the answer as typed
fn prompt_url<P: Prompter>(
    prompter: &mut P,
    message: &str,
    placeholder: &str,
    validate: fn(&str) -> std::result::Result<Url, String>,
) -> Result<String> {
    let mut initial = String::new();
    loop {
        let input = prompter.text(message, placeholder, &initial)?;
        match validate(&input) {
            Ok(_) => return Ok(input.trim().to_string()),
            Err(reason) => {
                prompter.warn(&reason);
                initial = input;
            }
        }
    }
}

/// Non-empty text; an empty answer takes `suggestion` when there is one
fn required_text<P: Prompter>(prompter: &mut P, message: &str, suggestion: &str) -> Result<String> {
    loop {
        let input = prompter.text(message, suggestion, "")?;
        let input = input.trim();
        if !input.is_empty() {
            return Ok(input.to_string());
        }
        if !suggestion.is_empty() {
            return Ok(suggestion.to_string());
        }
        prompter.warn("A value is required");
    }
}

/// Current value of a field, flattened for use as a placeholder
fn current_display(manifest: &ManifestEditor, field: ConfigField) -> Option<String> {
    let value = manifest.get(field.key())?;
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .get("url")
            .or_else(|| map.get("name"))
            .or_else(|| map.get("email"))
            .and_then(Value::as_str)?
            .to_string(),
        _ => return None,
    };
    Some(text).filter(|t| !t.is_empty())
}
