//! Boundaries between the scaffolding core and the outside world
//!
//! The engine and the config-update flow only talk to prompts, the network
//! and external programs through these traits. The TUI, [`crate::templates`]
//! and [`crate::runtime`] modules provide the real implementations; tests use
//! scripted ones.

#![allow(async_fn_in_trait)]

use crate::engine::DependencySpec;
use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// One option of a select / multiselect prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub hint: String,
    /// Pre-selected in a multiselect
    pub selected: bool,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            hint: String::new(),
            selected: false,
        }
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Human interaction. Every question may return [`crate::Error::Cancelled`].
pub trait Prompter {
    /// Free-text answer; `initial` is pre-filled, `placeholder` is only shown
    fn text(&mut self, message: &str, placeholder: &str, initial: &str) -> Result<String>;

    /// Value of the single chosen option
    fn select(&mut self, message: &str, options: &[Choice]) -> Result<String>;

    /// Values of the chosen options
    fn multiselect(&mut self, message: &str, options: &[Choice], required: bool)
        -> Result<Vec<String>>;

    fn confirm(&mut self, message: &str, initial: bool) -> Result<bool>;

    fn info(&mut self, message: &str);
    fn warn(&mut self, message: &str);
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);

    /// Start a long-running step (spinner)
    fn start_progress(&mut self, message: &str) {
        self.info(message);
    }

    /// Finish the current long-running step
    fn stop_progress(&mut self, message: &str) {
        self.info(message);
    }
}

/// Entry of the license catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LicenseSummary {
    pub key: String,
    pub name: String,
}

/// Full license with its template text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LicenseText {
    pub key: String,
    pub name: String,
    pub body: String,
}

/// Remote text templates and the license catalog
pub trait TemplateSource {
    async fn fetch_template(&self, url: &str) -> Result<String>;
    async fn fetch_license_catalog(&self) -> Result<Vec<LicenseSummary>>;
    async fn fetch_license(&self, key: &str) -> Result<LicenseText>;
}

/// Package registry existence checks
pub trait Registry {
    /// True when the package exists and, if a version was given, some published
    /// version satisfies it
    async fn exists(&self, spec: &DependencySpec) -> Result<bool>;
}

/// Result of an external program that could be spawned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Last non-empty stderr line, falling back to stdout
    pub fn summary(&self) -> String {
        let pick = |s: &str| {
            s.lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .map(|l| l.trim().to_string())
        };
        pick(&self.stderr)
            .or_else(|| pick(&self.stdout))
            .unwrap_or_else(|| "no output".to_string())
    }
}

/// External programs (package manager, version control)
pub trait CommandRunner {
    /// Spawn failures are errors; a non-zero exit is `Ok` with `success == false`
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput>;
}
