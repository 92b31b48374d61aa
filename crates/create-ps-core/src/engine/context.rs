//! Per-run state threaded through the feature handlers

use crate::features::FeatureKey;
use crate::manifest::ModuleSystem;
use crate::templates::render::RenderContext;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// What one feature handler produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Materialized {
    pub paths: Vec<PathBuf>,
    pub note: Option<String>,
}

impl Materialized {
    pub fn paths(paths: Vec<PathBuf>) -> Self {
        Self { paths, note: None }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// State shared by the handlers of one run.
///
/// Results one feature produces for another (the license name the README
/// mentions, the entry file dependencies are imported into) live here.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub target: PathBuf,
    pub package_name: String,
    pub description: String,
    pub module_system: ModuleSystem,
    pub author: String,
    pub today: NaiveDate,
    /// Features that survived conflict resolution
    pub effective: Vec<FeatureKey>,
    /// Display name of the license written by the `license` feature
    pub license_name: Option<String>,
    /// Entry file written by the `src` feature, relative to `target`
    pub entry_file: Option<PathBuf>,
}

impl RunContext {
    pub fn is_selected(&self, key: FeatureKey) -> bool {
        self.effective.contains(&key)
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn render(&self) -> RenderContext<'_> {
        RenderContext {
            package_name: &self.package_name,
            description: &self.description,
            module_system: self.module_system,
            date: self.today,
            include_contributing: self.is_selected(FeatureKey::Contributing),
            license_name: self.license_name.as_deref(),
        }
    }
}
