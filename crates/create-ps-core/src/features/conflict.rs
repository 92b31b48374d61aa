//! Detect feature outputs that already exist and decide what to do about them

use super::catalog::{self, FeatureKey};
use crate::collab::Prompter;
use crate::error::Result;
use crate::manifest::ModuleSystem;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// An existing path that a selected feature would write over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub feature: FeatureKey,
    /// Path relative to the target directory
    pub path: PathBuf,
    pub is_dir: bool,
    /// Number of entries below the path when it is a directory
    pub entries: usize,
}

impl Conflict {
    fn describe(&self) -> String {
        if self.is_dir {
            format!(
                "{}/ ({} existing item{})",
                self.path.display(),
                self.entries,
                if self.entries == 1 { "" } else { "s" }
            )
        } else {
            self.path.display().to_string()
        }
    }
}

/// What declining the conflict prompt means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Ask whether to skip colliding features; "no" overwrites them
    #[default]
    SkipColliding,
    /// Ask whether to overwrite; "no" aborts before anything is written
    AbortOnDecline,
}

/// Outcome of conflict resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Proceed {
        effective: Vec<FeatureKey>,
        skipped: Vec<FeatureKey>,
    },
    Aborted,
}

/// Existing outputs of the requested features. Files and directories both count.
pub fn find_conflicts(
    target: &Path,
    requested: &[FeatureKey],
    module_system: ModuleSystem,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for key in requested {
        let Some(rel) = catalog::resolve(*key).conflict_path(module_system) else {
            continue;
        };
        let full = target.join(&rel);
        let Ok(meta) = std::fs::symlink_metadata(&full) else {
            continue;
        };

        let entries = if meta.is_dir() {
            WalkDir::new(&full)
                .min_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .count()
        } else {
            0
        };

        conflicts.push(Conflict {
            feature: *key,
            path: rel,
            is_dir: meta.is_dir(),
            entries,
        });
    }

    conflicts
}

/// Turn the requested features into the effective set, asking the user about collisions
pub fn resolve_conflicts<P: Prompter>(
    target: &Path,
    requested: &[FeatureKey],
    module_system: ModuleSystem,
    prompter: &mut P,
    policy: ConflictPolicy,
) -> Result<Resolution> {
    let conflicts = find_conflicts(target, requested, module_system);
    if conflicts.is_empty() {
        return Ok(Resolution::Proceed {
            effective: requested.to_vec(),
            skipped: Vec::new(),
        });
    }

    let listing = conflicts
        .iter()
        .map(|c| format!("  • {}", c.describe()))
        .collect::<Vec<_>>()
        .join("\n");
    prompter.warn(&format!("The following paths already exist:\n{}", listing));

    match policy {
        ConflictPolicy::SkipColliding => {
            let skip = prompter.confirm("Skip the features whose files already exist?", true)?;
            if !skip {
                tracing::debug!(count = conflicts.len(), "overwriting existing outputs");
                return Ok(Resolution::Proceed {
                    effective: requested.to_vec(),
                    skipped: Vec::new(),
                });
            }

            let (skipped, effective): (Vec<FeatureKey>, Vec<FeatureKey>) = requested
                .iter()
                .partition(|key| conflicts.iter().any(|c| c.feature == **key));
            Ok(Resolution::Proceed { effective, skipped })
        }
        ConflictPolicy::AbortOnDecline => {
            let overwrite = prompter.confirm("Continue and overwrite them?", false)?;
            if overwrite {
                Ok(Resolution::Proceed {
                    effective: requested.to_vec(),
                    skipped: Vec::new(),
                })
            } else {
                Ok(Resolution::Aborted)
            }
        }
    }
}
