//! Per-feature outcomes of a scaffolding run

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    ConflictCheck,
    Materializing,
    Reported,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureOutcome {
    Succeeded {
        /// Paths written, relative to the target directory
        paths: Vec<PathBuf>,
        note: Option<String>,
    },
    Failed {
        reason: String,
    },
    /// Left out because its output already existed
    Skipped {
        reason: String,
    },
    /// Key not in the catalog
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureReport {
    pub key: String,
    pub outcome: FeatureOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub entries: Vec<FeatureReport>,
    pub state: RunState,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            state: RunState::Init,
        }
    }
}

impl Report {
    pub fn record(&mut self, key: impl Into<String>, outcome: FeatureOutcome) {
        self.entries.push(FeatureReport {
            key: key.into(),
            outcome,
        });
    }

    pub fn get(&self, key: &str) -> Option<&FeatureOutcome> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.outcome)
    }

    pub fn is_aborted(&self) -> bool {
        self.state == RunState::Aborted
    }

    /// No feature failed and the run was not aborted
    pub fn is_success(&self) -> bool {
        !self.is_aborted() && self.failed().next().is_none()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &FeatureReport> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, FeatureOutcome::Succeeded { .. }))
    }

    pub fn failed(&self) -> impl Iterator<Item = &FeatureReport> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, FeatureOutcome::Failed { .. }))
    }

    /// Every path written by a succeeded feature
    pub fn written_paths(&self) -> Vec<PathBuf> {
        self.entries
            .iter()
            .filter_map(|e| match &e.outcome {
                FeatureOutcome::Succeeded { paths, .. } => Some(paths.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match &entry.outcome {
                FeatureOutcome::Succeeded { paths, note } => {
                    let paths = paths
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "  {} {}", "✓".green(), entry.key)?;
                    if !paths.is_empty() {
                        write!(f, " {}", paths.dimmed())?;
                    }
                    if let Some(note) = note {
                        write!(f, " ({})", note.yellow())?;
                    }
                    writeln!(f)?;
                }
                FeatureOutcome::Failed { reason } => {
                    writeln!(f, "  {} {}: {}", "✗".red(), entry.key, reason.red())?
                }
                FeatureOutcome::Skipped { reason } => {
                    writeln!(f, "  {} {}: {}", "-".dimmed(), entry.key, reason.dimmed())?
                }
                FeatureOutcome::Ignored => {
                    writeln!(f, "  {} {}: unknown feature", "?".yellow(), entry.key)?
                }
            }
        }
        Ok(())
    }
}
