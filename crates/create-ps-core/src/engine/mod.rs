//! Scaffolding engine
//!
//! Turns a [`Selection`] into files, directories and manifest edits. Each
//! feature is dispatched on its catalog [`ContentSource`]; a failing feature is
//! recorded in the [`Report`] and the run moves on. Only a cancelled prompt
//! stops the run early.

mod context;
pub mod dependencies;
pub mod license;
mod plan;
mod report;

pub use context::{Materialized, RunContext};
pub use dependencies::DependencySpec;
pub use plan::plan;
pub use report::{FeatureOutcome, FeatureReport, Report, RunState};

use crate::collab::{CommandRunner, Prompter, Registry, TemplateSource};
use crate::error::{Error, Result};
use crate::features::{
    catalog, resolve_conflicts, ConflictPolicy, ContentSource, FeatureDefinition, FeatureKey,
    RemoteTemplate, Resolution,
};
use crate::manifest::{ManifestEditor, ManifestPatch, ModuleSystem, MANIFEST_FILE};
use crate::templates::render::substitute_project_name;
use crate::templates::RemoteEndpoints;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;

/// What the user asked for
#[derive(Debug, Clone)]
pub struct Selection {
    pub package_name: String,
    pub description: String,
    pub module_system: ModuleSystem,
    /// Raw feature keys; unknown ones are reported and ignored
    pub features: Vec<String>,
}

impl Selection {
    pub fn new(package_name: impl Into<String>, module_system: ModuleSystem) -> Self {
        Self {
            package_name: package_name.into(),
            description: String::new(),
            module_system,
            features: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn feature(mut self, key: impl Into<String>) -> Self {
        self.features.push(key.into());
        self
    }

    pub fn features<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features.extend(keys.into_iter().map(Into::into));
        self
    }
}

/// Run-wide settings that don't come from the user's selection
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Copyright holder for the license
    pub author: String,
    pub today: NaiveDate,
    pub package_manager: String,
    pub conflict_policy: ConflictPolicy,
    pub endpoints: RemoteEndpoints,
}

/// The outside world as seen by the engine
pub struct Collaborators<'a, P, T, R, C> {
    pub prompter: &'a mut P,
    pub templates: &'a T,
    pub registry: &'a R,
    pub runner: &'a C,
}

pub struct Engine<'a, P, T, R, C> {
    target: PathBuf,
    options: EngineOptions,
    collab: Collaborators<'a, P, T, R, C>,
    state: RunState,
}

impl<'a, P, T, R, C> Engine<'a, P, T, R, C>
where
    P: Prompter,
    T: TemplateSource,
    R: Registry,
    C: CommandRunner,
{
    pub fn new(
        target: impl Into<PathBuf>,
        options: EngineOptions,
        collab: Collaborators<'a, P, T, R, C>,
    ) -> Self {
        Self {
            target: target.into(),
            options,
            collab,
            state: RunState::Init,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Materialize a selection into the target directory.
    ///
    /// Returns `Err` only for [`Error::Cancelled`]; everything else lands in the report.
    pub async fn materialize(
        &mut self,
        selection: &Selection,
        manifest: &mut ManifestEditor,
    ) -> Result<Report> {
        let mut report = Report::default();
        self.state = RunState::Init;

        let mut requested: Vec<FeatureKey> = Vec::new();
        for raw in &selection.features {
            match raw.parse::<FeatureKey>() {
                Ok(key) if !requested.contains(&key) => requested.push(key),
                Ok(_) => {}
                Err(_) => {
                    tracing::debug!(key = %raw, "ignoring unknown feature");
                    report.record(raw.clone(), FeatureOutcome::Ignored);
                }
            }
        }

        self.write_metadata(selection, manifest, &mut report).await;

        self.transition(RunState::ConflictCheck);
        let resolution = resolve_conflicts(
            &self.target,
            &requested,
            selection.module_system,
            &mut *self.collab.prompter,
            self.options.conflict_policy,
        )?;
        let (effective, skipped) = match resolution {
            Resolution::Proceed { effective, skipped } => (effective, skipped),
            Resolution::Aborted => {
                self.transition(RunState::Aborted);
                report.state = RunState::Aborted;
                return Ok(report);
            }
        };
        for key in skipped {
            report.record(
                key.as_str(),
                FeatureOutcome::Skipped {
                    reason: "output already exists".to_string(),
                },
            );
        }

        let mut ctx = RunContext {
            target: self.target.clone(),
            package_name: selection.package_name.clone(),
            description: selection.description.clone(),
            module_system: selection.module_system,
            author: self.options.author.clone(),
            today: self.options.today,
            effective: effective.clone(),
            license_name: None,
            entry_file: None,
        };

        self.transition(RunState::Materializing);
        for key in plan(&effective) {
            let def = catalog::resolve(key);
            tracing::debug!(feature = %key, "materializing");

            match self.materialize_feature(def, &mut ctx, manifest).await {
                Ok(done) => report.record(
                    key.as_str(),
                    FeatureOutcome::Succeeded {
                        paths: done.paths,
                        note: done.note,
                    },
                ),
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(e) => {
                    tracing::warn!(feature = %key, error = %e, "feature failed");
                    self.collab
                        .prompter
                        .warn(&format!("{} could not be created: {}", def.label, e));
                    report.record(
                        key.as_str(),
                        FeatureOutcome::Failed {
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        self.transition(RunState::Reported);
        report.state = RunState::Reported;
        Ok(report)
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!(from = ?self.state, to = ?next, "run state");
        self.state = next;
    }

    /// Write the name and description into the manifest before any feature runs
    async fn write_metadata(
        &mut self,
        selection: &Selection,
        manifest: &mut ManifestEditor,
        report: &mut Report,
    ) {
        let mut patch = ManifestPatch::new();
        if !selection.package_name.is_empty()
            && manifest.name() != Some(selection.package_name.as_str())
        {
            patch = patch.set("name", selection.package_name.as_str());
        }
        if !selection.description.trim().is_empty() {
            patch = patch.set("description", selection.description.trim());
        }
        if patch.is_empty() {
            return;
        }

        manifest.apply(&patch);
        if let Err(e) = manifest.persist().await {
            self.collab.prompter.error(&e.to_string());
            report.record(
                MANIFEST_FILE,
                FeatureOutcome::Failed {
                    reason: e.to_string(),
                },
            );
        }
    }

    async fn materialize_feature(
        &mut self,
        def: &FeatureDefinition,
        ctx: &mut RunContext,
        manifest: &mut ManifestEditor,
    ) -> Result<Materialized> {
        let outputs = def.output_paths(ctx.module_system);

        match def.content {
            ContentSource::Directory => {
                for rel in &outputs {
                    let full = ctx.target.join(rel);
                    fs::create_dir_all(&full)
                        .await
                        .map_err(|e| Error::io(&full, e))?;
                }
                Ok(Materialized::paths(outputs))
            }
            ContentSource::Static(text) => {
                for rel in &outputs {
                    write_file(&ctx.target, rel, text).await?;
                }
                Ok(Materialized::paths(outputs))
            }
            ContentSource::Templated(render) => {
                let content = render(&ctx.render());
                for rel in &outputs {
                    write_file(&ctx.target, rel, &content).await?;
                }
                Ok(Materialized::paths(outputs))
            }
            ContentSource::Remote { template, fallback } => {
                self.materialize_remote(template, fallback, ctx, outputs)
                    .await
            }
            ContentSource::EntryPoint => {
                for rel in &outputs {
                    write_file(&ctx.target, rel, "").await?;
                }
                // Flushed now: later steps (npm install) read package.json from disk
                manifest.apply(&ctx.module_system.entry_patch());
                manifest.persist().await?;
                ctx.entry_file = outputs.first().cloned();
                Ok(Materialized::paths(outputs))
            }
            ContentSource::License => {
                license::materialize(ctx, &mut *self.collab.prompter, self.collab.templates).await
            }
            ContentSource::Dependencies => {
                dependencies::materialize(
                    ctx,
                    &mut *self.collab.prompter,
                    self.collab.registry,
                    self.collab.runner,
                    &self.options.package_manager,
                    manifest,
                )
                .await
            }
        }
    }

    async fn materialize_remote(
        &mut self,
        template: RemoteTemplate,
        fallback: Option<&'static str>,
        ctx: &RunContext,
        outputs: Vec<PathBuf>,
    ) -> Result<Materialized> {
        let url = self.options.endpoints.template_url(template);
        let (content, note) = match self.collab.templates.fetch_template(url).await {
            Ok(text) => (substitute_project_name(&text, &ctx.package_name), None),
            Err(e) => match fallback {
                Some(text) => {
                    tracing::warn!(url, error = %e, "using offline fallback");
                    (text.to_string(), Some(format!("offline fallback used: {}", e)))
                }
                None => return Err(e),
            },
        };

        for rel in &outputs {
            write_file(&ctx.target, rel, &content).await?;
        }
        Ok(Materialized { paths: outputs, note })
    }
}

/// Write a file below `target`, creating parent directories and truncating
/// any previous content
pub(crate) async fn write_file(target: &Path, rel: &Path, content: &str) -> Result<()> {
    let full = target.join(rel);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent, e))?;
    }
    fs::write(&full, content)
        .await
        .map_err(|e| Error::io(&full, e))
}
