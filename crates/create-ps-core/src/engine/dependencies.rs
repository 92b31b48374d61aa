//! Dependency collection, validation and installation
//!
//! Collection is a small retry loop: `Collecting -> Validating -> AllValid`
//! or back to `Collecting` with only the specifiers that failed. A cancelled
//! prompt leaves the loop from any state.

use super::context::{Materialized, RunContext};
use crate::collab::{CommandRunner, Prompter, Registry};
use crate::error::{Error, Result};
use crate::manifest::ManifestEditor;
use crate::templates::render::import_statement;
use std::fmt;
use tokio::io::AsyncWriteExt;

/// `name[@version]`, with scoped names (`@scope/name@^1`) supported
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencySpec {
    pub name: String,
    pub version: Option<String>,
}

impl DependencySpec {
    /// Parse one trimmed specifier; `None` when it's empty
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        // The version separator is the last '@' that isn't the scope marker
        let split = raw
            .char_indices()
            .skip(1)
            .filter(|(_, c)| *c == '@')
            .map(|(i, _)| i)
            .last();

        let (name, version) = match split {
            Some(i) => (&raw[..i], Some(raw[i + 1..].trim())),
            None => (raw, None),
        };

        Some(Self {
            name: name.trim().to_string(),
            version: version.filter(|v| !v.is_empty()).map(str::to_string),
        })
    }

    /// Argument passed to `npm install`
    pub fn install_arg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@{}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Split a comma-separated list into specifiers, dropping empty entries
pub fn parse_list(input: &str) -> Vec<DependencySpec> {
    input.split(',').filter_map(DependencySpec::parse).collect()
}

#[derive(Debug)]
enum CollectState {
    Collecting { initial: String, retry: bool },
    Validating(Vec<DependencySpec>),
    AllValid,
}

/// Prompt until every entered specifier exists in the registry.
///
/// Valid specifiers are kept across rounds; each retry only asks for the ones
/// that failed. Submitting an empty answer on a retry drops them.
pub async fn collect<P: Prompter, R: Registry>(
    prompter: &mut P,
    registry: &R,
) -> Result<Vec<DependencySpec>> {
    let mut valid: Vec<DependencySpec> = Vec::new();
    let mut state = CollectState::Collecting {
        initial: String::new(),
        retry: false,
    };

    loop {
        state = match state {
            CollectState::Collecting { initial, retry } => {
                let message = if retry {
                    "Correct the dependencies that could not be found (leave empty to skip them):"
                } else {
                    "Enter the dependencies to install (comma-separated):"
                };
                let input = prompter.text(message, "left-pad, chalk@5", &initial)?;
                let specs = parse_list(&input);
                if specs.is_empty() {
                    CollectState::AllValid
                } else {
                    CollectState::Validating(specs)
                }
            }
            CollectState::Validating(specs) => {
                prompter.start_progress("Checking the registry...");
                let mut invalid = Vec::new();
                for spec in specs {
                    match registry.exists(&spec).await {
                        Ok(true) => {
                            if !valid.iter().any(|v| v.name == spec.name) {
                                valid.push(spec);
                            }
                        }
                        Ok(false) => invalid.push(spec),
                        Err(e) => {
                            tracing::warn!(spec = %spec, error = %e, "registry lookup failed");
                            invalid.push(spec);
                        }
                    }
                }

                if invalid.is_empty() {
                    prompter.stop_progress("All dependencies found");
                    CollectState::AllValid
                } else {
                    let listing = invalid
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    prompter.stop_progress("Some dependencies could not be found");
                    prompter.warn(&format!("Not found in the registry: {}", listing));
                    CollectState::Collecting {
                        initial: listing,
                        retry: true,
                    }
                }
            }
            CollectState::AllValid => return Ok(valid),
        };
    }
}

/// Collect, install, then annotate the entry file with one import per dependency
pub async fn materialize<P: Prompter, R: Registry, C: CommandRunner>(
    ctx: &RunContext,
    prompter: &mut P,
    registry: &R,
    runner: &C,
    package_manager: &str,
    manifest: &mut ManifestEditor,
) -> Result<Materialized> {
    let specs = collect(prompter, registry).await?;
    if specs.is_empty() {
        return Ok(Materialized::default().with_note("no dependencies entered"));
    }

    let mut args = vec!["install".to_string()];
    args.extend(specs.iter().map(DependencySpec::install_arg));

    prompter.start_progress(&format!("Installing {} dependencies...", specs.len()));
    let output = runner.run(package_manager, &args, ctx.target()).await;
    let output = match output {
        Ok(out) if out.success => out,
        Ok(out) => {
            prompter.stop_progress("Install failed");
            return Err(Error::command(package_manager, out.summary()));
        }
        Err(e) => {
            prompter.stop_progress("Install failed");
            return Err(e);
        }
    };
    prompter.stop_progress("Dependencies installed");
    tracing::debug!(stdout = %output.stdout.trim(), "install finished");

    // npm rewrote package.json; drop our stale copy so later persists keep its edits
    manifest.reload().await?;

    let Some(entry) = &ctx.entry_file else {
        return Ok(Materialized::default());
    };

    // The binding name is a guess derived from the package name. Packages
    // commonly imported under another identifier will need a manual fix.
    let mut block = String::from(
        "\n// Imports below were generated from package names; adjust the bindings if needed.\n",
    );
    for spec in &specs {
        block.push_str(&import_statement(ctx.module_system, &spec.name));
        block.push('\n');
    }

    let full = ctx.target().join(entry);
    let mut file = tokio::fs::OpenOptions::new()
        .append(true)
        .open(&full)
        .await
        .map_err(|e| Error::io(&full, e))?;
    file.write_all(block.as_bytes())
        .await
        .map_err(|e| Error::io(&full, e))?;
    file.flush().await.map_err(|e| Error::io(&full, e))?;

    Ok(Materialized::paths(vec![entry.clone()]))
}
