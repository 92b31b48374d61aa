//! create-ps core - scaffolding library for new npm packages
//!
//! This library lays down the directory structure and metadata of a new
//! package from a set of selected features, and edits the metadata of an
//! existing `package.json`.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - feature catalog, conflict detection,
//!   manifest editing, content rendering
//! - **Layer 2: Workflow Orchestration** - the scaffolding [`Engine`] and the
//!   [`config_update`] flow, both driven through the traits in [`collab`]
//! - **Layer 3: CLI/TUI Interface** - cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use create_ps_core::{engine, ManifestEditor, ModuleSystem, Selection};
//!
//! let mut manifest = ManifestEditor::load_from_dir(&dir).await?;
//! let selection = Selection::new("my-lib", ModuleSystem::Esm)
//!     .features(["src", "readme", "license"]);
//! let mut engine = engine::Engine::new(&dir, options, collaborators);
//! let report = engine.materialize(&selection, &mut manifest).await?;
//! ```

pub mod collab;
pub mod config_update;
pub mod engine;
pub mod error;
pub mod features;
pub mod manifest;
pub mod product;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use collab::{CommandOutput, CommandRunner, Prompter, Registry, TemplateSource};
pub use engine::{Engine, EngineOptions, Report, Selection};
pub use error::{Error, Result};
pub use features::{ConflictPolicy, FeatureKey};
pub use manifest::{ManifestEditor, ModuleSystem};
pub use product::ProductConfig;
pub use runtime::ProcessRunner;
pub use templates::{HttpRemote, RemoteEndpoints};

#[cfg(feature = "tui")]
pub use tui::{run_create, run_pkg_config, CreateArgs, PkgConfigArgs};
