//! Module system flag and the entry-point fields it controls

use super::editor::ManifestPatch;
use serde_json::Value;
use std::fmt;

/// Which module syntax the generated package uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModuleSystem {
    Esm,
    #[default]
    CommonJs,
}

impl ModuleSystem {
    pub fn from_esm_flag(esm: bool) -> Self {
        if esm {
            ModuleSystem::Esm
        } else {
            ModuleSystem::CommonJs
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModuleSystem::Esm => "ECMAScript modules",
            ModuleSystem::CommonJs => "CommonJS",
        }
    }

    /// Extension for generated scripts
    pub fn script_extension(&self) -> &'static str {
        match self {
            ModuleSystem::Esm => "mjs",
            ModuleSystem::CommonJs => "js",
        }
    }

    /// Value of the manifest `type` field
    pub fn package_type(&self) -> &'static str {
        match self {
            ModuleSystem::Esm => "module",
            ModuleSystem::CommonJs => "commonjs",
        }
    }

    /// Entry file name under `src/`
    pub fn entry_file_name(&self) -> String {
        format!("index.{}", self.script_extension())
    }

    /// Manifest-relative entry path, e.g. `./src/index.mjs`
    pub fn entry_path(&self) -> String {
        format!("./src/{}", self.entry_file_name())
    }

    /// Patch that sets exactly one of `main` / `exports` and clears the other
    pub fn entry_patch(&self) -> ManifestPatch {
        let entry = Value::String(self.entry_path());
        let patch = ManifestPatch::new().set("type", self.package_type());
        match self {
            ModuleSystem::Esm => patch.set("exports", entry).remove("main"),
            ModuleSystem::CommonJs => patch.set("main", entry).remove("exports"),
        }
    }
}

impl fmt::Display for ModuleSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
