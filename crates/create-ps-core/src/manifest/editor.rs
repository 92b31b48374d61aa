//! In-memory package.json with explicit load / apply / persist steps

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const MANIFEST_FILE: &str = "package.json";

/// A change to one top-level manifest field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Set(Value),
    Remove,
}

/// Ordered set of field updates, applied as a shallow merge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestPatch {
    updates: Vec<(String, FieldUpdate)>,
}

impl ManifestPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.updates
            .push((field.to_string(), FieldUpdate::Set(value.into())));
        self
    }

    pub fn remove(mut self, field: &str) -> Self {
        self.updates.push((field.to_string(), FieldUpdate::Remove));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldUpdate)> {
        self.updates.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }
}

/// Owns package.json for the duration of a run
#[derive(Debug, Clone)]
pub struct ManifestEditor {
    path: PathBuf,
    fields: Map<String, Value>,
}

impl ManifestEditor {
    /// Read and parse the manifest; a missing or malformed file is fatal
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let fields = Self::read_fields(&path).await?;
        tracing::debug!(path = %path.display(), fields = fields.len(), "loaded manifest");
        Ok(Self { path, fields })
    }

    /// Load `package.json` from a package directory
    pub async fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load(dir.join(MANIFEST_FILE)).await
    }

    async fn read_fields(path: &Path) -> Result<Map<String, Value>> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| Error::ManifestRead {
                path: path.to_path_buf(),
                source,
            })?;

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => Err(Error::ManifestParse {
                path: path.to_path_buf(),
                message: "top-level value is not an object".to_string(),
            }),
            Err(e) => Err(Error::ManifestParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Re-read from disk, discarding in-memory changes.
    ///
    /// Needed after an external program (npm install) rewrote the file.
    pub async fn reload(&mut self) -> Result<()> {
        self.fields = Self::read_fields(&self.path).await?;
        Ok(())
    }

    /// Shallow-merge a patch; later updates to the same field win
    pub fn apply(&mut self, patch: &ManifestPatch) -> &Map<String, Value> {
        for (field, update) in patch.iter() {
            match update {
                FieldUpdate::Set(value) => {
                    self.fields.insert(field.to_string(), value.clone());
                }
                FieldUpdate::Remove => {
                    self.fields.shift_remove(field);
                }
            }
        }
        &self.fields
    }

    /// Write back with 2-space indentation and a trailing newline
    pub async fn persist(&self) -> Result<()> {
        let mut content = serde_json::to_string_pretty(&self.fields).map_err(|e| {
            Error::ManifestWrite {
                path: self.path.clone(),
                source: std::io::Error::other(e),
            }
        })?;
        content.push('\n');

        fs::write(&self.path, content)
            .await
            .map_err(|source| Error::ManifestWrite {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(path = %self.path.display(), "persisted manifest");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}
