//! Error types for the scaffolding core
//!
//! Manifest load failures are fatal for a run. Everything else is caught at
//! the engine's per-feature boundary and recorded in the report, except
//! [`Error::Cancelled`], which always unwinds to the caller.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// package.json is missing or unreadable
    #[error("Failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// package.json is not a JSON object
    #[error("Malformed manifest {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// package.json could not be written back
    #[error("Failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A feature's file write or directory creation failed
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template, license or registry fetch failed
    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// User input failed a shape or existence check
    #[error("{0}")]
    Validation(String),

    /// An external program (npm, git) failed or could not be spawned
    #[error("`{program}` failed: {message}")]
    Command { program: String, message: String },

    /// The user cancelled a prompt
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn network(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Network {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn command(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            program: program.into(),
            message: message.into(),
        }
    }

    /// True for the manifest load failures that abort a run before any feature starts
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ManifestRead { .. } | Self::ManifestParse { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
