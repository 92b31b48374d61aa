//! package.json loading, patching and persistence

mod editor;
mod entry;

pub use editor::{FieldUpdate, ManifestEditor, ManifestPatch, MANIFEST_FILE};
pub use entry::ModuleSystem;
