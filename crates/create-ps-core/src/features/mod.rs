//! Feature catalog and pre-write conflict resolution

pub mod catalog;
pub mod conflict;

pub use catalog::{ContentSource, FeatureDefinition, FeatureKey, Output, RemoteTemplate};
pub use conflict::{find_conflicts, resolve_conflicts, Conflict, ConflictPolicy, Resolution};
