//! Materialization order
//!
//! Features run in catalog order, except that a feature always runs after the
//! features listed in its `content_depends_on`: the README after the license
//! and contributing guide, dependency installation after the entry file.

use crate::features::catalog::{self, FeatureKey};
use std::collections::BTreeSet;

/// Order the effective features so that every dependency edge between two
/// selected features is respected. Unselected dependencies impose nothing.
pub fn plan(features: &[FeatureKey]) -> Vec<FeatureKey> {
    let selected: BTreeSet<FeatureKey> = features.iter().copied().collect();
    let mut remaining = selected.clone();
    let mut ordered = Vec::with_capacity(selected.len());

    while !remaining.is_empty() {
        // BTreeSet iterates in catalog order, so the first ready feature wins ties
        let ready = remaining.iter().copied().find(|key| {
            catalog::resolve(*key)
                .content_depends_on
                .iter()
                .all(|dep| !remaining.contains(dep))
        });

        match ready {
            Some(key) => {
                remaining.remove(&key);
                ordered.push(key);
            }
            None => {
                // A cycle would be a catalog bug; fall back to catalog order
                tracing::warn!(?remaining, "dependency cycle in feature catalog");
                ordered.extend(remaining.iter().copied());
                break;
            }
        }
    }

    ordered
}
