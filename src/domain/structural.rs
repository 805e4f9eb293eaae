//! Set-based structural comparison of two pipeline versions
//!
//! Classifies every step name and every hop as added, removed, or
//! common using exact-match set operations. No partial or fuzzy
//! matching: a renamed step is an unrelated add plus remove.

use std::collections::BTreeSet;

use super::document::{Hop, PipelineDoc};

/// Exact-match classification of step names and hops across two
/// versions. Sets, not multisets: order-independent and
/// duplicate-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralDiff {
    pub added_steps: BTreeSet<String>,
    pub removed_steps: BTreeSet<String>,
    pub common_steps: BTreeSet<String>,
    pub added_hops: BTreeSet<Hop>,
    pub removed_hops: BTreeSet<Hop>,
    pub common_hops: BTreeSet<Hop>,
}

impl StructuralDiff {
    /// Classifies every step name and hop of the two documents.
    pub fn between(old: &PipelineDoc, new: &PipelineDoc) -> Self {
        let old_names = old.step_names();
        let new_names = new.step_names();

        Self {
            added_steps: new_names.difference(&old_names).cloned().collect(),
            removed_steps: old_names.difference(&new_names).cloned().collect(),
            common_steps: old_names.intersection(&new_names).cloned().collect(),
            added_hops: new.hops.difference(&old.hops).cloned().collect(),
            removed_hops: old.hops.difference(&new.hops).cloned().collect(),
            common_hops: old.hops.intersection(&new.hops).cloned().collect(),
        }
    }

    /// Step names of both versions, in presentation order: added, then
    /// removed, then common.
    pub fn step_names(&self) -> impl Iterator<Item = &String> {
        self.added_steps
            .iter()
            .chain(&self.removed_steps)
            .chain(&self.common_steps)
    }
}
