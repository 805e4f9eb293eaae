//! Aggregation of structural and textual diffs
//!
//! Combines the structural classification with per-step line diffs into
//! the immutable bundle the report embeds: an edit script and a stable
//! fingerprint for every step in either version, plus the metadata
//! script and its derived changed flag.

use std::collections::BTreeMap;

use super::document::PipelineDoc;
use super::normalize::normalize;
use super::structural::StructuralDiff;
use super::textdiff::{diff_lines, has_changes, LineEdit};

/// Visual classification of a step or hop across the two versions.
///
/// Hops carry no body to diff and are never `Modified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
    Unchanged,
}

/// Stable presentation identifier for a step name.
///
/// First 32 hex characters of the BLAKE3 hash of the display name,
/// used to key rendered graph elements to their diff payloads. Carries
/// no ordering or semantic meaning, only identity.
pub fn fingerprint(name: &str) -> String {
    blake3::hash(name.as_bytes()).to_hex()[..32].to_string()
}

/// Renderer-ready aggregate of every computed diff.
///
/// Built once per run and read-only afterwards; together with the
/// [`StructuralDiff`] it is everything the report needs.
#[derive(Debug, Clone)]
pub struct DiffBundle {
    /// Step display name -> line edit script.
    scripts: BTreeMap<String, Vec<LineEdit>>,
    /// Step display name -> classification.
    changes: BTreeMap<String, ChangeKind>,
    /// Fingerprint -> step display name.
    fingerprints: BTreeMap<String, String>,
    /// Edit script for the shared metadata fragment.
    meta_script: Vec<LineEdit>,
}

impl DiffBundle {
    /// Diffs every step of the union plus the metadata fragments.
    ///
    /// Steps present on one side only are diffed against empty text, so
    /// their scripts come back all-added or all-removed; their
    /// classification is fixed by the structural diff regardless.
    pub fn build(old: &PipelineDoc, new: &PipelineDoc, structural: &StructuralDiff) -> Self {
        let mut scripts = BTreeMap::new();
        let mut changes = BTreeMap::new();
        let mut fingerprints = BTreeMap::new();

        for name in structural.step_names() {
            let old_text = old.steps.get(name).map(|s| normalize(s)).unwrap_or_default();
            let new_text = new.steps.get(name).map(|s| normalize(s)).unwrap_or_default();
            let script = diff_lines(&old_text, &new_text);

            let kind = if structural.added_steps.contains(name) {
                ChangeKind::Added
            } else if structural.removed_steps.contains(name) {
                ChangeKind::Removed
            } else if has_changes(&script) {
                ChangeKind::Modified
            } else {
                ChangeKind::Unchanged
            };

            fingerprints.insert(fingerprint(name), name.clone());
            changes.insert(name.clone(), kind);
            scripts.insert(name.clone(), script);
        }

        let meta_script = diff_lines(&normalize(&old.metadata), &normalize(&new.metadata));

        Self {
            scripts,
            changes,
            fingerprints,
            meta_script,
        }
    }

    /// Edit script for a step, if the step exists in either version.
    pub fn script(&self, name: &str) -> Option<&[LineEdit]> {
        self.scripts.get(name).map(Vec::as_slice)
    }

    /// Classification for a step; names absent from both versions read
    /// as unchanged.
    pub fn change(&self, name: &str) -> ChangeKind {
        self.changes
            .get(name)
            .copied()
            .unwrap_or(ChangeKind::Unchanged)
    }

    /// Iterates `(fingerprint, step name)` pairs in fingerprint order.
    pub fn fingerprints(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fingerprints
            .iter()
            .map(|(fp, name)| (fp.as_str(), name.as_str()))
    }

    /// Edit script for the shared metadata fragment.
    pub fn meta_script(&self) -> &[LineEdit] {
        &self.meta_script
    }

    /// True when the metadata fragments differ at all.
    pub fn metadata_changed(&self) -> bool {
        has_changes(&self.meta_script)
    }
}
