//! Parsed pipeline model
//!
//! One [`PipelineDoc`] per input version, built by the loader and
//! immutable afterwards. Step fragments and the metadata remainder keep
//! their raw serialization; normalization happens at diff time.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Column budget for step names in the rendered graph.
const NAME_WRAP_COLUMNS: usize = 20;

/// Turns a raw step name into its display form.
///
/// Names are wrapped to 20 columns and joined with literal `\n` so the
/// layout engine renders them as multi-line labels, and double quotes
/// are escaped for embedding in quoted dot identifiers. Both documents
/// run their step names and hop endpoints through this same transform,
/// so the result doubles as the identity key that matches steps across
/// versions.
pub fn display_name(raw: &str) -> String {
    textwrap::wrap(raw, NAME_WRAP_COLUMNS)
        .iter()
        .map(|line| line.as_ref())
        .collect::<Vec<&str>>()
        .join("\\n")
        .replace('"', "\\\"")
}

/// A directed connection between two steps, identified by its endpoint
/// display names. Equality is exact on both ends.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hop {
    pub from: String,
    pub to: String,
}

impl Hop {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// One parsed version of a pipeline definition.
#[derive(Debug, Clone, Default)]
pub struct PipelineDoc {
    /// Document text with the hop collection and step fragments removed.
    pub metadata: String,

    /// Display name -> raw serialized step fragment.
    pub steps: BTreeMap<String, String>,

    /// Directed hops keyed by endpoint display names.
    pub hops: BTreeSet<Hop>,
}

impl PipelineDoc {
    /// Step names present in this version.
    pub fn step_names(&self) -> BTreeSet<String> {
        self.steps.keys().cloned().collect()
    }
}
