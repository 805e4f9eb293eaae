//! Loading pipeline definitions from disk
//!
//! Parses a pipeline XML document into the [`PipelineDoc`] model. Hop
//! endpoints and step names pass through the display transform that
//! doubles as their identity key; step fragments keep their raw
//! serialization; the metadata remainder is the document text with the
//! hop collection and every step fragment spliced out.
//!
//! Hop endpoints are not validated against step names. A hop whose
//! endpoint has no matching step is preserved and surfaces in the
//! report as an ordinary added or removed hop.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{display_name, Hop, PipelineDoc};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not well-formed XML")]
    Parse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("{path} has no <order> element declaring hops")]
    MissingHops { path: PathBuf },

    #[error("{path} declares no <step> elements")]
    MissingSteps { path: PathBuf },

    #[error("{path}: <hop> is missing a <{field}> endpoint")]
    IncompleteHop { path: PathBuf, field: &'static str },

    #[error("{path}: <step> is missing a <name>")]
    UnnamedStep { path: PathBuf },
}

/// Reads and parses one pipeline definition.
pub fn load_pipeline(path: impl AsRef<Path>) -> Result<PipelineDoc, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pipeline(&text, path)
}

/// Parses pipeline XML already read into memory.
///
/// `path` only labels errors; no I/O happens here.
pub fn parse_pipeline(text: &str, path: &Path) -> Result<PipelineDoc, LoadError> {
    let doc = roxmltree::Document::parse(text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let root = doc.root_element();

    let order = root
        .children()
        .find(|n| n.has_tag_name("order"))
        .ok_or_else(|| LoadError::MissingHops {
            path: path.to_path_buf(),
        })?;

    let mut hops = BTreeSet::new();
    for hop in order.children().filter(|n| n.has_tag_name("hop")) {
        let from = child_text(hop, "from").ok_or_else(|| LoadError::IncompleteHop {
            path: path.to_path_buf(),
            field: "from",
        })?;
        let to = child_text(hop, "to").ok_or_else(|| LoadError::IncompleteHop {
            path: path.to_path_buf(),
            field: "to",
        })?;
        hops.insert(Hop::new(display_name(from), display_name(to)));
    }

    // Duplicate step names are not rejected; the last occurrence wins.
    let mut steps = BTreeMap::new();
    let mut spliced: Vec<Range<usize>> = vec![order.range()];
    for step in root.children().filter(|n| n.has_tag_name("step")) {
        let name = child_text(step, "name").ok_or_else(|| LoadError::UnnamedStep {
            path: path.to_path_buf(),
        })?;
        let range = step.range();
        steps.insert(display_name(name), text[range.clone()].to_string());
        spliced.push(range);
    }

    if steps.is_empty() {
        return Err(LoadError::MissingSteps {
            path: path.to_path_buf(),
        });
    }

    Ok(PipelineDoc {
        metadata: splice_out(text, spliced),
        steps,
        hops,
    })
}

fn child_text<'a>(parent: roxmltree::Node<'a, '_>, tag: &str) -> Option<&'a str> {
    parent
        .children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
}

/// Removes the given byte ranges from the text.
///
/// Ranges cover whole elements and never overlap; they are copied
/// around in ascending order so a single forward pass suffices.
fn splice_out(text: &str, mut ranges: Vec<Range<usize>>) -> String {
    ranges.sort_by_key(|r| r.start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for range in ranges {
        out.push_str(&text[cursor..range.start]);
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}
