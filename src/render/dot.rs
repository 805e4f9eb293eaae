//! Graphviz serialization of the annotated graph
//!
//! Produces the dot text handed to the layout engine. Step names are
//! already wrapped and quote-escaped by the display transform, so they
//! embed directly in quoted identifiers; the fingerprint becomes the
//! SVG element id the report's click handlers look up.

use crate::domain::ChangeKind;

use super::graph::DiffGraph;

/// Fill colors keyed by step classification.
fn fill_color(change: ChangeKind) -> &'static str {
    match change {
        ChangeKind::Added => "\"#5fd35f\"",
        ChangeKind::Removed => "\"#ff5555\"",
        ChangeKind::Modified => "yellow",
        ChangeKind::Unchanged => "white",
    }
}

/// Stroke colors keyed by hop classification. Hops carry no body to
/// diff, so `Modified` never reaches here.
fn hop_color(change: ChangeKind) -> &'static str {
    match change {
        ChangeKind::Added => "green",
        ChangeKind::Removed => "red",
        _ => "black",
    }
}

/// Serializes the annotated graph to dot text.
pub fn dot_source(graph: &DiffGraph) -> String {
    let mut dot = String::new();
    dot.push_str("digraph G {\n");
    dot.push_str("  node [fontname=\"sans\" shape=box style=filled width=0.5 fillcolor=white]\n");

    for step in graph.steps() {
        dot.push_str(&format!(
            "  \"{}\" [id=\"{}\" fillcolor={}]\n",
            step.name,
            step.id,
            fill_color(step.change)
        ));
    }

    for (from, to, hop) in graph.hops() {
        dot.push_str(&format!(
            "  \"{}\" -> \"{}\" [color={}]\n",
            from.name,
            to.name,
            hop_color(hop.change)
        ));
    }

    dot.push_str("}\n");
    dot
}
