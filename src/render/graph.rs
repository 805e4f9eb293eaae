//! Annotated union graph of two pipeline versions
//!
//! One node per step in either version, one edge per hop in either
//! version, each carrying its classification. Thin wrapper around
//! petgraph so the dot writer can walk nodes and edges in a stable
//! order.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::domain::{fingerprint, ChangeKind, DiffBundle, StructuralDiff};

/// Node payload: one step of either version.
#[derive(Debug, Clone)]
pub struct StepStyle {
    /// Display name, already wrapped and escaped for dot.
    pub name: String,
    /// Fingerprint linking the rendered element to its diff payload.
    pub id: String,
    pub change: ChangeKind,
}

/// Edge payload: one hop of either version.
#[derive(Debug, Clone, Copy)]
pub struct HopStyle {
    pub change: ChangeKind,
}

/// Directed graph over the union of steps and hops.
#[derive(Debug)]
pub struct DiffGraph {
    graph: DiGraph<StepStyle, HopStyle>,
}

impl DiffGraph {
    /// Builds the annotated graph from the structural classification
    /// and the aggregated bundle.
    pub fn build(structural: &StructuralDiff, bundle: &DiffBundle) -> Self {
        let mut graph = DiGraph::new();
        let mut index: HashMap<String, NodeIndex> = HashMap::new();

        for name in structural.step_names() {
            let idx = graph.add_node(StepStyle {
                name: name.clone(),
                id: fingerprint(name),
                change: bundle.change(name),
            });
            index.insert(name.clone(), idx);
        }

        let hop_groups = [
            (&structural.added_hops, ChangeKind::Added),
            (&structural.removed_hops, ChangeKind::Removed),
            (&structural.common_hops, ChangeKind::Unchanged),
        ];
        for (hops, change) in hop_groups {
            for hop in hops.iter() {
                let from = ensure_node(&mut graph, &mut index, &hop.from);
                let to = ensure_node(&mut graph, &mut index, &hop.to);
                graph.add_edge(from, to, HopStyle { change });
            }
        }

        Self { graph }
    }

    /// Steps in insertion order: added, removed, then common.
    pub fn steps(&self) -> impl Iterator<Item = &StepStyle> {
        self.graph.node_weights()
    }

    /// Hops with their endpoint payloads, in insertion order.
    pub fn hops(&self) -> impl Iterator<Item = (&StepStyle, &StepStyle, &HopStyle)> {
        self.graph
            .edge_references()
            .map(|edge| (&self.graph[edge.source()], &self.graph[edge.target()], edge.weight()))
    }

    pub fn step_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn hop_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Resolves a hop endpoint to its node, materializing one for dangling
/// endpoints that match no step in either version.
fn ensure_node(
    graph: &mut DiGraph<StepStyle, HopStyle>,
    index: &mut HashMap<String, NodeIndex>,
    name: &str,
) -> NodeIndex {
    if let Some(idx) = index.get(name) {
        return *idx;
    }
    let idx = graph.add_node(StepStyle {
        name: name.to_string(),
        id: fingerprint(name),
        change: ChangeKind::Unchanged,
    });
    index.insert(name.to_string(), idx);
    idx
}
