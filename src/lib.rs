//! Flowdiff - interactive diff reports for pipeline definitions
//!
//! Flowdiff compares two versions of an XML pipeline definition (named
//! steps connected by directed hops) and renders a self-contained HTML
//! report: a Graphviz-laid-out picture of the merged pipeline with every
//! step colored by how it changed, plus click-through line diffs for
//! each step and for the shared metadata.

pub mod domain;
pub mod loader;
pub mod render;
pub mod cli;

pub use domain::{ChangeKind, DiffBundle, Hop, LineEdit, PipelineDoc, StructuralDiff};
