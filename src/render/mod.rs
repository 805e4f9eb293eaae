//! # Report Rendering
//!
//! Turns the aggregated diff into the final interactive report:
//!
//! 1. [`DiffGraph`] builds the annotated union graph of both versions.
//! 2. [`dot_source`] serializes it to Graphviz dot text.
//! 3. [`LayoutEngine`] hands the dot text to an external layout program
//!    and gets back inline SVG.
//! 4. [`render_report`] embeds the SVG and the diff payloads in a
//!    single self-contained page.
//!
//! The layout engine is the only external collaborator; it is invoked
//! exactly once per report and any failure is terminal.

mod graph;
mod dot;
mod layout;
mod html;

pub use graph::{DiffGraph, HopStyle, StepStyle};
pub use dot::dot_source;
pub use layout::{DotProcess, LayoutEngine, LayoutError};
pub use html::render_report;
