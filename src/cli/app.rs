//! Main CLI application structure

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::output::Output;
use crate::domain::{DiffBundle, StructuralDiff};
use crate::loader::load_pipeline;
use crate::render::{dot_source, render_report, DiffGraph, DotProcess, LayoutEngine};

#[derive(Parser)]
#[command(name = "flowdiff")]
#[command(author, version, about = "Interactive visual diff reports for pipeline definitions")]
pub struct Cli {
    /// Old version of the pipeline definition
    pub old: PathBuf,

    /// New version of the pipeline definition
    pub new: PathBuf,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Layout program used to render the pipeline graph
    #[arg(long, default_value = "dot", env = "FLOWDIFF_DOT")]
    pub dot: PathBuf,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.verbose);

    output.verbose("Flowdiff starting");
    let report = generate_report(&cli, &output)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &report)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            output.verbose_ctx("report", &format!("Wrote report to {}", path.display()));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(report.as_bytes())
                .context("Failed to write report to stdout")?;
        }
    }

    output.verbose("Report generation completed");
    Ok(())
}

fn generate_report(cli: &Cli, output: &Output) -> Result<String> {
    output.verbose_ctx("load", &format!("Loading old version from {}", cli.old.display()));
    let old = load_pipeline(&cli.old)?;
    output.verbose_ctx("load", &format!("Loading new version from {}", cli.new.display()));
    let new = load_pipeline(&cli.new)?;

    let structural = StructuralDiff::between(&old, &new);
    output.verbose_ctx(
        "diff",
        &format!(
            "{} added, {} removed, {} common steps; {} added, {} removed, {} common hops",
            structural.added_steps.len(),
            structural.removed_steps.len(),
            structural.common_steps.len(),
            structural.added_hops.len(),
            structural.removed_hops.len(),
            structural.common_hops.len(),
        ),
    );

    let bundle = DiffBundle::build(&old, &new, &structural);
    if bundle.metadata_changed() {
        output.verbose_ctx("diff", "Metadata differs between versions");
    }

    let graph = DiffGraph::build(&structural, &bundle);
    let dot = dot_source(&graph);
    output.verbose_ctx(
        "layout",
        &format!("Running {} over {} steps", cli.dot.display(), graph.step_count()),
    );
    let svg = DotProcess::new(&cli.dot).render_svg(&dot)?;

    render_report(&svg, &bundle).context("Failed to serialize diff payloads")
}
