//! External graph layout
//!
//! Layout is delegated to Graphviz: dot text goes in on stdin, SVG
//! comes out on stdout. The engine sits behind a trait so report
//! assembly can be exercised without a Graphviz install.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Failed to run layout program {program}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Layout program {program} exited with {status}: {stderr}")]
    Failed {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Layout program {program} produced no <svg> element")]
    NotSvg { program: PathBuf },
}

/// A collaborator that lays out a directed graph description.
pub trait LayoutEngine {
    /// Renders dot text to an inline-embeddable SVG fragment.
    fn render_svg(&self, dot: &str) -> Result<String, LayoutError>;
}

/// Graphviz `dot` invoked as a child process, once per report.
pub struct DotProcess {
    program: PathBuf,
}

// Everything ahead of the <svg> element (XML prolog, doctype) must go
// before the markup can be inlined into an HTML page.
static SVG_PREAMBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*<\?xml.*?<svg").unwrap());

impl DotProcess {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl LayoutEngine for DotProcess {
    fn render_svg(&self, dot: &str) -> Result<String, LayoutError> {
        let spawn_err = |source| LayoutError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .arg("-Tsvg")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        // A failing program may close its stdin early; hold the write
        // error until the exit status has had a chance to explain it.
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(dot.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output().map_err(spawn_err)?;

        if !output.status.success() {
            return Err(LayoutError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        write_result.map_err(spawn_err)?;

        inline_svg(
            &String::from_utf8_lossy(&output.stdout),
            &self.program,
        )
    }
}

/// Strips the XML preamble and checks that an `<svg>` element is
/// actually present.
fn inline_svg(stdout: &str, program: &std::path::Path) -> Result<String, LayoutError> {
    let svg = SVG_PREAMBLE.replace(stdout, "<svg").into_owned();
    if !svg.contains("<svg") {
        return Err(LayoutError::NotSvg {
            program: program.to_path_buf(),
        });
    }
    Ok(svg)
}
