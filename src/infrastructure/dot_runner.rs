/// External Graphviz Renderer Runner.
///
/// Hands the serialized DOT document to the `dot` layout program over
/// its standard input and lets it write the rendered output file. The
/// write side of the pipe is closed on every exit path so the renderer
/// never blocks waiting for more input.
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use tracing::debug;

// ═══════════════════════════════════════════════════════════════════════════
// Output Formats
// ═══════════════════════════════════════════════════════════════════════════

/// Output formats selectable on the command line. `Dot` and `Json` are
/// written directly; the rest go through the external renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Dot,
    Json,
    Pdf,
    Png,
    Jpeg,
}

impl OutputFormat {
    /// Parse format from string (CLI input).
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "dot" => Some(OutputFormat::Dot),
            "json" => Some(OutputFormat::Json),
            "pdf" => Some(OutputFormat::Pdf),
            "png" => Some(OutputFormat::Png),
            "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
            _ => None,
        }
    }

    /// Name as passed to `dot -T`.
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Dot => "dot",
            OutputFormat::Json => "json",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
        }
    }

    /// Whether producing this format requires the external renderer.
    pub fn needs_renderer(&self) -> bool {
        !matches!(self, OutputFormat::Dot | OutputFormat::Json)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Renderer Invocation
// ═══════════════════════════════════════════════════════════════════════════

/// Render a DOT document into `output_path` via the external `dot`
/// program.
pub fn render_with_dot(dot_source: &[u8], format: OutputFormat, output_path: &Path) -> Result<()> {
    check_dot_available()?;

    let spec = build_command_spec(format, output_path);
    debug!(program = spec.program.as_str(), ?spec.args, "spawning renderer");

    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("failed to spawn dot")?;

    {
        // Dropping the handle at the end of this block closes the
        // renderer's stdin, signaling end-of-stream — also when
        // write_all bails out early.
        let mut stdin = child
            .stdin
            .take()
            .context("renderer stdin was not captured")?;
        stdin
            .write_all(dot_source)
            .context("failed to stream graph into dot")?;
    }

    let output = child
        .wait_with_output()
        .context("failed to collect dot output")?;
    if !output.status.success() {
        bail!(
            "dot exited with status {:?}: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

/// Check that the Graphviz `dot` program is reachable on PATH.
fn check_dot_available() -> Result<()> {
    let check = Command::new("dot").arg("-V").output();
    match check {
        Ok(output) if output.status.success() => {
            // dot prints its version banner on stderr
            let version = String::from_utf8_lossy(&output.stderr);
            debug!(version = version.trim(), "renderer available");
            Ok(())
        }
        Ok(output) => {
            bail!("dot found but returned error: {:?}", output.status.code());
        }
        Err(_) => {
            bail!("dot not found in PATH. Install Graphviz (https://graphviz.org/download/) or use --format dot");
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Testable Command Builder (for unit tests)
// ═══════════════════════════════════════════════════════════════════════════

/// Describes the renderer command that would be run for a format.
/// Primarily for testing without executing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotCommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

pub fn build_command_spec(format: OutputFormat, output_path: &Path) -> DotCommandSpec {
    DotCommandSpec {
        program: "dot".to_string(),
        args: vec![
            "-T".to_string(),
            format.name().to_string(),
            "-o".to_string(),
            output_path.display().to_string(),
        ],
    }
}
