//! DOT Graph Exporter
//!
//! Renders the ordered edge sequence as a Graphviz digraph. Node and
//! edge styling is a small decision table over the record kinds on each
//! side of the edge, plus a slow-response highlight for standalone
//! response nodes.

use std::io::Write;

use crate::domain::edge::Edge;
use crate::domain::record::{Record, Response};
use crate::ports::OutputExporter;

const CALL_COLOR: &str = "forestgreen";
const RESPONSE_COLOR: &str = "cornflowerblue";
const ALERT_COLOR: &str = "maroon";

/// Hard-wrap column for node label lines; log resources and params can
/// get long enough to make unwrapped nodes unreadable.
const MAX_LABEL_WIDTH: usize = 40;

pub struct DotExporter {
    /// Standalone responses at or above this many milliseconds render
    /// in the alert color. `None` or zero disables the highlight.
    slow_threshold_ms: Option<u64>,
}

impl Default for DotExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DotExporter {
    pub fn new() -> Self {
        Self {
            slow_threshold_ms: None,
        }
    }

    pub fn with_slow_threshold(threshold_ms: u64) -> Self {
        Self {
            slow_threshold_ms: Some(threshold_ms),
        }
    }

    /// Render the edge sequence to a DOT document string.
    pub fn to_dot(&self, edges: &[Edge]) -> String {
        let mut lines = Vec::new();

        lines.push("digraph G {".to_string());
        lines.push(
            "    node [shape=record,fontname=\"Helvetica-Bold\",fontcolor=white];".to_string(),
        );
        lines.push("    rankdir=LR;".to_string());
        lines.push("    ordering=out;".to_string());
        lines.push(String::new());

        for edge in edges {
            match &edge.to {
                None => {
                    lines.push(format!(
                        "    \"{}\" [color={},fontcolor=white,style=filled];",
                        node_label(&edge.from),
                        self.node_color(&edge.from)
                    ));
                }
                Some(to) => {
                    // A style directive right before each edge statement
                    // applies to that edge; relational edges carry all
                    // color, the `to` node gets no node statement here.
                    let (color, arrowhead) = edge_style(to);
                    lines.push(format!("    edge [color={},style=bold];", color));
                    lines.push(format!(
                        "    \"{}\" -> \"{}\" [arrowhead={}];",
                        node_label(&edge.from),
                        node_label(to),
                        arrowhead
                    ));
                }
            }
        }

        lines.push("}".to_string());
        lines.join("\n") + "\n"
    }

    fn node_color(&self, rec: &Record) -> &'static str {
        match rec {
            Record::Request(_) => CALL_COLOR,
            Record::Response(res) => {
                if self.is_slow(res) {
                    ALERT_COLOR
                } else {
                    RESPONSE_COLOR
                }
            }
        }
    }

    fn is_slow(&self, res: &Response) -> bool {
        match self.slow_threshold_ms {
            Some(threshold) if threshold > 0 => res.elapsed_us >= threshold * 1000,
            _ => false,
        }
    }
}

/// Relational edge style, keyed by the target kind: the `from` side of
/// a relation is always a request by construction.
fn edge_style(to: &Record) -> (&'static str, &'static str) {
    match to {
        Record::Request(_) => (CALL_COLOR, "normal"),
        Record::Response(_) => (RESPONSE_COLOR, "odot"),
    }
}

/// Multi-line DOT label: wrap each label line to the maximum column
/// width, escape characters that would break the quoted string, and
/// join with the DOT line-break escape.
fn node_label(rec: &Record) -> String {
    let mut parts = Vec::new();
    for line in rec.label_lines() {
        for chunk in wrap_line(&line, MAX_LABEL_WIDTH) {
            parts.push(escape_label(&chunk));
        }
    }
    parts.join("\\n")
}

fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= width {
        return vec![line.to_string()];
    }
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

fn escape_label(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl OutputExporter for DotExporter {
    fn export(&self, edges: &[Edge], sink: &mut dyn Write) -> std::io::Result<()> {
        sink.write_all(self.to_dot(edges).as_bytes())
    }
}
