// Pipeline use case: parse -> index -> extract -> order -> export,
// strictly forward, against any exporter port.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::callgraph::CallGraph;
use crate::domain::edge::{extract_edges, sort_by_lineno};
use crate::domain::parser::LogParser;
use crate::ports::OutputExporter;

pub struct CallGraphUsecase<'a> {
    pub parser: &'a LogParser,
    pub exporter: &'a dyn OutputExporter,
}

impl CallGraphUsecase<'_> {
    pub fn run(&self, input: impl BufRead, sink: &mut dyn Write) -> Result<()> {
        let records = self
            .parser
            .parse(input)
            .context("failed to parse trace log")?;
        info!(records = records.len(), "parsed trace log");

        let graph = CallGraph::build(records);
        let mut edges = extract_edges(&graph);
        sort_by_lineno(&mut edges);
        info!(
            nodes = edges.iter().filter(|e| e.to.is_none()).count(),
            relations = edges.iter().filter(|e| e.to.is_some()).count(),
            "extracted call graph"
        );

        self.exporter
            .export(&edges, sink)
            .context("failed to write graph")
    }
}
