// JSON export of the ordered edge sequence, for downstream tooling
// that wants the reconstructed graph without Graphviz in the loop.

use std::io::Write;

use serde::Serialize;

use crate::domain::edge::Edge;
use crate::domain::record::Record;
use crate::ports::OutputExporter;

#[derive(Serialize)]
struct GraphDocument<'a> {
    nodes: Vec<&'a Record>,
    edges: Vec<Relation<'a>>,
}

#[derive(Serialize)]
struct Relation<'a> {
    from: &'a Record,
    to: &'a Record,
}

pub struct JsonExporter;

impl OutputExporter for JsonExporter {
    fn export(&self, edges: &[Edge], sink: &mut dyn Write) -> std::io::Result<()> {
        let doc = GraphDocument {
            nodes: edges
                .iter()
                .filter(|e| e.to.is_none())
                .map(|e| &e.from)
                .collect(),
            edges: edges
                .iter()
                .filter_map(|e| e.to.as_ref().map(|to| Relation { from: &e.from, to }))
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *sink, &doc)?;
        sink.write_all(b"\n")
    }
}
