//! Call Graph Builder
//!
//! Turns the flat, ordered record sequence into the three indices the
//! edge extractor works from: a call tree keyed by parent correlation
//! id, a request-by-id table, and a response-by-id table. Built in one
//! pass and never mutated afterward.

use std::collections::HashMap;

use crate::domain::record::{Record, Request, Response};

/// Delimiter between nesting levels of a correlation id.
pub const ID_DELIMITER: char = ';';

#[derive(Debug, Default)]
pub struct CallGraph {
    /// All records in original line order.
    pub records: Vec<Record>,
    /// Parent correlation id -> child records, in line order. Every
    /// record appears exactly once, under the key derived from its own
    /// id; a single-segment id hangs off the root key "".
    pub calls: HashMap<String, Vec<Record>>,
    /// Correlation id -> the request with that id. Last write wins when
    /// an id recurs; duplicate ids are not validated.
    pub requests: HashMap<String, Request>,
    /// Correlation id -> responses with that id, in line order.
    pub responses: HashMap<String, Vec<Response>>,
}

impl CallGraph {
    /// Index the record sequence. O(n) over the records with
    /// amortized-O(1) map operations.
    pub fn build(records: Vec<Record>) -> Self {
        let mut graph = CallGraph::default();
        for rec in &records {
            graph
                .calls
                .entry(parent_key(&rec.header().id))
                .or_default()
                .push(rec.clone());
            match rec {
                Record::Request(req) => {
                    graph.requests.insert(req.header.id.clone(), req.clone());
                }
                Record::Response(res) => {
                    graph
                        .responses
                        .entry(res.header.id.clone())
                        .or_default()
                        .push(res.clone());
                }
            }
        }
        graph.records = records;
        graph
    }
}

/// Parent key of a correlation id: all segments except the last, so
/// "A;B;C" -> "A;B" and a single-segment id -> "".
pub fn parent_key(id: &str) -> String {
    match id.rsplit_once(ID_DELIMITER) {
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}
