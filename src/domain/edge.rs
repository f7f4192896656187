//! Edge Extraction and Ordering
//!
//! Derives the full edge multiset the serializer must draw (standalone
//! nodes, request->request call edges, request->response pairing edges)
//! and imposes a deterministic total order so repeated runs over the
//! same log reproduce the same output byte for byte.

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::callgraph::CallGraph;
use crate::domain::record::Record;

/// One drawing instruction: a standalone node when `to` is `None`, a
/// directed relation otherwise. Rebuilt fresh per output run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: Record,
    pub to: Option<Record>,
}

/// Generate the edge multiset from the graph indices. Generation order
/// is irrelevant; only the final sort determines emission order.
pub fn extract_edges(graph: &CallGraph) -> Vec<Edge> {
    let mut edges = Vec::new();

    // Every record renders as a node exactly once, whether or not it
    // participates in any relation.
    for rec in &graph.records {
        edges.push(Edge {
            from: rec.clone(),
            to: None,
        });
    }

    // Call edges: a record's children live under its own id in the
    // call tree. Only request->request nesting draws an edge; a
    // response is never an endpoint of a call edge.
    for children in graph.calls.values() {
        for child in children {
            let Some(grandchildren) = graph.calls.get(&child.header().id) else {
                continue;
            };
            if let Record::Request(_) = child {
                for grandchild in grandchildren {
                    if let Record::Request(_) = grandchild {
                        edges.push(Edge {
                            from: child.clone(),
                            to: Some(grandchild.clone()),
                        });
                    }
                }
            }
        }
    }

    // Response edges: one per recorded response whose id also has a
    // request. An unanswered request draws no placeholder; its
    // standalone node above already covers it.
    for (id, req) in &graph.requests {
        let Some(responses) = graph.responses.get(id) else {
            continue;
        };
        for res in responses {
            edges.push(Edge {
                from: Record::Request(req.clone()),
                to: Some(Record::Response(res.clone())),
            });
        }
    }

    edges
}

/// Total order over edges: standalone nodes first, by from-line
/// descending; then relational edges by from-line descending, ties by
/// to-line ascending. Presentation only (it drives renderer rank
/// hints), but output byte-equality depends on it.
pub fn sort_by_lineno(edges: &mut [Edge]) {
    edges.sort_by(|a, b| match (&a.to, &b.to) {
        (None, None) => b.from.header().lineno.cmp(&a.from.header().lineno),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_to), Some(b_to)) => b
            .from
            .header()
            .lineno
            .cmp(&a.from.header().lineno)
            .then_with(|| a_to.header().lineno.cmp(&b_to.header().lineno)),
    });
}
