// Domain layer: record model, log parsing, graph indexing, edge
// extraction. Pure data and algorithms, no output concerns.

pub mod callgraph;
pub mod edge;
pub mod parser;
pub mod record;
