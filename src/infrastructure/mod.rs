// Infrastructure: everything that touches the world outside the
// process (the external Graphviz renderer).

pub mod dot_runner;

pub use dot_runner::{render_with_dot, OutputFormat};
