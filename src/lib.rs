// Main library entry point for gategraph.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
