//! LunarisDB ERD - entity-relationship diagrams
//!
//! A diagram is built in three steps:
//!
//! 1. [`ErdGraph::from_inspector`] reads tables, columns and foreign keys
//! 2. [`ErdGraph::to_dot`] writes the graph as Graphviz DOT
//! 3. an [`ErdRenderer`] lays it out and rasterises it
//!
//! [`ErdGenerator`] ties the steps together and moves the finished file
//! into place.

mod format;
mod generator;
mod graph;
mod render;

pub use format::{ErdFormat, resolve_output_path};
pub use generator::ErdGenerator;
pub use graph::{ErdGraph, ErdTable};
pub use render::{ErdRenderer, GraphvizRenderer};
