//! GraphML rendering for adtopo topology graphs.
//!
//! This crate turns a populated [`Graph`] into a GraphML interchange
//! document for external visualization tooling. The document carries one
//! directed graph container holding every node in insertion order, then
//! every edge; each element renders its label both as a structural
//! attribute and as a `labels` data field, plus one data field per entry in
//! its attribute list.
//!
//! All attribute values pass through XML escaping, so hostile directory
//! data degrades to ugly text instead of a malformed document.

mod graphml;

use tracing::debug;

use adtopo_core::Graph;

pub use graphml::{GraphMlWriter, escape_attr, escape_text};

/// Render the graph as a GraphML document.
pub fn write_graphml(graph: &Graph) -> String {
    let mut writer = GraphMlWriter::new("G");

    for node in graph.nodes() {
        let data: Vec<(String, String)> = node
            .attrs()
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();
        writer.node(&node.id().to_string(), node.label().as_str(), &data);
    }

    for edge in graph.edges() {
        let data: Vec<(String, String)> = edge
            .attrs()
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();
        writer.edge(
            &edge.id().to_string(),
            &edge.source().to_string(),
            &edge.target().to_string(),
            edge.label().as_str(),
            &data,
        );
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "rendered graphml document"
    );
    writer.build()
}
