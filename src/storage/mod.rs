//! Import summary output

use anyhow::Result;
use itertools::Itertools;
use serde_json::{json, to_string_pretty, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::graph::{Direction, NodeId};
use crate::import::ImportedGraph;

/// Write `summary.json` describing an import into `output_dir`
pub fn save_summary(graph: &ImportedGraph, output_dir: &str) -> Result<()> {
    log::info!("Saving import summary to {}", output_dir);

    fs::create_dir_all(output_dir)?;

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(&summary(graph))?.as_bytes())?;

    log::info!("Summary saved successfully");

    Ok(())
}

/// Summary of an import as JSON
pub fn summary(graph: &ImportedGraph) -> Value {
    let node_count = graph.node_count();
    let outgoing = graph.matrix.relationship_count(Direction::Outgoing);
    let incoming = graph.matrix.relationship_count(Direction::Incoming);
    let compressed = graph.matrix.compressed_size();
    let stored = outgoing + incoming;

    json!({
        "graph_stats": {
            "node_count": node_count,
            "undirected": graph.undirected,
            "outgoing_relationships": outgoing,
            "incoming_relationships": incoming,
            "avg_degree": stored as f64 / node_count.max(1) as f64,
            "outgoing_degree_distribution": degree_distribution(graph, Direction::Outgoing),
        },
        "storage_stats": {
            "compressed_bytes": compressed,
            "bytes_per_relationship": compressed as f64 / stored.max(1) as f64,
        },
        "import_stats": {
            "threads": graph.sizing.number_of_threads(),
            "batch_size": graph.sizing.batch_size(),
            "batches": graph.sizing.batch_count(node_count),
        },
        "weight_stats": {
            "relationship_weights": graph.weights.relationship_weights.as_ref().map(|w| w.len()),
            "node_weights": graph.weights.node_weights.as_ref().map(|w| w.len()),
            "node_properties": graph.weights.node_properties.as_ref().map(|w| w.len()),
        }
    })
}

/// Node counts per degree, degrees above 100 share the last bucket
fn degree_distribution(graph: &ImportedGraph, direction: Direction) -> Vec<usize> {
    let counts = (0..graph.node_count() as NodeId)
        .map(|node| graph.matrix.degree(node, direction).min(100))
        .counts();

    (0..=100)
        .map(|degree| counts.get(&degree).copied().unwrap_or(0))
        .collect()
}
