//! Parallel relationship import into the compressed adjacency matrix

pub mod importer;
pub mod loader;
pub mod pool;
pub mod progress;
pub mod sizing;

use std::time::Instant;

use crate::config::GraphSetup;
use crate::data::{GraphStore, IdMapping};
use crate::error::Result;
use crate::graph::{Adjacency, AdjacencyMatrix, Direction, NodeId};

pub use importer::{RelationshipImporter, WeightMappings};
pub use pool::{DedicatedThreads, WorkerPool};
pub use progress::ImportProgress;
pub use sizing::{ThreadSizing, MAX_BATCH_SIZE};

/// Compressed adjacency and merged mappings produced by an import
#[derive(Debug, Clone)]
pub struct ImportedGraph {
    pub matrix: AdjacencyMatrix,
    pub weights: WeightMappings,
    pub sizing: ThreadSizing,
    pub undirected: bool,
}

impl ImportedGraph {
    pub fn node_count(&self) -> usize {
        self.matrix.node_count()
    }

    /// Targets of `node`; undirected graphs keep a single list per node
    pub fn adjacency(&self, node: NodeId, direction: Direction) -> Adjacency<'_> {
        let direction = if self.undirected {
            Direction::Outgoing
        } else {
            direction
        };
        self.matrix.adjacency(node, direction)
    }

    /// Weight of `source -> target`, `None` when weights were not loaded
    pub fn relationship_weight(&self, source: NodeId, target: NodeId) -> Option<f64> {
        self.weights
            .relationship_weights
            .as_ref()
            .map(|weights| weights.get((source, target)))
    }
}

/// Import the relationships of every mapped node.
///
/// The node range is split into power-of-two batches, each owned by one
/// `RelationshipImporter`. All importers run on `pool` at once; once every one
/// of them has finished their mappings are merged on the calling thread.
pub fn load_relationships<P: WorkerPool>(
    store: &dyn GraphStore,
    id_map: &dyn IdMapping,
    setup: &GraphSetup,
    pool: &P,
) -> Result<ImportedGraph> {
    setup.validate()?;
    let start = Instant::now();
    let node_count = id_map.node_count();

    let sizing = ThreadSizing::new(setup.concurrency, node_count as u64, pool)?;
    log::info!(
        "Importing relationships of {} nodes with {} threads, batch size {}",
        node_count,
        sizing.number_of_threads(),
        sizing.batch_size()
    );

    let mut matrix = AdjacencyMatrix::new(node_count);
    let mut weights = WeightMappings::for_setup(setup);
    let progress = ImportProgress::new(node_count);

    {
        let mut importers: Vec<RelationshipImporter<'_>> = matrix
            .batches_mut(sizing.batch_size())
            .into_iter()
            .map(|batch| RelationshipImporter::new(store, id_map, setup, &progress, batch))
            .collect();
        log::debug!("Starting {} importer batches", importers.len());

        pool.run_all(&mut importers, |importer| importer.run())?;

        for mut importer in importers {
            importer.write_into(&mut weights);
            importer.release();
        }
    }

    log::info!(
        "Imported {} outgoing and {} incoming relationships into {} bytes in {:.2?}",
        matrix.relationship_count(Direction::Outgoing),
        matrix.relationship_count(Direction::Incoming),
        matrix.compressed_size(),
        start.elapsed()
    );

    Ok(ImportedGraph {
        matrix,
        weights,
        sizing,
        undirected: setup.load_as_undirected,
    })
}
