//! Relationship import for one batch of nodes

use crate::config::GraphSetup;
use crate::data::{GraphStore, IdMapping};
use crate::graph::{MatrixBatch, NodeRange, NodeWeights, RelationshipWeights, WeightMap};
use crate::import::loader::{prepare_loader, BatchState, Source};
use crate::import::progress::ImportProgress;

/// Weight and property mappings of a whole import; `None` when not configured
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightMappings {
    pub relationship_weights: Option<RelationshipWeights>,
    pub node_weights: Option<NodeWeights>,
    pub node_properties: Option<NodeWeights>,
}

impl WeightMappings {
    /// Empty mappings for every property the setup asks for
    pub fn for_setup(setup: &GraphSetup) -> Self {
        Self {
            relationship_weights: setup
                .relationship_weight
                .as_ref()
                .map(|spec| WeightMap::new(spec.default)),
            node_weights: setup.node_weight.as_ref().map(|spec| WeightMap::new(spec.default)),
            node_properties: setup
                .node_property
                .as_ref()
                .map(|spec| WeightMap::new(spec.default)),
        }
    }
}

/// Imports the relationships of the nodes in one matrix batch
pub struct RelationshipImporter<'a> {
    source: Source<'a>,
    setup: &'a GraphSetup,
    progress: &'a ImportProgress,
    state: BatchState<'a>,
}

impl<'a> RelationshipImporter<'a> {
    pub fn new(
        store: &'a dyn GraphStore,
        id_map: &'a dyn IdMapping,
        setup: &'a GraphSetup,
        progress: &'a ImportProgress,
        batch: MatrixBatch<'a>,
    ) -> Self {
        let local = WeightMappings::for_setup(setup);
        Self {
            source: Source {
                store,
                id_map,
                relationship_type: setup.relationship_type.as_deref(),
            },
            setup,
            progress,
            state: BatchState {
                batch,
                rel_weights: local.relationship_weights,
                node_weights: local.node_weights,
                node_props: local.node_properties,
            },
        }
    }

    pub fn node_range(&self) -> NodeRange {
        self.state.batch.range()
    }

    pub fn thread_name(&self) -> String {
        let range = self.node_range();
        format!("RelationshipImport ({}..{})", range.start(), range.end())
    }

    /// Load every node of the batch.
    ///
    /// Nodes the store cannot find are skipped; progress advances either way.
    pub fn run(&mut self) {
        let mut loader = prepare_loader(self.setup);
        let range = self.node_range();
        log::debug!("{} started", self.thread_name());

        let mut missing = 0usize;
        for node in range.iter() {
            let original = self.source.id_map.to_original(node);
            if self.source.store.node_exists(original) {
                loader.load(&self.source, &mut self.state, original, node);
            } else {
                missing += 1;
            }
            self.progress.node_imported();
        }

        if missing > 0 {
            log::debug!("{} skipped {} nodes missing from the store", self.thread_name(), missing);
        }
        log::debug!("{} finished", self.thread_name());
    }

    /// Move this batch's mappings into the global ones.
    ///
    /// A mapping is merged only when both sides are configured.
    pub fn write_into(&mut self, global: &mut WeightMappings) {
        combine_maps(&mut global.relationship_weights, self.state.rel_weights.take());
        combine_maps(&mut global.node_weights, self.state.node_weights.take());
        combine_maps(&mut global.node_properties, self.state.node_props.take());
    }

    /// Give up the batch and any mappings still held
    pub fn release(self) {}
}

fn combine_maps<K>(global: &mut Option<WeightMap<K>>, local: Option<WeightMap<K>>)
where
    K: Eq + std::hash::Hash + Copy,
{
    if let (Some(global), Some(local)) = (global.as_mut(), local) {
        global.merge_from(local);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PropertySpec;
    use crate::data::{IdMap, InMemoryGraphStore};
    use crate::graph::{AdjacencyMatrix, Direction};

    #[test]
    fn missing_nodes_are_skipped_but_counted() {
        let mut store = InMemoryGraphStore::new();
        store.add_relationship(10, 20, "R");
        // 99 is mapped but absent from the store
        let id_map = IdMap::from_originals(vec![10, 20, 99]);
        let setup = GraphSetup::new(1, true, false);
        let progress = ImportProgress::new(3);
        let mut matrix = AdjacencyMatrix::new(3);

        {
            let batch = matrix.batches_mut(4).pop().unwrap();
            let mut importer = RelationshipImporter::new(&store, &id_map, &setup, &progress, batch);
            assert_eq!(importer.thread_name(), "RelationshipImport (0..3)");
            importer.run();
            importer.release();
        }

        assert_eq!(progress.imported(), 3);
        assert_eq!(matrix.adjacency(0, Direction::Outgoing).collect::<Vec<_>>(), vec![1]);
        assert_eq!(matrix.degree(2, Direction::Outgoing), 0);
    }

    #[test]
    fn write_into_moves_local_weights() {
        let mut store = InMemoryGraphStore::new();
        let rel = store.add_relationship(1, 2, "R");
        store.set_relationship_property(rel, "w", 0.5);
        let id_map = store.id_map();
        let setup = GraphSetup {
            relationship_weight: Some(PropertySpec::new("w", 0.0)),
            ..GraphSetup::new(1, true, false)
        };
        let progress = ImportProgress::new(2);
        let mut matrix = AdjacencyMatrix::new(2);
        let mut global = WeightMappings::for_setup(&setup);
        global.relationship_weights.as_mut().unwrap().put((0, 1), 0.1);

        let batch = matrix.batches_mut(2).pop().unwrap();
        let mut importer = RelationshipImporter::new(&store, &id_map, &setup, &progress, batch);
        importer.run();
        importer.write_into(&mut global);
        // a second merge finds nothing left
        importer.write_into(&mut global);

        let weights = global.relationship_weights.unwrap();
        assert_eq!(weights.get((0, 1)), 0.5);
        assert_eq!(weights.len(), 1);
        assert!(global.node_weights.is_none());
    }
}
