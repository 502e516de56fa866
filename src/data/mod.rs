//! Boundary to the graph store relationships are imported from

pub mod memory;
pub mod parquet;

use crate::graph::{Direction, NodeId};

pub use memory::{IdMap, InMemoryGraphStore};

/// Node id native to the graph store
pub type OriginalId = u64;

/// Relationship id native to the graph store
pub type RelationshipId = u64;

/// A relationship as reported by the store, in store ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipRecord {
    pub id: RelationshipId,
    pub source: OriginalId,
    pub target: OriginalId,
}

impl RelationshipRecord {
    /// The endpoint that is not `node`, given the direction it was visited in
    pub fn other(&self, direction: Direction) -> OriginalId {
        match direction {
            Direction::Outgoing => self.target,
            Direction::Incoming => self.source,
        }
    }
}

/// Translation between dense internal ids and store ids
pub trait IdMapping: Sync {
    fn node_count(&self) -> usize;

    fn to_original(&self, node: NodeId) -> OriginalId;

    /// Internal id of a store node, `None` if the node was not imported
    fn to_mapped(&self, original: OriginalId) -> Option<NodeId>;
}

/// Read access to a graph store.
///
/// Implementations are shared by every importer thread.
pub trait GraphStore: Sync {
    fn node_exists(&self, node: OriginalId) -> bool;

    /// Visit the relationships of `node` in `direction`, optionally filtered by
    /// relationship type
    fn for_each_relationship(
        &self,
        node: OriginalId,
        direction: Direction,
        relationship_type: Option<&str>,
        visit: &mut dyn FnMut(RelationshipRecord),
    );

    fn relationship_property(&self, relationship: RelationshipId, key: &str) -> Option<f64>;

    fn node_property(&self, node: OriginalId, key: &str) -> Option<f64>;
}
