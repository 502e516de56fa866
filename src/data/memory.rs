//! In-memory graph store and id mapping

use std::collections::HashMap;

use crate::data::{GraphStore, IdMapping, OriginalId, RelationshipId, RelationshipRecord};
use crate::graph::{Direction, NodeId};

/// Interned relationship type index
pub type RelTypeId = u16;

#[derive(Debug, Clone, Default)]
struct StoredNode {
    outgoing: Vec<RelationshipId>,
    incoming: Vec<RelationshipId>,
    properties: HashMap<String, f64>,
}

#[derive(Debug, Clone)]
struct StoredRelationship {
    source: OriginalId,
    target: OriginalId,
    rel_type: RelTypeId,
    properties: HashMap<String, f64>,
}

/// Graph store held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraphStore {
    nodes: HashMap<OriginalId, StoredNode>,
    relationships: Vec<StoredRelationship>,
    rel_types: Vec<String>,
    rel_type_map: HashMap<String, RelTypeId>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(source, target, weight)` triples of one type.
    ///
    /// Weights are stored under `weight_property` when present.
    pub fn from_triples<I>(rel_type: &str, weight_property: &str, triples: I) -> Self
    where
        I: IntoIterator<Item = (OriginalId, OriginalId, Option<f64>)>,
    {
        let mut store = Self::new();
        for (source, target, weight) in triples {
            let id = store.add_relationship(source, target, rel_type);
            if let Some(weight) = weight {
                store.set_relationship_property(id, weight_property, weight);
            }
        }
        store
    }

    fn intern_rel_type(&mut self, rel_type: &str) -> RelTypeId {
        if let Some(&id) = self.rel_type_map.get(rel_type) {
            return id;
        }
        let id = self.rel_types.len() as RelTypeId;
        self.rel_types.push(rel_type.to_string());
        self.rel_type_map.insert(rel_type.to_string(), id);
        id
    }

    /// Register a node without relationships
    pub fn add_node(&mut self, node: OriginalId) {
        self.nodes.entry(node).or_default();
    }

    pub fn set_node_property(&mut self, node: OriginalId, key: &str, value: f64) {
        self.nodes
            .entry(node)
            .or_default()
            .properties
            .insert(key.to_string(), value);
    }

    /// Add a relationship, creating missing endpoints
    pub fn add_relationship(
        &mut self,
        source: OriginalId,
        target: OriginalId,
        rel_type: &str,
    ) -> RelationshipId {
        let rel_type = self.intern_rel_type(rel_type);
        let id = self.relationships.len() as RelationshipId;
        self.relationships.push(StoredRelationship {
            source,
            target,
            rel_type,
            properties: HashMap::new(),
        });
        self.nodes.entry(source).or_default().outgoing.push(id);
        self.nodes.entry(target).or_default().incoming.push(id);
        id
    }

    pub fn set_relationship_property(&mut self, relationship: RelationshipId, key: &str, value: f64) {
        self.relationships[relationship as usize]
            .properties
            .insert(key.to_string(), value);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Id mapping over every stored node in ascending store-id order
    pub fn id_map(&self) -> IdMap {
        let mut originals: Vec<OriginalId> = self.nodes.keys().copied().collect();
        originals.sort_unstable();
        IdMap::from_originals(originals)
    }
}

impl GraphStore for InMemoryGraphStore {
    fn node_exists(&self, node: OriginalId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn for_each_relationship(
        &self,
        node: OriginalId,
        direction: Direction,
        relationship_type: Option<&str>,
        visit: &mut dyn FnMut(RelationshipRecord),
    ) {
        let stored = match self.nodes.get(&node) {
            Some(stored) => stored,
            None => return,
        };
        let type_filter = match relationship_type {
            Some(name) => match self.rel_type_map.get(name) {
                Some(&id) => Some(id),
                // unknown type matches nothing
                None => return,
            },
            None => None,
        };
        let ids = match direction {
            Direction::Outgoing => &stored.outgoing,
            Direction::Incoming => &stored.incoming,
        };

        for &id in ids {
            let rel = &self.relationships[id as usize];
            if type_filter.map_or(true, |t| t == rel.rel_type) {
                visit(RelationshipRecord {
                    id,
                    source: rel.source,
                    target: rel.target,
                });
            }
        }
    }

    fn relationship_property(&self, relationship: RelationshipId, key: &str) -> Option<f64> {
        self.relationships
            .get(relationship as usize)
            .and_then(|rel| rel.properties.get(key).copied())
    }

    fn node_property(&self, node: OriginalId, key: &str) -> Option<f64> {
        self.nodes
            .get(&node)
            .and_then(|stored| stored.properties.get(key).copied())
    }
}

/// Dense id mapping backed by a vector and a reverse hash map
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    originals: Vec<OriginalId>,
    mapped: HashMap<OriginalId, NodeId>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_originals<I>(originals: I) -> Self
    where
        I: IntoIterator<Item = OriginalId>,
    {
        let mut map = Self::new();
        for original in originals {
            map.add(original);
        }
        map
    }

    /// Map `original` to the next dense id, or return its existing id
    pub fn add(&mut self, original: OriginalId) -> NodeId {
        if let Some(&node) = self.mapped.get(&original) {
            return node;
        }
        let node = self.originals.len() as NodeId;
        self.originals.push(original);
        self.mapped.insert(original, node);
        node
    }
}

impl IdMapping for IdMap {
    fn node_count(&self) -> usize {
        self.originals.len()
    }

    fn to_original(&self, node: NodeId) -> OriginalId {
        self.originals[node as usize]
    }

    fn to_mapped(&self, original: OriginalId) -> Option<NodeId> {
        self.mapped.get(&original).copied()
    }
}
