//! Relationship loading strategies
//!
//! A batch picks one loader up front from its setup: a direction strategy
//! built from plain or weighted visitors, optionally wrapped in a decorator
//! that also reads node properties.

use crate::config::{GraphSetup, PropertySpec};
use crate::data::{GraphStore, IdMapping, OriginalId};
use crate::graph::{Direction, MatrixBatch, NodeId, NodeWeights, RelationshipWeights};

/// Read-only collaborators shared by all batches
#[derive(Clone, Copy)]
pub struct Source<'a> {
    pub store: &'a dyn GraphStore,
    pub id_map: &'a dyn IdMapping,
    pub relationship_type: Option<&'a str>,
}

/// Everything one batch writes to
#[derive(Debug)]
pub struct BatchState<'a> {
    pub batch: MatrixBatch<'a>,
    pub rel_weights: Option<RelationshipWeights>,
    pub node_weights: Option<NodeWeights>,
    pub node_props: Option<NodeWeights>,
}

/// Collects the neighbors of a node in one direction
pub trait VisitRelationship {
    fn direction(&self) -> Direction;

    /// Push the mapped ids of every neighbor of `original` onto `targets`
    fn visit(
        &self,
        source: &Source<'_>,
        state: &mut BatchState<'_>,
        original: OriginalId,
        node: NodeId,
        targets: &mut Vec<u64>,
    );
}

/// Loads the relationships of one node into its batch
pub trait RelationshipLoader {
    fn load(&mut self, source: &Source<'_>, state: &mut BatchState<'_>, original: OriginalId, node: NodeId);
}

struct VisitNoWeight {
    direction: Direction,
}

impl VisitRelationship for VisitNoWeight {
    fn direction(&self) -> Direction {
        self.direction
    }

    fn visit(
        &self,
        source: &Source<'_>,
        _state: &mut BatchState<'_>,
        original: OriginalId,
        _node: NodeId,
        targets: &mut Vec<u64>,
    ) {
        let direction = self.direction;
        let id_map = source.id_map;
        source.store.for_each_relationship(
            original,
            direction,
            source.relationship_type,
            &mut |rel| {
                if let Some(other) = id_map.to_mapped(rel.other(direction)) {
                    targets.push(other);
                }
            },
        );
    }
}

struct VisitWithWeight {
    direction: Direction,
    weight: PropertySpec,
}

impl VisitRelationship for VisitWithWeight {
    fn direction(&self) -> Direction {
        self.direction
    }

    fn visit(
        &self,
        source: &Source<'_>,
        state: &mut BatchState<'_>,
        original: OriginalId,
        node: NodeId,
        targets: &mut Vec<u64>,
    ) {
        let direction = self.direction;
        let store = source.store;
        let id_map = source.id_map;
        let weight = &self.weight;
        let mut weights = state.rel_weights.as_mut();

        store.for_each_relationship(original, direction, source.relationship_type, &mut |rel| {
            let other = match id_map.to_mapped(rel.other(direction)) {
                Some(other) => other,
                None => return,
            };
            targets.push(other);

            let value = store
                .relationship_property(rel.id, &weight.property)
                .unwrap_or(weight.default);
            if value != weight.default {
                let key = match direction {
                    Direction::Outgoing => (node, other),
                    Direction::Incoming => (other, node),
                };
                if let Some(weights) = weights.as_mut() {
                    weights.put(key, value);
                }
            }
        });
    }
}

fn visitor(direction: Direction, weight: Option<&PropertySpec>) -> Box<dyn VisitRelationship + Send> {
    match weight {
        Some(weight) => Box::new(VisitWithWeight {
            direction,
            weight: weight.clone(),
        }),
        None => Box::new(VisitNoWeight { direction }),
    }
}

/// Node is found but nothing is loaded
struct ReadNothing;

impl RelationshipLoader for ReadNothing {
    fn load(&mut self, _source: &Source<'_>, _state: &mut BatchState<'_>, _original: OriginalId, _node: NodeId) {}
}

/// Outgoing-only or incoming-only
struct ReadOneDirection {
    visitor: Box<dyn VisitRelationship + Send>,
    buffer: Vec<u64>,
}

impl RelationshipLoader for ReadOneDirection {
    fn load(&mut self, source: &Source<'_>, state: &mut BatchState<'_>, original: OriginalId, node: NodeId) {
        self.buffer.clear();
        self.visitor.visit(source, state, original, node, &mut self.buffer);
        state.batch.write(node, self.visitor.direction(), &mut self.buffer, false);
    }
}

/// Outgoing and incoming into separate lists
struct ReadBoth {
    outgoing: ReadOneDirection,
    incoming: ReadOneDirection,
}

impl RelationshipLoader for ReadBoth {
    fn load(&mut self, source: &Source<'_>, state: &mut BatchState<'_>, original: OriginalId, node: NodeId) {
        self.outgoing.load(source, state, original, node);
        self.incoming.load(source, state, original, node);
    }
}

/// Both directions merged into one sorted list, stored as outgoing
struct ReadUndirected {
    outgoing: Box<dyn VisitRelationship + Send>,
    incoming: Box<dyn VisitRelationship + Send>,
    buffer: Vec<u64>,
}

impl RelationshipLoader for ReadUndirected {
    fn load(&mut self, source: &Source<'_>, state: &mut BatchState<'_>, original: OriginalId, node: NodeId) {
        self.buffer.clear();
        self.outgoing.visit(source, state, original, node, &mut self.buffer);
        self.incoming.visit(source, state, original, node, &mut self.buffer);
        state.batch.write(node, Direction::Outgoing, &mut self.buffer, false);
    }
}

/// Decorator that also records node weights and node properties
struct ReadWithNodeProperties {
    inner: Box<dyn RelationshipLoader + Send>,
    node_weight: Option<PropertySpec>,
    node_property: Option<PropertySpec>,
}

fn record_node_value(
    store: &dyn GraphStore,
    spec: Option<&PropertySpec>,
    map: Option<&mut NodeWeights>,
    original: OriginalId,
    node: NodeId,
) {
    if let (Some(spec), Some(map)) = (spec, map) {
        let value = store.node_property(original, &spec.property).unwrap_or(spec.default);
        if value != spec.default {
            map.put(node, value);
        }
    }
}

impl RelationshipLoader for ReadWithNodeProperties {
    fn load(&mut self, source: &Source<'_>, state: &mut BatchState<'_>, original: OriginalId, node: NodeId) {
        self.inner.load(source, state, original, node);
        record_node_value(
            source.store,
            self.node_weight.as_ref(),
            state.node_weights.as_mut(),
            original,
            node,
        );
        record_node_value(
            source.store,
            self.node_property.as_ref(),
            state.node_props.as_mut(),
            original,
            node,
        );
    }
}

fn one_direction(direction: Direction, weight: Option<&PropertySpec>) -> ReadOneDirection {
    ReadOneDirection {
        visitor: visitor(direction, weight),
        buffer: Vec::new(),
    }
}

fn prepare_directed(setup: &GraphSetup) -> Box<dyn RelationshipLoader + Send> {
    let weight = setup.relationship_weight.as_ref();
    match (setup.load_outgoing, setup.load_incoming) {
        (true, true) => Box::new(ReadBoth {
            outgoing: one_direction(Direction::Outgoing, weight),
            incoming: one_direction(Direction::Incoming, weight),
        }),
        (true, false) => Box::new(one_direction(Direction::Outgoing, weight)),
        (false, true) => Box::new(one_direction(Direction::Incoming, weight)),
        (false, false) => Box::new(ReadNothing),
    }
}

fn prepare_undirected(setup: &GraphSetup) -> Box<dyn RelationshipLoader + Send> {
    // each relationship is seen from both ends; weigh it once, on its source
    Box::new(ReadUndirected {
        outgoing: visitor(Direction::Outgoing, setup.relationship_weight.as_ref()),
        incoming: visitor(Direction::Incoming, None),
        buffer: Vec::new(),
    })
}

/// Compose the loader for a batch from its setup
pub fn prepare_loader(setup: &GraphSetup) -> Box<dyn RelationshipLoader + Send> {
    let loader = if setup.load_as_undirected {
        prepare_undirected(setup)
    } else {
        prepare_directed(setup)
    };

    if setup.node_weight.is_some() || setup.node_property.is_some() {
        return Box::new(ReadWithNodeProperties {
            inner: loader,
            node_weight: setup.node_weight.clone(),
            node_property: setup.node_property.clone(),
        });
    }
    loader
}
