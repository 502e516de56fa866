//! Sparse weight mappings

use std::collections::HashMap;
use std::hash::Hash;

use crate::graph::NodeId;

/// Weights keyed by relationship identity `(source, target)`
pub type RelationshipWeights = WeightMap<(NodeId, NodeId)>;

/// Scalar values keyed by node id
pub type NodeWeights = WeightMap<NodeId>;

/// Sparse mapping with a single default for every unmapped key
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMap<K: Eq + Hash> {
    default_value: f64,
    weights: HashMap<K, f64>,
}

impl<K: Eq + Hash + Copy> WeightMap<K> {
    pub fn new(default_value: f64) -> Self {
        Self {
            default_value,
            weights: HashMap::new(),
        }
    }

    pub fn with_capacity(default_value: f64, capacity: usize) -> Self {
        Self {
            default_value,
            weights: HashMap::with_capacity(capacity),
        }
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Value stored for `key`, or the default
    pub fn get(&self, key: K) -> f64 {
        self.weights.get(&key).copied().unwrap_or(self.default_value)
    }

    pub fn put(&mut self, key: K, value: f64) {
        self.weights.insert(key, value);
    }

    /// Number of explicitly mapped keys
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        self.weights.iter().map(|(&key, &value)| (key, value))
    }

    /// Copy every entry of `local` into this map, overwriting on collision
    pub fn merge_from(&mut self, local: WeightMap<K>) {
        self.weights.reserve(local.weights.len());
        for (key, value) in local.weights {
            self.weights.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_keys_fall_back_to_default() {
        let mut weights = RelationshipWeights::new(1.5);
        weights.put((0, 1), 3.0);
        assert_eq!(weights.get((0, 1)), 3.0);
        assert_eq!(weights.get((1, 0)), 1.5);
    }

    #[test]
    fn disjoint_maps_merge_into_empty_global() {
        let mut global = RelationshipWeights::new(0.0);
        let mut first = RelationshipWeights::new(0.0);
        first.put((1, 2), 0.5);
        let mut second = RelationshipWeights::new(0.0);
        second.put((3, 4), 0.7);

        global.merge_from(first);
        global.merge_from(second);

        assert_eq!(global.len(), 2);
        assert_eq!(global.get((1, 2)), 0.5);
        assert_eq!(global.get((3, 4)), 0.7);
    }

    #[test]
    fn local_value_wins_on_collision() {
        let mut global = RelationshipWeights::new(0.0);
        global.put((1, 2), 0.5);
        let mut local = RelationshipWeights::new(0.0);
        local.put((1, 2), 0.9);

        global.merge_from(local);
        assert_eq!(global.get((1, 2)), 0.9);
        assert_eq!(global.len(), 1);
    }
}
