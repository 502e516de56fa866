//! Compressed adjacency representation

pub mod varlong;
pub mod compression;
pub mod decompression;
pub mod matrix;
pub mod weights;
pub mod intersect;

use serde::{Deserialize, Serialize};

pub use compression::CHUNK_SIZE;
pub use decompression::{Adjacency, AdjacencyDecompression, Seek};
pub use matrix::{AdjacencyMatrix, MatrixBatch, NodeRange};
pub use weights::{NodeWeights, RelationshipWeights, WeightMap};

/// Dense internal node id
pub type NodeId = u64;

/// Relationship direction as seen from the node being loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
}
