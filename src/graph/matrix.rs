//! Per-node compressed adjacency storage

use std::ops::Range;

use crate::graph::compression::{compress, read_degree, HEADER_SIZE};
use crate::graph::decompression::Adjacency;
use crate::graph::{Direction, NodeId};

/// Half-open interval of node ids `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRange {
    start: NodeId,
    end: NodeId,
}

impl NodeRange {
    pub fn new(start: NodeId, end: NodeId) -> Self {
        assert!(start <= end, "invalid node range {}..{}", start, end);
        Self { start, end }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn end(&self) -> NodeId {
        self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node >= self.start && node < self.end
    }

    pub fn iter(&self) -> Range<NodeId> {
        self.start..self.end
    }
}

/// One compressed block per node and direction.
///
/// Nodes that were never written have degree 0.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyMatrix {
    outgoing: Vec<Vec<u8>>,
    incoming: Vec<Vec<u8>>,
}

impl AdjacencyMatrix {
    pub fn new(node_count: usize) -> Self {
        Self {
            outgoing: vec![Vec::new(); node_count],
            incoming: vec![Vec::new(); node_count],
        }
    }

    pub fn node_count(&self) -> usize {
        self.outgoing.len()
    }

    fn slots(&self, direction: Direction) -> &[Vec<u8>] {
        match direction {
            Direction::Outgoing => &self.outgoing,
            Direction::Incoming => &self.incoming,
        }
    }

    /// Compressed bytes stored for `node`, empty if nothing was written
    pub fn compressed(&self, node: NodeId, direction: Direction) -> &[u8] {
        &self.slots(direction)[node as usize]
    }

    pub fn degree(&self, node: NodeId, direction: Direction) -> usize {
        let block = self.compressed(node, direction);
        if block.len() < HEADER_SIZE {
            0
        } else {
            read_degree(block, 0)
        }
    }

    /// Decoding iterator over the targets of `node`
    pub fn adjacency(&self, node: NodeId, direction: Direction) -> Adjacency<'_> {
        let block = self.compressed(node, direction);
        if block.len() < HEADER_SIZE {
            Adjacency::empty()
        } else {
            Adjacency::new(block, 0)
        }
    }

    /// Sum of all degrees in one direction
    pub fn relationship_count(&self, direction: Direction) -> usize {
        (0..self.node_count() as NodeId)
            .map(|node| self.degree(node, direction))
            .sum()
    }

    /// Total size of every compressed block in bytes
    pub fn compressed_size(&self) -> usize {
        self.outgoing
            .iter()
            .chain(self.incoming.iter())
            .map(|block| block.len())
            .sum()
    }

    /// Split the matrix into disjoint writable batches of `batch_size` nodes.
    ///
    /// The last batch may be shorter. Each batch borrows only its own slots.
    pub fn batches_mut(&mut self, batch_size: usize) -> Vec<MatrixBatch<'_>> {
        assert!(batch_size > 0, "batch size must be positive");
        let node_count = self.node_count() as NodeId;

        self.outgoing
            .chunks_mut(batch_size)
            .zip(self.incoming.chunks_mut(batch_size))
            .enumerate()
            .map(|(index, (outgoing, incoming))| {
                let start = (index * batch_size) as NodeId;
                let end = (start + batch_size as NodeId).min(node_count);
                MatrixBatch {
                    range: NodeRange::new(start, end),
                    outgoing,
                    incoming,
                }
            })
            .collect()
    }
}

/// Exclusive write access to the slots of one node range
#[derive(Debug)]
pub struct MatrixBatch<'a> {
    range: NodeRange,
    outgoing: &'a mut [Vec<u8>],
    incoming: &'a mut [Vec<u8>],
}

impl<'a> MatrixBatch<'a> {
    pub fn range(&self) -> NodeRange {
        self.range
    }

    /// Compress `targets` into the slot of `node`, replacing any earlier
    /// content. `targets` is used as scratch space. Returns the degree.
    pub fn write(
        &mut self,
        node: NodeId,
        direction: Direction,
        targets: &mut Vec<u64>,
        presorted: bool,
    ) -> usize {
        assert!(
            self.range.contains(node),
            "node {} outside of batch {}..{}",
            node,
            self.range.start,
            self.range.end
        );
        let index = (node - self.range.start) as usize;
        let slot = match direction {
            Direction::Outgoing => &mut self.outgoing[index],
            Direction::Incoming => &mut self.incoming[index],
        };
        slot.clear();
        let degree = compress(targets, presorted, slot);
        slot.shrink_to_fit();
        degree
    }
}
