//! Decoding cursor over one node's compressed adjacency block

use crate::graph::compression::{read_degree, CHUNK_SIZE, HEADER_SIZE};
use crate::graph::varlong::decode_delta_vlongs;

/// Result of a forward seek
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seek {
    /// The id the cursor stopped on
    pub id: u64,

    /// One more than the number of ids moved past, including `id` itself
    pub consumed: usize,
}

impl Seek {
    /// The caller's remaining count after this seek
    pub fn remaining_after(&self, remaining_before: usize) -> usize {
        remaining_before + 1 - self.consumed
    }
}

/// Stateful decoder over a node's delta-encoded target ids.
///
/// The cursor borrows the compressed bytes and decodes them lazily, one block
/// of `CHUNK_SIZE` ids at a time. It only ever moves forward. The caller owns
/// the count of ids not yet returned (`remaining`) and passes it in on every
/// call; `reset` must be called before the cursor is used on a node.
#[derive(Debug, Clone)]
pub struct AdjacencyDecompression<'a> {
    /// Decoded absolute ids; the last slot doubles as the delta anchor
    block: [u64; CHUNK_SIZE],
    pos: usize,
    /// Last id handed out since `reset`; seeks may not go below it
    last: Option<u64>,
    array: &'a [u8],
    offset: usize,
}

impl<'a> Default for AdjacencyDecompression<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> AdjacencyDecompression<'a> {
    /// Create an unbound cursor
    pub fn new() -> Self {
        Self {
            block: [0; CHUNK_SIZE],
            pos: CHUNK_SIZE,
            last: None,
            array: &[],
            offset: 0,
        }
    }

    /// Take over the complete state of `other`
    pub fn copy_from(&mut self, other: &AdjacencyDecompression<'a>) {
        self.block.copy_from_slice(&other.block);
        self.pos = other.pos;
        self.last = other.last;
        self.array = other.array;
        self.offset = other.offset;
    }

    /// Bind the cursor to the block at `offset` and return its degree
    pub fn reset(&mut self, array: &'a [u8], offset: usize) -> usize {
        let degree = read_degree(array, offset);
        self.array = array;
        self.offset = offset + HEADER_SIZE;
        self.block[CHUNK_SIZE - 1] = 0;
        self.pos = CHUNK_SIZE;
        self.last = None;
        degree
    }

    /// Return the next id. `remaining` counts the ids not yet returned.
    pub fn next(&mut self, remaining: usize) -> u64 {
        assert!(remaining > 0, "adjacency cursor read past the last target");
        let pos = self.pos;
        let id = if pos < CHUNK_SIZE {
            self.pos += 1;
            self.block[pos]
        } else {
            self.read_block(remaining.min(CHUNK_SIZE));
            self.pos = 1;
            self.block[0]
        };
        self.last = Some(id);
        id
    }

    /// Move to the first id `>= target`.
    ///
    /// Returns `None` when every remaining id is smaller than `target`; the
    /// cursor is exhausted afterwards.
    ///
    /// Panics if `target` is not above the last id already returned.
    pub fn advance(&mut self, target: u64, remaining: usize) -> Option<Seek> {
        if let Some(last) = self.last {
            assert!(
                target > last,
                "backward seek to {} after the cursor returned {}",
                target,
                last
            );
        }
        let mut available = remaining;
        let mut pos = self.pos;

        loop {
            let in_block = (CHUNK_SIZE - pos).min(available);
            if in_block > 0 && self.block[pos + in_block - 1] >= target {
                let limit = pos + in_block;
                let target_pos = find_pos_in_block(&self.block[..limit], pos, target);
                available -= 1 + target_pos - pos;
                let id = self.block[target_pos];
                self.pos = 1 + target_pos;
                self.last = Some(id);
                return Some(Seek {
                    id,
                    consumed: 1 + remaining - available,
                });
            }

            available -= in_block;
            if available == 0 {
                self.pos = CHUNK_SIZE;
                return None;
            }
            self.read_block(available.min(CHUNK_SIZE));
            pos = 0;
        }
    }

    /// Move to the first id `> target`. Same contract as `advance`, so
    /// `target` may not be below the last id returned.
    pub fn skip_until(&mut self, target: u64, remaining: usize) -> Option<Seek> {
        match target.checked_add(1) {
            Some(bound) => self.advance(bound, remaining),
            None => {
                self.pos = CHUNK_SIZE;
                None
            }
        }
    }

    fn read_block(&mut self, count: usize) {
        let anchor = self.block[CHUNK_SIZE - 1];
        self.offset = decode_delta_vlongs(anchor, self.array, self.offset, count, &mut self.block);
        if count > 0 && count < CHUNK_SIZE {
            self.block[CHUNK_SIZE - 1] = self.block[count - 1];
        }
    }
}

/// Binary search `block[pos..]` for `target`, falling back to the insertion
/// point clamped to the last valid slot.
fn find_pos_in_block(block: &[u64], pos: usize, target: u64) -> usize {
    let limit = block.len();
    match block[pos..].binary_search(&target) {
        Ok(found) => pos + found,
        Err(insert) => (pos + insert).min(limit - 1),
    }
}

/// A node's adjacency as an iterator that tracks its own remaining count
#[derive(Debug, Clone)]
pub struct Adjacency<'a> {
    cursor: AdjacencyDecompression<'a>,
    degree: usize,
    remaining: usize,
}

impl<'a> Adjacency<'a> {
    /// Open the block at `offset`
    pub fn new(array: &'a [u8], offset: usize) -> Self {
        let mut cursor = AdjacencyDecompression::new();
        let degree = cursor.reset(array, offset);
        Self {
            cursor,
            degree,
            remaining: degree,
        }
    }

    /// An adjacency without targets
    pub fn empty() -> Self {
        Self {
            cursor: AdjacencyDecompression::new(),
            degree: 0,
            remaining: 0,
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Independent cursor positioned where this one is
    pub fn fork(&self) -> Adjacency<'a> {
        let mut cursor = AdjacencyDecompression::new();
        cursor.copy_from(&self.cursor);
        Adjacency {
            cursor,
            degree: self.degree,
            remaining: self.remaining,
        }
    }

    /// First remaining target `>= target`
    pub fn advance(&mut self, target: u64) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        let seek = self.cursor.advance(target, self.remaining);
        self.settle(seek)
    }

    /// First remaining target `> target`
    pub fn skip_until(&mut self, target: u64) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        let seek = self.cursor.skip_until(target, self.remaining);
        self.settle(seek)
    }

    fn settle(&mut self, seek: Option<Seek>) -> Option<u64> {
        match seek {
            Some(seek) => {
                self.remaining = seek.remaining_after(self.remaining);
                Some(seek.id)
            }
            None => {
                self.remaining = 0;
                None
            }
        }
    }
}

impl<'a> Iterator for Adjacency<'a> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.cursor.next(self.remaining);
        self.remaining -= 1;
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for Adjacency<'a> {}
