//! Compressed adjacency layout
//!
//! One node's adjacency block is a 4-byte little-endian degree header followed
//! by its target ids as ascending deltas, each written as a variable-length
//! integer. The decoder reads the deltas back `CHUNK_SIZE` ids at a time.

use crate::graph::varlong::{encode_vlong, vlong_size};

/// Number of ids the decoder materializes per block
pub const CHUNK_SIZE: usize = 64;

/// Size of the degree header in bytes
pub const HEADER_SIZE: usize = 4;

/// Sort (unless `presorted`) and deduplicate `targets` in place, then rewrite
/// them as deltas from their predecessor. Returns the number of distinct ids.
pub fn apply_delta_encoding(targets: &mut Vec<u64>, presorted: bool) -> usize {
    if !presorted {
        targets.sort_unstable();
    }
    debug_assert!(
        targets.windows(2).all(|w| w[0] <= w[1]),
        "presorted targets are not in ascending order"
    );
    targets.dedup();

    let mut previous = 0u64;
    for value in targets.iter_mut() {
        let current = *value;
        *value = current - previous;
        previous = current;
    }
    targets.len()
}

/// Append the compressed block for `targets` to `out` and return its degree.
///
/// `targets` is consumed as scratch space: on return it holds the deltas.
pub fn compress(targets: &mut Vec<u64>, presorted: bool, out: &mut Vec<u8>) -> usize {
    let degree = apply_delta_encoding(targets, presorted);
    let body: usize = targets.iter().map(|&delta| vlong_size(delta)).sum();
    out.reserve(HEADER_SIZE + body);

    out.extend_from_slice(&degree_header(degree));
    for &delta in targets.iter() {
        encode_vlong(delta, out);
    }
    degree
}

fn degree_header(degree: usize) -> [u8; HEADER_SIZE] {
    let degree = u32::try_from(degree)
        .unwrap_or_else(|_| panic!("degree {} does not fit the adjacency header", degree));
    degree.to_le_bytes()
}

/// Read the degree header of the block starting at `offset`
pub fn read_degree(array: &[u8], offset: usize) -> usize {
    let header = array
        .get(offset..offset + HEADER_SIZE)
        .unwrap_or_else(|| {
            panic!(
                "adjacency header at {} exceeds array of {} bytes",
                offset,
                array.len()
            )
        });
    u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize
}
