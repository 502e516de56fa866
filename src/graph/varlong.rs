//! Variable-length integer codec for delta-encoded adjacency lists
//!
//! Values are written in 7-bit groups, least significant group first. The high
//! bit of every byte is the continuation flag.

/// Append `value` as a variable-length integer
pub fn encode_vlong(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Number of bytes `encode_vlong` would write for `value`
pub fn vlong_size(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Decode a single variable-length integer starting at `offset`.
///
/// Returns the value and the offset of the first byte after it. Panics if the
/// array ends before the final group.
pub fn decode_vlong(array: &[u8], offset: usize) -> (u64, usize) {
    let mut value = 0u64;
    let mut shift = 0u32;
    let mut pos = offset;
    loop {
        let byte = match array.get(pos) {
            Some(&b) => b,
            None => panic!(
                "vlong decode truncated at byte {} (array length {})",
                pos,
                array.len()
            ),
        };
        pos += 1;
        value |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return (value, pos);
        }
        shift += 7;
        assert!(shift < 64, "vlong too long at byte {}", pos);
    }
}

/// Decode `count` delta-encoded values into `out[..count]`.
///
/// Each decoded delta is added onto the running value, which starts at
/// `anchor`, so `out` receives absolute ids. Returns the byte offset after the
/// last decoded value.
pub fn decode_delta_vlongs(
    anchor: u64,
    array: &[u8],
    offset: usize,
    count: usize,
    out: &mut [u64],
) -> usize {
    debug_assert!(count <= out.len(), "cannot decode {} values into {}", count, out.len());

    let mut value = anchor;
    let mut pos = offset;
    for slot in out.iter_mut().take(count) {
        let (delta, next) = decode_vlong(array, pos);
        value += delta;
        *slot = value;
        pos = next;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_take_one_byte() {
        let mut buf = Vec::new();
        encode_vlong(0, &mut buf);
        encode_vlong(127, &mut buf);
        assert_eq!(buf, vec![0x00, 0x7F]);
    }

    #[test]
    fn continuation_bit_splits_groups() {
        let mut buf = Vec::new();
        encode_vlong(300, &mut buf);
        assert_eq!(buf, vec![0xAC, 0x02]);
        assert_eq!(decode_vlong(&buf, 0), (300, 2));
    }

    #[test]
    fn size_matches_encoding() {
        for value in [0u64, 1, 127, 128, 16_383, 16_384, u32::MAX as u64, u64::MAX] {
            let mut buf = Vec::new();
            encode_vlong(value, &mut buf);
            assert_eq!(vlong_size(value), buf.len(), "value {}", value);
            assert_eq!(decode_vlong(&buf, 0), (value, buf.len()));
        }
    }

    #[test]
    fn deltas_accumulate_onto_anchor() {
        let mut buf = Vec::new();
        for delta in [3u64, 1, 200, 0] {
            encode_vlong(delta, &mut buf);
        }
        let mut out = [0u64; 8];
        let end = decode_delta_vlongs(10, &buf, 0, 4, &mut out);
        assert_eq!(&out[..4], &[13, 14, 214, 214]);
        assert_eq!(end, buf.len());
        // untouched beyond count
        assert_eq!(out[4], 0);
    }

    #[test]
    #[should_panic(expected = "vlong decode truncated")]
    fn truncated_input_fails_fast() {
        let buf = vec![0x80];
        decode_vlong(&buf, 0);
    }
}
