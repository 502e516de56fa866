use adjacency_loader::graph::compression::compress;
use adjacency_loader::graph::{Adjacency, AdjacencyDecompression, CHUNK_SIZE};
use proptest::prelude::*;

fn encode(ids: &[u64]) -> Vec<u8> {
    let mut out = Vec::new();
    compress(&mut ids.to_vec(), true, &mut out);
    out
}

fn ascending_ids(max_len: usize) -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::btree_set(0u64..1_000_000, 0..max_len)
        .prop_map(|ids| ids.into_iter().collect())
}

#[test]
fn chunk_boundaries_round_trip() {
    for count in [1, CHUNK_SIZE, CHUNK_SIZE + 1, 200] {
        let ids: Vec<u64> = (0..count as u64).map(|i| i * i + 7).collect();
        let bytes = encode(&ids);
        assert_eq!(Adjacency::new(&bytes, 0).collect::<Vec<_>>(), ids);
    }
}

#[test]
fn large_gaps_round_trip() {
    let ids = vec![0, 1, 1 << 20, 1 << 40, u64::MAX / 2, u64::MAX];
    let bytes = encode(&ids);
    assert_eq!(Adjacency::new(&bytes, 0).collect::<Vec<_>>(), ids);
}

#[test]
fn seeks_over_three_hundred_ids() {
    let ids: Vec<u64> = (0..300).map(|i| 10 + i * 5).collect();
    let bytes = encode(&ids);

    // block 0, block 3, beyond the end
    for (target, expected) in [(12, Some(15)), (10 + 200 * 5, Some(1010)), (5_000, None)] {
        assert_eq!(Adjacency::new(&bytes, 0).advance(target), expected, "advance {}", target);
    }
    assert_eq!(Adjacency::new(&bytes, 0).skip_until(1010), Some(1015));
    assert_eq!(Adjacency::new(&bytes, 0).skip_until(ids[299]), None);
}

proptest! {
    #[test]
    fn round_trip(ids in ascending_ids(400)) {
        let bytes = encode(&ids);
        let adjacency = Adjacency::new(&bytes, 0);
        prop_assert_eq!(adjacency.degree(), ids.len());
        prop_assert_eq!(adjacency.collect::<Vec<_>>(), ids);
    }

    #[test]
    fn advance_matches_linear_scan(ids in ascending_ids(400), target in 0u64..1_100_000) {
        let bytes = encode(&ids);
        let mut cursor = AdjacencyDecompression::new();
        let degree = cursor.reset(&bytes, 0);

        let expected = ids.iter().position(|&id| id >= target);
        match (cursor.advance(target, degree), expected) {
            (Some(seek), Some(index)) => {
                prop_assert_eq!(seek.id, ids[index]);
                // the rest of the list is still there
                let mut remaining = seek.remaining_after(degree);
                prop_assert_eq!(remaining, ids.len() - index - 1);
                let mut rest = Vec::new();
                while remaining > 0 {
                    rest.push(cursor.next(remaining));
                    remaining -= 1;
                }
                prop_assert_eq!(&rest[..], &ids[index + 1..]);
            }
            (None, None) => {}
            (actual, expected) => prop_assert!(false, "advance {:?} vs scan {:?}", actual, expected),
        }
    }

    #[test]
    fn skip_until_matches_linear_scan(ids in ascending_ids(400), target in 0u64..1_100_000) {
        let bytes = encode(&ids);
        let expected = ids.iter().position(|&id| id > target);
        prop_assert_eq!(
            Adjacency::new(&bytes, 0).skip_until(target),
            expected.map(|index| ids[index])
        );

        let mut cursor = AdjacencyDecompression::new();
        let degree = cursor.reset(&bytes, 0);
        match (cursor.skip_until(target, degree), expected) {
            (Some(seek), Some(index)) => {
                prop_assert_eq!(seek.id, ids[index]);
                prop_assert_eq!(seek.consumed, index + 1);
                let mut remaining = seek.remaining_after(degree);
                prop_assert_eq!(remaining, ids.len() - index - 1);
                let mut rest = Vec::new();
                while remaining > 0 {
                    rest.push(cursor.next(remaining));
                    remaining -= 1;
                }
                prop_assert_eq!(&rest[..], &ids[index + 1..]);
            }
            (None, None) => {}
            (actual, expected) => prop_assert!(false, "skip_until {:?} vs scan {:?}", actual, expected),
        }
    }

    #[test]
    fn chained_seeks_stay_in_sync(ids in ascending_ids(400), mut targets in proptest::collection::vec(0u64..1_000_000, 1..8)) {
        targets.sort_unstable();
        let bytes = encode(&ids);
        let mut adjacency = Adjacency::new(&bytes, 0);
        let mut last = None;

        for target in targets {
            // forward only: never ask for less than what was already passed
            let bound = last.map_or(target, |l: u64| target.max(l + 1));
            let expected = ids.iter().copied().find(|&id| id >= bound);
            prop_assert_eq!(adjacency.advance(bound), expected);
            let left = ids.iter().filter(|&&id| id > expected.unwrap_or(u64::MAX)).count();
            prop_assert_eq!(adjacency.remaining(), if expected.is_some() { left } else { 0 });
            match expected {
                Some(found) => last = Some(found),
                None => break,
            }
        }
    }

    #[test]
    fn forks_are_independent(ids in ascending_ids(300), split in any::<prop::sample::Index>()) {
        prop_assume!(!ids.is_empty());
        let split = split.index(ids.len());
        let bytes = encode(&ids);
        let mut original = Adjacency::new(&bytes, 0);
        for _ in 0..split {
            original.next();
        }

        let mut fork = original.fork();
        let tail: Vec<u64> = fork.by_ref().collect();
        prop_assert_eq!(&tail[..], &ids[split..]);
        prop_assert_eq!(original.collect::<Vec<_>>(), tail);
    }
}
