//! Sorted adjacency intersection

use crate::graph::decompression::Adjacency;

/// Count the targets two adjacencies have in common.
///
/// Both lists are walked forward in tandem; whichever side is behind seeks to
/// the other side's current id instead of decoding one id at a time.
pub fn intersection_count(mut left: Adjacency<'_>, mut right: Adjacency<'_>) -> usize {
    match (left.next(), right.next()) {
        (Some(a), Some(b)) => count_from(a, b, left, right),
        _ => 0,
    }
}

/// Count common targets strictly greater than `lower`
pub fn intersection_count_above(
    mut left: Adjacency<'_>,
    mut right: Adjacency<'_>,
    lower: u64,
) -> usize {
    match (left.skip_until(lower), right.skip_until(lower)) {
        (Some(a), Some(b)) => count_from(a, b, left, right),
        _ => 0,
    }
}

fn count_from(mut a: u64, mut b: u64, mut left: Adjacency<'_>, mut right: Adjacency<'_>) -> usize {
    let mut common = 0;
    loop {
        let step = if a == b {
            common += 1;
            left.next().zip(right.next())
        } else if a < b {
            left.advance(b).map(|next| (next, b))
        } else {
            right.advance(a).map(|next| (a, next))
        };
        match step {
            Some((next_a, next_b)) => {
                a = next_a;
                b = next_b;
            }
            None => return common,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::compression::compress;

    fn encoded(ids: &[u64]) -> Vec<u8> {
        let mut out = Vec::new();
        compress(&mut ids.to_vec(), false, &mut out);
        out
    }

    #[test]
    fn counts_shared_targets() {
        let left = encoded(&(0..300).map(|i| i * 2).collect::<Vec<_>>());
        let right = encoded(&(0..200).map(|i| i * 3).collect::<Vec<_>>());
        // multiples of 6 up to 594
        assert_eq!(
            intersection_count(Adjacency::new(&left, 0), Adjacency::new(&right, 0)),
            100
        );
    }

    #[test]
    fn disjoint_or_empty_lists_share_nothing() {
        let odd = encoded(&[1, 3, 5, 7]);
        let even = encoded(&[0, 2, 4, 6, 8]);
        assert_eq!(intersection_count(Adjacency::new(&odd, 0), Adjacency::new(&even, 0)), 0);
        assert_eq!(intersection_count(Adjacency::new(&odd, 0), Adjacency::empty()), 0);
    }

    #[test]
    fn lower_bound_is_exclusive() {
        let left = encoded(&[1, 2, 3, 4, 5]);
        let right = encoded(&[2, 3, 5, 9]);
        assert_eq!(
            intersection_count_above(Adjacency::new(&left, 0), Adjacency::new(&right, 0), 2),
            2
        );
    }
}
