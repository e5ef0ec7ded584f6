//! Two-byte sequence index over a sparse image.
//!
//! Assigns every address a rank such that two addresses share a rank iff the
//! byte sequences of a fixed length starting there are identical and both lie
//! entirely within their segments (rank 0 is reserved for cells outside any
//! segment).  Ranks are built by prefix doubling; the compressor only needs
//! length-2 sequences, so a single doubling step runs, but the construction
//! accepts any power-of-two length.
//!
//! On top of the ranks, a per-rank singly linked occurrence list is chained
//! through `nextpos`, yielding earlier occurrences of the same sequence in
//! descending address order — the compressor's candidate match positions.

use std::collections::BTreeMap;

use crate::displaylevel;
use crate::image::{Image, Segment, RAM_SIZE};

/// Rank table plus per-rank occurrence lists.
pub struct SeqIndex {
    /// Dense rank per address; 0 for cells outside any segment.
    pub rank: Vec<i64>,
    /// Head position of each rank's occurrence list, -1 when empty.
    pub firstpos: Vec<i32>,
    /// Next (lower) position with the same rank, -1 at the end of a chain.
    pub nextpos: Vec<i32>,
}

/// Renumber arbitrary rank values to dense consecutive integers 0..n-1,
/// preserving their natural order.  Returns n.
fn renumber(rank: &mut [i64]) -> i64 {
    let mut ids: BTreeMap<i64, i64> = BTreeMap::new();
    for &r in rank.iter() {
        ids.insert(r, -1);
    }
    let mut n = 0;
    for id in ids.values_mut() {
        *id = n;
        n += 1;
    }
    for r in rank.iter_mut() {
        *r = ids[r];
    }
    n
}

impl SeqIndex {
    /// Build the index for sequences of length `max_len` (a power of two).
    ///
    /// Initial ranks are the raw cell values, with absence ranking below
    /// every byte so that after renumbering rank 0 covers exactly the cells
    /// outside the segments.  Each doubling step combines the rank at a
    /// position with the rank `k` positions later inside the same segment
    /// (or 0 past the segment end), then renumbers densely.
    pub fn build(image: &Image, segments: &[Segment], max_len: usize) -> SeqIndex {
        let mut rank: Vec<i64> = (0..RAM_SIZE).map(|i| i64::from(image.cell(i))).collect();
        let mut n = renumber(&mut rank);
        let mut k = 1;
        while k < max_len {
            displaylevel!(3, "gt1z: tokenize #{}: {} unique ids\n", k, n);
            for segment in segments {
                for i in 0..segment.len {
                    let a = segment.addr + i;
                    let next = if i + k < segment.len {
                        rank[segment.addr + i + k]
                    } else {
                        0
                    };
                    rank[a] = rank[a] * n + next;
                }
            }
            n = renumber(&mut rank);
            k += k;
        }
        displaylevel!(3, "gt1z: tokenize #{} (final): {} unique ids\n", k, n);

        let mut firstpos = vec![-1i32; n as usize];
        let mut nextpos = vec![-1i32; RAM_SIZE];
        for i in 0..RAM_SIZE {
            let r = rank[i] as usize;
            nextpos[i] = firstpos[r];
            firstpos[r] = i as i32;
        }
        SeqIndex {
            rank,
            firstpos,
            nextpos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with(records: &[(usize, &[u8])]) -> Image {
        let mut image = Image::new();
        for &(addr, bytes) in records {
            for (i, &b) in bytes.iter().enumerate() {
                image.set(addr + i, b);
            }
        }
        image
    }

    fn build(image: &Image) -> SeqIndex {
        SeqIndex::build(image, &image.segments(), 2)
    }

    #[test]
    fn absent_cells_share_rank_zero() {
        let image = image_with(&[(0x0200, &[1, 2, 3])]);
        let index = build(&image);
        assert_eq!(index.rank[0x0000], 0);
        assert_eq!(index.rank[0x8000], 0);
        assert_ne!(index.rank[0x0200], 0);
    }

    #[test]
    fn equal_pairs_share_rank_across_segments() {
        let image = image_with(&[(0x0200, &[9, 7, 5]), (0x0400, &[9, 7, 6])]);
        let index = build(&image);
        // (9,7) at 0x0200 and 0x0400 match; (7,5) and (7,6) do not.
        assert_eq!(index.rank[0x0200], index.rank[0x0400]);
        assert_ne!(index.rank[0x0201], index.rank[0x0401]);
    }

    #[test]
    fn segment_final_byte_ranks_apart_from_interior_pairs() {
        // The pair (5,_) at the end of the first segment must not collide
        // with the interior pair (5,5) in the second.
        let image = image_with(&[(0x0200, &[5]), (0x0400, &[5, 5])]);
        let index = build(&image);
        assert_ne!(index.rank[0x0200], index.rank[0x0400]);
        assert_eq!(index.rank[0x0200], index.rank[0x0401]);
    }

    #[test]
    fn chains_walk_to_earlier_occurrences() {
        let image = image_with(&[(0x0200, &[8, 8, 8, 8])]);
        let index = build(&image);
        // Positions 0x0200..0x0202 all carry the pair (8,8); the chain from
        // any of them descends through the earlier ones.
        let r = index.rank[0x0202] as usize;
        assert_eq!(index.firstpos[r], 0x0202);
        assert_eq!(index.nextpos[0x0202], 0x0201);
        assert_eq!(index.nextpos[0x0201], 0x0200);
        assert_eq!(index.nextpos[0x0200], -1);
    }

    #[test]
    fn renumber_is_dense_and_order_preserving() {
        let mut rank = vec![30, -1, 7, 30, 100];
        let n = renumber(&mut rank);
        assert_eq!(n, 4);
        assert_eq!(rank, vec![2, 0, 1, 2, 3]);
    }
}
