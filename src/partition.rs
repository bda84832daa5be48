use std::ops::Range;

use rayon::iter::plumbing::{Consumer, Producer, ProducerCallback, UnindexedConsumer, bridge};
use rayon::prelude::*;

/// Iterator returned by [`partitions`].
///
/// Yields exactly `num_partitions` sub-ranges of the original range, in
/// ascending order of their bounds. Empty sub-ranges are yielded like any
/// other, so the count is always exact.
#[derive(Clone)]
pub struct Partitions {
    low: i64,
    high: i64,
    chunk: i64,

    /// Index of the next partition yielded from the front.
    front: usize,
    /// One past the index of the next partition yielded from the back.
    back: usize,
    /// Total partition count of the original split. Needed to recognize the
    /// last partition, whose upper bound is pinned to `high`.
    count: usize,
}

impl Partitions {
    /// Return the bounds of partition `index`.
    ///
    /// The last partition's upper bound is always the original range end, so
    /// any remainder from the truncating chunk-size division lands there.
    fn bounds(&self, index: usize) -> Range<i64> {
        let start = self.low + index as i64 * self.chunk;
        let end = if index + 1 == self.count {
            self.high
        } else {
            start + self.chunk
        };
        start..end
    }

    /// Split the iterator in two at a given partition index.
    ///
    /// The left result yields the first `index` remaining partitions and the
    /// right result yields the rest.
    pub fn split_at(self, index: usize) -> (Self, Self) {
        let len = self.len();
        assert!(
            index <= len,
            "split index {} out of bounds for iterator of length {}",
            index,
            len
        );

        let mid = self.front + index;
        let left = Partitions {
            back: mid,
            ..self.clone()
        };
        let right = Partitions { front: mid, ..self };
        (left, right)
    }
}

impl Iterator for Partitions {
    type Item = Range<i64>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            let index = self.front;
            self.front += 1;
            Some(self.bounds(index))
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Partitions {}

impl DoubleEndedIterator for Partitions {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            self.back -= 1;
            Some(self.bounds(self.back))
        } else {
            None
        }
    }
}

impl std::iter::FusedIterator for Partitions {}

/// Divide `range` into exactly `num_partitions` contiguous sub-ranges.
///
/// The chunk size is `range.len() / num_partitions` using truncating integer
/// division. The final partition's upper bound is always `range.end`, so when
/// the length is not evenly divisible, all of the remainder goes to the last
/// partition rather than being spread across partitions.
///
/// Degenerate ranges (`end <= start`) are legal and produce empty partitions.
///
/// Panics if `num_partitions` is zero.
#[inline]
pub fn partitions(range: Range<i64>, num_partitions: usize) -> Partitions {
    assert!(num_partitions > 0, "partition count must be non-zero");
    Partitions {
        low: range.start,
        high: range.end,
        chunk: (range.end - range.start) / num_partitions as i64,
        front: 0,
        back: num_partitions,
        count: num_partitions,
    }
}

/// Parallel iterator over [`Partitions`], for use with Rayon.
pub struct ParPartitions(Partitions);

impl IntoParallelIterator for Partitions {
    type Iter = ParPartitions;
    type Item = Range<i64>;

    fn into_par_iter(self) -> ParPartitions {
        ParPartitions(self)
    }
}

impl ParallelIterator for ParPartitions {
    type Item = Range<i64>;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        bridge(self, consumer)
    }

    fn opt_len(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

impl IndexedParallelIterator for ParPartitions {
    fn drive<C>(self, consumer: C) -> C::Result
    where
        C: Consumer<Self::Item>,
    {
        bridge(self, consumer)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn with_producer<CB>(self, callback: CB) -> CB::Output
    where
        CB: ProducerCallback<Self::Item>,
    {
        callback.callback(self)
    }
}

impl Producer for ParPartitions {
    type Item = Range<i64>;
    type IntoIter = Partitions;

    fn into_iter(self) -> Partitions {
        self.0
    }

    fn split_at(self, index: usize) -> (Self, Self) {
        let (left, right) = self.0.split_at(index);
        (Self(left), Self(right))
    }
}

#[cfg(test)]
mod tests {
    use rayon::prelude::*;

    use super::partitions;

    #[test]
    fn test_partitions_even() {
        let mut parts = partitions(0..15, 3);
        assert_eq!(parts.size_hint(), (3, Some(3)));
        assert_eq!(parts.next(), Some(0..5));
        assert_eq!(parts.next(), Some(5..10));
        assert_eq!(parts.next(), Some(10..15));
        assert_eq!(parts.next(), None);
        assert_eq!(parts.next(), None);
    }

    #[test]
    fn test_partitions_remainder_in_last() {
        // chunk = 10 / 3 = 3; the last partition absorbs the remainder.
        let parts: Vec<_> = partitions(0..10, 3).collect();
        assert_eq!(parts, [0..3, 3..6, 6..10]);
    }

    #[test]
    fn test_partitions_more_workers_than_items() {
        // chunk = 3 / 8 = 0; all work lands in the last partition.
        let parts: Vec<_> = partitions(0..3, 8).collect();
        assert_eq!(parts.len(), 8);
        for part in &parts[..7] {
            assert!(part.is_empty());
        }
        assert_eq!(parts[7], 0..3);
    }

    #[test]
    fn test_partitions_empty_range() {
        let parts: Vec<_> = partitions(5..5, 4).collect();
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().all(|p| p.is_empty()));
        assert_eq!(parts.last().unwrap().end, 5);
    }

    #[test]
    fn test_partitions_negative_bounds() {
        let parts: Vec<_> = partitions(-6..6, 4).collect();
        assert_eq!(parts, [-6..-3, -3..0, 0..3, 3..6]);
    }

    #[test]
    fn test_partitions_single() {
        let parts: Vec<_> = partitions(2..9, 1).collect();
        assert_eq!(parts, [2..9]);
    }

    #[test]
    fn test_partitions_rev() {
        let mut parts = partitions(0..10, 3).rev();
        assert_eq!(parts.next(), Some(6..10));
        assert_eq!(parts.next(), Some(3..6));
        assert_eq!(parts.next(), Some(0..3));
        assert_eq!(parts.next(), None);
    }

    #[test]
    fn test_partitions_exact_cover() {
        // Partitions are contiguous, disjoint, in ascending order and their
        // union is the original range, for every small (len, count) combo.
        for len in 0..20i64 {
            for count in 1..8usize {
                let parts: Vec<_> = partitions(0..len, count).collect();
                assert_eq!(parts.len(), count);

                let mut expected_start = 0;
                for part in &parts {
                    assert_eq!(part.start, expected_start);
                    assert!(part.end >= part.start);
                    expected_start = part.end;
                }
                assert_eq!(parts.last().unwrap().end, len);
            }
        }
    }

    #[test]
    fn test_partitions_split_at() {
        let (left, right) = partitions(0..10, 5).split_at(2);
        assert_eq!(left.collect::<Vec<_>>(), [0..2, 2..4]);
        assert_eq!(right.collect::<Vec<_>>(), [4..6, 6..8, 8..10]);

        // Remainder handling is unaffected by where the split lands.
        let (_, right) = partitions(0..11, 5).split_at(4);
        assert_eq!(right.collect::<Vec<_>>(), [8..11]);
    }

    #[test]
    #[should_panic(expected = "split index")]
    fn test_partitions_split_at_invalid() {
        partitions(0..10, 2).split_at(3);
    }

    #[test]
    fn test_partitions_par_iter() {
        let total: i64 = partitions(0..1000, 7)
            .into_par_iter()
            .map(|part| part.end - part.start)
            .sum();
        assert_eq!(total, 1000);
    }

    #[test]
    #[should_panic(expected = "partition count")]
    fn test_partitions_zero_count() {
        partitions(0..10, 0);
    }
}
