//! Splitting an input range into contiguous chunks, one per worker.
//!
//! Chunk `i` of `k` covers `[floor(N*i/k), floor(N*(i+1)/k))`. Chunks are
//! ordered, non-overlapping, cover `0..N` exactly, and their sizes differ by
//! at most one.

use std::ops::Range;

/// Half-open index range `[begin, end)` into the zipped inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub begin: usize,
    pub end: usize,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.begin..self.end
    }
}

/// Number of workers for `total_len` items.
///
/// Zero for empty input, otherwise `max(1, min(max_parallelism, total_len / min_chunk_size))`.
/// `min_chunk_size` and `max_parallelism` are treated as at least one.
#[must_use]
pub fn worker_count(total_len: usize, min_chunk_size: usize, max_parallelism: usize) -> usize {
    if total_len == 0 {
        return 0;
    }

    let by_data = total_len / min_chunk_size.max(1);
    by_data.min(max_parallelism.max(1)).max(1)
}

/// Computes the chunk boundaries for `total_len` items.
#[must_use]
pub fn partition(total_len: usize, min_chunk_size: usize, max_parallelism: usize) -> Vec<Chunk> {
    let count = worker_count(total_len, min_chunk_size, max_parallelism);
    split_even(total_len, count)
}

/// Splits `0..total_len` into `count` chunks using integer arithmetic for rounding.
pub(crate) fn split_even(total_len: usize, count: usize) -> Vec<Chunk> {
    // u128 keeps total_len * index from overflowing
    let boundary = |index: usize| -> usize {
        ((total_len as u128 * index as u128) / count as u128) as usize
    };

    (0..count)
        .map(|index| Chunk {
            index,
            begin: boundary(index),
            end: boundary(index + 1),
        })
        .collect()
}
