//! The public map/reduce operations.
//!
//! Every operation partitions its input, runs one chunk job per worker, and
//! reassembles the partial results in chunk order: concatenation for map,
//! [`combine_ordered`] for reduce.
//!
//! ```
//! use parmr::{parallel_map, parallel_map_reduce};
//!
//! let data = [1, 2, 3, 4];
//! let squares = parallel_map(|[x]| x * x, [&data[..]], 5).unwrap();
//! assert_eq!(squares, vec![1, 4, 9, 16]);
//!
//! let sum = parallel_map_reduce(
//!     |[x]: [&i32; 1]| x * x,
//!     |acc: i32, x: &i32| acc + x,
//!     |a, b| a + b,
//!     [&data[..]],
//!     Some(0),
//!     5,
//! )
//! .unwrap();
//! assert_eq!(sum, 30);
//! ```

use tracing::debug;

use crate::combine::combine_ordered;
use crate::error::{BoxError, Error, Result};
use crate::executor::{fold_chunk, fold_tasks, map_chunk, map_fold_chunk, map_rows_chunk};
use crate::parallel::ParallelProcessor;
use crate::sequential::{check_arity, common_len};

impl ParallelProcessor {
    /// Parallel counterpart of [`crate::sequential::map`].
    ///
    /// Fails with [`Error::LengthMismatch`] before any work starts if the
    /// sequences differ in length.
    pub fn map<T, R, F, const N: usize>(&self, f: F, sequences: [&[T]; N]) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn([&T; N]) -> R + Sync,
    {
        let total_len = common_len(&sequences)?;
        let chunks = self.plan(total_len);
        debug!(total_len, sequences = N, chunks = chunks.len(), "parallel map");

        let partials = self.execute(chunks, |chunk| Ok(map_chunk(&f, &sequences, chunk)?))?;
        Ok(concat(partials, total_len))
    }

    /// Like [`ParallelProcessor::map`] with a fallible function.
    ///
    /// The first error in the lowest-indexed failing chunk aborts the
    /// operation as [`Error::WorkerExecution`].
    pub fn try_map<T, R, E, F, const N: usize>(&self, f: F, sequences: [&[T]; N]) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        E: Into<BoxError>,
        F: Fn([&T; N]) -> std::result::Result<R, E> + Sync,
    {
        let total_len = common_len(&sequences)?;
        let chunks = self.plan(total_len);
        debug!(total_len, sequences = N, chunks = chunks.len(), "parallel try_map");

        let partials = self.execute(chunks, |chunk| {
            map_chunk(&f, &sequences, chunk)?
                .into_iter()
                .collect::<std::result::Result<Vec<R>, E>>()
                .map_err(Into::into)
        })?;
        Ok(concat(partials, total_len))
    }

    /// Map over a runtime-sized list of sequences.
    ///
    /// `arity` is the number of values `f` expects per row; it must match
    /// `sequences.len()` or the call fails with [`Error::ArityMismatch`].
    pub fn map_rows<T, R, F>(&self, arity: usize, f: F, sequences: &[&[T]]) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&[&T]) -> R + Sync,
    {
        check_arity(arity, sequences.len())?;
        let total_len = common_len(sequences)?;
        let chunks = self.plan(total_len);
        debug!(total_len, arity, chunks = chunks.len(), "parallel map_rows");

        let partials = self.execute(chunks, |chunk| {
            Ok(map_rows_chunk(arity, &f, sequences, chunk)?)
        })?;
        Ok(concat(partials, total_len))
    }

    /// Parallel counterpart of [`crate::sequential::reduce`].
    ///
    /// Each chunk is folded on its own: the first chunk from `seed` (or its
    /// first element when there is none), every later chunk from its first
    /// element. The chunk results are then merged left to right with
    /// `combine`. An empty `sequence` returns `seed` without spawning any
    /// worker, or [`Error::EmptyInput`] when there is no seed.
    pub fn reduce<T, C, F, G>(&self, fold: F, combine: G, sequence: &[T], seed: Option<C>) -> Result<C>
    where
        T: Sync + Clone + Into<C>,
        C: Send,
        F: Fn(C, &T) -> C + Sync,
        G: Fn(C, C) -> C,
    {
        if sequence.is_empty() {
            return seed.ok_or(Error::EmptyInput);
        }

        let chunks = self.plan(sequence.len());
        debug!(total_len = sequence.len(), chunks = chunks.len(), seeded = seed.is_some(), "parallel reduce");

        let partials = self.execute(fold_tasks(chunks, seed), |task| {
            Ok(fold_chunk(&fold, sequence, task)?)
        })?;
        combine_ordered(partials, combine).ok_or(Error::EmptyInput)
    }

    /// `reduce(fold, combine, map(map_fn, sequences), seed)` with the map
    /// and the fold fused inside each chunk job.
    ///
    /// Chunk boundaries are the ones the unfused composition would use, so
    /// the result is the same.
    pub fn map_reduce<T, M, C, F, G, H, const N: usize>(
        &self,
        map: F,
        fold: G,
        combine: H,
        sequences: [&[T]; N],
        seed: Option<C>,
    ) -> Result<C>
    where
        T: Sync,
        M: Into<C>,
        C: Send,
        F: Fn([&T; N]) -> M + Sync,
        G: Fn(C, &M) -> C + Sync,
        H: Fn(C, C) -> C,
    {
        let total_len = common_len(&sequences)?;
        if total_len == 0 {
            return seed.ok_or(Error::EmptyInput);
        }

        let chunks = self.plan(total_len);
        debug!(total_len, sequences = N, chunks = chunks.len(), seeded = seed.is_some(), "parallel map_reduce");

        let partials = self.execute(fold_tasks(chunks, seed), |task| {
            Ok(map_fold_chunk(&map, &fold, &sequences, task)?)
        })?;
        combine_ordered(partials, combine).ok_or(Error::EmptyInput)
    }
}

fn concat<R>(partials: Vec<Vec<R>>, total_len: usize) -> Vec<R> {
    let mut out = Vec::with_capacity(total_len);
    for partial in partials {
        out.extend(partial);
    }
    out
}

fn processor(min_chunk_size: usize) -> Result<ParallelProcessor> {
    ParallelProcessor::default().with_min_chunk_size(min_chunk_size)
}

/// Applies `f` to each positional tuple of `sequences` across all CPUs.
///
/// See [`ParallelProcessor::map`].
pub fn parallel_map<T, R, F, const N: usize>(
    f: F,
    sequences: [&[T]; N],
    min_chunk_size: usize,
) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn([&T; N]) -> R + Sync,
{
    processor(min_chunk_size)?.map(f, sequences)
}

/// See [`ParallelProcessor::map_rows`].
pub fn parallel_map_rows<T, R, F>(
    arity: usize,
    f: F,
    sequences: &[&[T]],
    min_chunk_size: usize,
) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&[&T]) -> R + Sync,
{
    processor(min_chunk_size)?.map_rows(arity, f, sequences)
}

/// See [`ParallelProcessor::try_map`].
pub fn try_parallel_map<T, R, E, F, const N: usize>(
    f: F,
    sequences: [&[T]; N],
    min_chunk_size: usize,
) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    E: Into<BoxError>,
    F: Fn([&T; N]) -> std::result::Result<R, E> + Sync,
{
    processor(min_chunk_size)?.try_map(f, sequences)
}

/// Folds `sequence` in parallel chunks and merges the chunk results with `combine`.
///
/// See [`ParallelProcessor::reduce`].
pub fn parallel_reduce<T, C, F, G>(
    fold: F,
    combine: G,
    sequence: &[T],
    seed: Option<C>,
    min_chunk_size: usize,
) -> Result<C>
where
    T: Sync + Clone + Into<C>,
    C: Send,
    F: Fn(C, &T) -> C + Sync,
    G: Fn(C, C) -> C,
{
    processor(min_chunk_size)?.reduce(fold, combine, sequence, seed)
}

/// See [`ParallelProcessor::map_reduce`].
pub fn parallel_map_reduce<T, M, C, F, G, H, const N: usize>(
    map: F,
    fold: G,
    combine: H,
    sequences: [&[T]; N],
    seed: Option<C>,
    min_chunk_size: usize,
) -> Result<C>
where
    T: Sync,
    M: Into<C>,
    C: Send,
    F: Fn([&T; N]) -> M + Sync,
    G: Fn(C, &M) -> C + Sync,
    H: Fn(C, C) -> C,
{
    processor(min_chunk_size)?.map_reduce(map, fold, combine, sequences, seed)
}
