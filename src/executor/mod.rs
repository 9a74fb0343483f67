//! Per-chunk work: element-wise map or left fold over one chunk's slice.
//!
//! Each function only reads its own slice of the input and returns an owned
//! result, so chunks never observe each other.

use crate::error::{Error, Result};
use crate::partition::Chunk;
use crate::sequential;

/// Descriptor of a fold job: the chunk plus the seed it starts from, if any.
#[derive(Debug)]
pub(crate) struct FoldTask<C> {
    pub chunk: Chunk,
    pub seed: Option<C>,
}

/// Pairs every chunk with its seed. Only the first chunk receives the
/// caller's seed; the others start from their own first element.
pub(crate) fn fold_tasks<C>(chunks: Vec<Chunk>, seed: Option<C>) -> Vec<FoldTask<C>> {
    let mut seed = seed;
    chunks
        .into_iter()
        .map(|chunk| FoldTask {
            chunk,
            seed: seed.take(),
        })
        .collect()
}

pub(crate) fn map_chunk<T, R, F, const N: usize>(
    f: &F,
    sequences: &[&[T]; N],
    chunk: Chunk,
) -> Result<Vec<R>>
where
    F: Fn([&T; N]) -> R,
{
    sequential::map(f, sequences.map(|s| &s[chunk.range()]))
}

pub(crate) fn map_rows_chunk<T, R, F>(
    arity: usize,
    f: &F,
    sequences: &[&[T]],
    chunk: Chunk,
) -> Result<Vec<R>>
where
    F: Fn(&[&T]) -> R,
{
    let slices: Vec<&[T]> = sequences.iter().map(|s| &s[chunk.range()]).collect();
    sequential::map_rows(arity, f, &slices)
}

pub(crate) fn fold_chunk<T, C, F>(fold: &F, sequence: &[T], task: FoldTask<C>) -> Result<C>
where
    T: Clone + Into<C>,
    F: Fn(C, &T) -> C,
{
    sequential::reduce(fold, &sequence[task.chunk.range()], task.seed)
}

/// Maps and folds one chunk without materializing the mapped values.
pub(crate) fn map_fold_chunk<T, M, C, F, G, const N: usize>(
    map: &F,
    fold: &G,
    sequences: &[&[T]; N],
    task: FoldTask<C>,
) -> Result<C>
where
    M: Into<C>,
    F: Fn([&T; N]) -> M,
    G: Fn(C, &M) -> C,
{
    let mut mapped = task
        .chunk
        .range()
        .map(|j| map(std::array::from_fn(|s| &sequences[s][j])));

    let initial = match task.seed {
        Some(seed) => seed,
        None => mapped.next().ok_or(Error::EmptyInput)?.into(),
    };

    Ok(mapped.fold(initial, |acc, value| fold(acc, &value)))
}
