//! Single-threaded `map`/`reduce`.
//!
//! These define the results the parallel entry points must reproduce, and
//! the chunk executor runs them on each chunk's slice.

use crate::error::{Error, Result};

/// Applies `f` to every positional tuple of `sequences`, eagerly.
///
/// All sequences must have the same length.
pub fn map<T, R, F, const N: usize>(f: F, sequences: [&[T]; N]) -> Result<Vec<R>>
where
    F: Fn([&T; N]) -> R,
{
    let len = common_len(&sequences)?;

    Ok((0..len)
        .map(|j| f(std::array::from_fn(|s| &sequences[s][j])))
        .collect())
}

/// Like [`map`], for a number of sequences only known at runtime.
///
/// `arity` is the number of arguments `f` expects in each row.
pub fn map_rows<T, R, F>(arity: usize, f: F, sequences: &[&[T]]) -> Result<Vec<R>>
where
    F: Fn(&[&T]) -> R,
{
    check_arity(arity, sequences.len())?;
    let len = common_len(sequences)?;

    let mut row = Vec::with_capacity(arity);
    Ok((0..len)
        .map(|j| {
            row.clear();
            row.extend(sequences.iter().map(|s| &s[j]));
            f(row.as_slice())
        })
        .collect())
}

/// Left fold of `sequence` with `fold`.
///
/// Without a seed the first element starts the fold; an empty unseeded
/// sequence fails with [`Error::EmptyInput`].
pub fn reduce<T, C, F>(fold: F, sequence: &[T], seed: Option<C>) -> Result<C>
where
    T: Clone + Into<C>,
    F: Fn(C, &T) -> C,
{
    let mut items = sequence.iter();
    let initial = match seed {
        Some(seed) => seed,
        None => items.next().ok_or(Error::EmptyInput)?.clone().into(),
    };

    Ok(items.fold(initial, fold))
}

/// Length shared by all `sequences`, zero when there are none.
pub(crate) fn common_len<T>(sequences: &[&[T]]) -> Result<usize> {
    let Some(first) = sequences.first() else {
        return Ok(0);
    };

    let expected = first.len();
    match sequences.iter().position(|s| s.len() != expected) {
        Some(index) => Err(Error::LengthMismatch {
            index,
            expected,
            found: sequences[index].len(),
        }),
        None => Ok(expected),
    }
}

pub(crate) fn check_arity(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(Error::ArityMismatch { expected, found });
    }
    Ok(())
}
