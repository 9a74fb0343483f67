/// Folds per-chunk results left to right, starting from the first chunk's result.
///
/// Returns `None` only for an empty list. The grouping is
/// `combine(combine(r0, r1), r2)...`, so a combine function that is not
/// associative gives results that depend on the number of chunks.
pub fn combine_ordered<C, F>(partials: Vec<C>, combine: F) -> Option<C>
where
    F: Fn(C, C) -> C,
{
    partials.into_iter().reduce(combine)
}
