//! Parallel map/reduce over contiguous chunks of in-memory sequences.
//!
//! Inputs are split into at most one chunk per available CPU (and no more
//! chunks than `len / min_chunk_size`), each chunk is mapped or folded on
//! its own worker thread, and the partial results are put back together in
//! chunk order. Results are identical to [`sequential::map`] and
//! [`sequential::reduce`] whenever the combine function is associative.

pub mod combine;
pub mod engine;
pub mod error;
pub(crate) mod executor;
pub mod numeric;
pub mod parallel;
pub mod partition;
pub mod sequential;

pub use engine::{
    parallel_map, parallel_map_reduce, parallel_map_rows, parallel_reduce, try_parallel_map,
};
pub use error::{BoxError, Error, Result};
pub use parallel::{ParallelProcessor, DEFAULT_MIN_CHUNK_SIZE};
pub use partition::Chunk;
