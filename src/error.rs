use thiserror::Error;

/// Boxed error carried out of a failing chunk.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("input sequence {index} has length {found}, expected {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("function takes {expected} argument(s) but {found} sequence(s) were supplied")]
    ArityMismatch { expected: usize, found: usize },

    #[error("cannot reduce an empty sequence without a seed")]
    EmptyInput,

    #[error("chunk {chunk} failed: {source}")]
    WorkerExecution {
        chunk: usize,
        #[source]
        source: BoxError,
    },

    #[error("minimum chunk size must be a positive integer")]
    InvalidChunkSize,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
