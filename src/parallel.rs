use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, trace, warn};

use crate::error::{BoxError, Error, Result};
use crate::partition::{self, Chunk};

/// Smallest number of items handed to one worker unless configured otherwise.
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 5;

/// Sizes and runs the worker pool for one map/reduce invocation.
#[derive(Debug, Clone, Copy)]
pub struct ParallelProcessor {
    num_workers: usize,
    min_chunk_size: usize,
}

impl ParallelProcessor {
    /// `num_workers` caps the workers per call; `None` uses every logical CPU.
    pub fn new(num_workers: Option<usize>) -> Self {
        let num_workers = num_workers.unwrap_or_else(num_cpus::get).max(1);

        Self {
            num_workers,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
        }
    }

    pub fn with_min_chunk_size(mut self, min_chunk_size: usize) -> Result<Self> {
        if min_chunk_size == 0 {
            return Err(Error::InvalidChunkSize);
        }
        self.min_chunk_size = min_chunk_size;
        Ok(self)
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub fn min_chunk_size(&self) -> usize {
        self.min_chunk_size
    }

    /// Chunks for `total_len` items under this processor's limits.
    pub fn plan(&self, total_len: usize) -> Vec<Chunk> {
        partition::partition(total_len, self.min_chunk_size, self.num_workers)
    }

    /// Runs `task` once per job and returns the results in job order.
    ///
    /// Job `i` belongs to chunk `i`. One worker is spawned per job. Blocks
    /// until every job has finished; the failure of the lowest-indexed
    /// failing chunk is returned, whatever order the workers finished in.
    pub(crate) fn execute<J, R, F>(&self, jobs: Vec<J>, task: F) -> Result<Vec<R>>
    where
        J: Send,
        R: Send,
        F: Fn(J) -> std::result::Result<R, BoxError> + Sync,
    {
        let workers = jobs.len();
        debug!(workers, "dispatching chunk jobs");

        let results: Vec<Result<R>> = match workers {
            0 => Vec::new(),
            1 => jobs
                .into_iter()
                .map(|job| run_isolated(0, job, &task))
                .collect(),
            _ => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|index| format!("parmr-worker-{index}"))
                    .build()?;

                // indexed collect puts each result in its chunk's slot
                pool.install(|| {
                    jobs.into_par_iter()
                        .enumerate()
                        .map(|(chunk, job)| run_isolated(chunk, job, &task))
                        .collect()
                })
            }
        };

        results.into_iter().collect()
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(None)
    }
}

fn run_isolated<J, R, F>(chunk: usize, job: J, task: &F) -> Result<R>
where
    F: Fn(J) -> std::result::Result<R, BoxError>,
{
    trace!(chunk, "chunk started");

    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| task(job))) {
        Ok(outcome) => outcome,
        Err(payload) => Err(panic_message(payload.as_ref()).into()),
    };

    outcome.map_err(|source| {
        warn!(chunk, error = %source, "chunk failed");
        Error::WorkerExecution { chunk, source }
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    format!("worker panicked: {detail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let processor = ParallelProcessor::new(Some(3));
        assert_eq!(processor.num_workers(), 3);
        assert_eq!(processor.min_chunk_size(), DEFAULT_MIN_CHUNK_SIZE);

        assert_eq!(ParallelProcessor::new(Some(0)).num_workers(), 1);
        assert!(ParallelProcessor::new(None).num_workers() >= 1);
    }

    #[test]
    fn test_zero_min_chunk_size_rejected() {
        let result = ParallelProcessor::new(None).with_min_chunk_size(0);
        assert!(matches!(result, Err(Error::InvalidChunkSize)));
    }

    #[test]
    fn test_execute_preserves_job_order() {
        let processor = ParallelProcessor::new(Some(4));
        let jobs: Vec<u64> = vec![40, 30, 20, 10];

        // later jobs finish first
        let results = processor
            .execute(jobs, |millis| {
                std::thread::sleep(std::time::Duration::from_millis(millis));
                Ok(millis)
            })
            .unwrap();

        assert_eq!(results, vec![40, 30, 20, 10]);
    }

    #[test]
    fn test_execute_reports_lowest_failing_chunk() {
        let processor = ParallelProcessor::new(Some(4));
        let jobs: Vec<usize> = (0..4).collect();

        let err = processor
            .execute(jobs, |job| {
                if job >= 2 {
                    Err(format!("job {job} failed").into())
                } else {
                    Ok(job)
                }
            })
            .unwrap_err();

        match err {
            Error::WorkerExecution { chunk, source } => {
                assert_eq!(chunk, 2);
                assert_eq!(source.to_string(), "job 2 failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_execute_converts_panics() {
        let processor = ParallelProcessor::new(Some(2));

        let err = processor
            .execute(vec![0, 1], |job: i32| -> std::result::Result<i32, BoxError> {
                if job == 1 {
                    panic!("boom");
                }
                Ok(job)
            })
            .unwrap_err();

        match err {
            Error::WorkerExecution { chunk, source } => {
                assert_eq!(chunk, 1);
                assert!(source.to_string().contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_execute_single_job_runs_inline() {
        let processor = ParallelProcessor::new(Some(8));
        let caller = std::thread::current().id();

        let results = processor
            .execute(vec![()], |()| Ok(std::thread::current().id()))
            .unwrap();

        assert_eq!(results, vec![caller]);
    }
}
