use std::hint::black_box;
use std::time::Instant;

use anyhow::Result;
use rand::Rng;
use tracing::debug;

use parmr::numeric::{
    center_derivative, center_derivative_parallel, trapezoid_integral,
    trapezoid_integral_parallel,
};
use parmr::ParallelProcessor;

/// Mean of the exponential distribution the x samples are drawn from.
pub const SAMPLE_MEAN: f64 = 10.0;

/// Mean wall time in nanoseconds for one sample size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeRow {
    pub size: usize,
    pub derivative_parallel: f64,
    pub derivative_sequential: f64,
    pub integral_parallel: f64,
    pub integral_sequential: f64,
}

/// `steps` sizes spaced evenly on a log scale from `min_size` to `max_size`.
pub fn sample_sizes(min_size: usize, max_size: usize, steps: usize) -> Vec<usize> {
    if steps <= 1 {
        return vec![min_size];
    }

    let (low, high) = ((min_size as f64).ln(), (max_size as f64).ln());
    (0..steps)
        .map(|i| {
            let t = i as f64 / (steps - 1) as f64;
            (low + t * (high - low)).exp().round() as usize
        })
        .collect()
}

/// `x` exponentially distributed, `y` uniform in `[-1, 1)`.
pub fn generate_samples<R: Rng>(size: usize, rng: &mut R) -> (Vec<f64>, Vec<f64>) {
    let x = (0..size)
        .map(|_| -SAMPLE_MEAN * (1.0 - rng.random::<f64>()).ln())
        .collect();
    let y = (0..size).map(|_| rng.random_range(-1.0..1.0)).collect();
    (x, y)
}

pub fn measure<R: Rng>(
    size: usize,
    repetitions: usize,
    processor: &ParallelProcessor,
    rng: &mut R,
) -> Result<RuntimeRow> {
    let (x, y) = generate_samples(size, rng);
    let mut totals = [0u128; 4];

    for _ in 0..repetitions {
        let start = Instant::now();
        black_box(center_derivative_parallel(&x, &y, processor)?);
        totals[0] += start.elapsed().as_nanos();

        let start = Instant::now();
        black_box(center_derivative(&x, &y)?);
        totals[1] += start.elapsed().as_nanos();

        let start = Instant::now();
        black_box(trapezoid_integral_parallel(&x, &y, processor)?);
        totals[2] += start.elapsed().as_nanos();

        let start = Instant::now();
        black_box(trapezoid_integral(&x, &y)?);
        totals[3] += start.elapsed().as_nanos();
    }

    let runs = repetitions.max(1) as f64;
    let [derivative_parallel, derivative_sequential, integral_parallel, integral_sequential] =
        totals.map(|total| total as f64 / runs);

    debug!(size, derivative_parallel, integral_parallel, "measured sample size");

    Ok(RuntimeRow {
        size,
        derivative_parallel,
        derivative_sequential,
        integral_parallel,
        integral_sequential,
    })
}
