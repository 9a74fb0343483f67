//! Numeric routines over sampled functions, built on the map/reduce engine.
//!
//! Samples are given as separate `x` and `y` slices of equal length and do
//! not have to be sorted; every routine sorts them by `x` first.

use thiserror::Error;
use tracing::error;

use crate::error::{Error, Result};
use crate::parallel::ParallelProcessor;
use crate::sequential::{self, common_len};

/// Chunk size used by the parallel numeric routines.
pub const NUMERIC_MIN_CHUNK_SIZE: usize = 20;

/// Bisection steps when the caller has no preference.
pub const DEFAULT_BISECTION_STEPS: usize = 20;

#[derive(Error, Debug)]
pub enum NumericError {
    #[error("function has the same sign at x_min = {x_min} and x_max = {x_max}")]
    InvalidBracket { x_min: f64, x_max: f64 },

    #[error(transparent)]
    Engine(#[from] Error),
}

/// Processor configured with [`NUMERIC_MIN_CHUNK_SIZE`].
pub fn numeric_processor(num_workers: Option<usize>) -> Result<ParallelProcessor> {
    ParallelProcessor::new(num_workers).with_min_chunk_size(NUMERIC_MIN_CHUNK_SIZE)
}

fn sort_by_x(x: &[f64], y: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    common_len(&[x, y])?;

    let mut order: Vec<usize> = (0..x.len()).collect();
    order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));

    Ok((
        order.iter().map(|&i| x[i]).collect(),
        order.iter().map(|&i| y[i]).collect(),
    ))
}

fn derivative_step([lower_x, lower_y, upper_x, upper_y]: [&f64; 4]) -> f64 {
    (upper_y - lower_y) / (upper_x - lower_x)
}

fn trapezoid_step([lower_x, lower_y, upper_x, upper_y]: [&f64; 4]) -> f64 {
    (upper_y + lower_y) * (upper_x - lower_x)
}

/// Central difference `(y[i+1] - y[i-1]) / (x[i+1] - x[i-1])` at every
/// interior point. The result is two shorter than the input.
pub fn center_derivative(x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
    let (x, y) = sort_by_x(x, y)?;
    if x.len() < 3 {
        return Ok(Vec::new());
    }

    let n = x.len();
    sequential::map(derivative_step, [&x[..n - 2], &y[..n - 2], &x[2..], &y[2..]])
}

/// Parallel [`center_derivative`].
pub fn center_derivative_parallel(
    x: &[f64],
    y: &[f64],
    processor: &ParallelProcessor,
) -> Result<Vec<f64>> {
    let (x, y) = sort_by_x(x, y)?;
    if x.len() < 3 {
        return Ok(Vec::new());
    }

    let n = x.len();
    processor.map(derivative_step, [&x[..n - 2], &y[..n - 2], &x[2..], &y[2..]])
}

/// Trapezoid rule over the samples. Fewer than two samples integrate to zero.
pub fn trapezoid_integral(x: &[f64], y: &[f64]) -> Result<f64> {
    let (x, y) = sort_by_x(x, y)?;
    if x.len() < 2 {
        return Ok(0.0);
    }

    let n = x.len();
    let areas = sequential::map(trapezoid_step, [&x[..n - 1], &y[..n - 1], &x[1..], &y[1..]])?;
    let sum = sequential::reduce(|acc: f64, area: &f64| acc + area, &areas, Some(0.0))?;
    Ok(sum / 2.0)
}

/// Parallel [`trapezoid_integral`], fusing the per-interval areas and their sum.
pub fn trapezoid_integral_parallel(
    x: &[f64],
    y: &[f64],
    processor: &ParallelProcessor,
) -> Result<f64> {
    let (x, y) = sort_by_x(x, y)?;
    if x.len() < 2 {
        return Ok(0.0);
    }

    let n = x.len();
    let sum = processor.map_reduce(
        trapezoid_step,
        |acc: f64, area: &f64| acc + area,
        |a, b| a + b,
        [&x[..n - 1], &y[..n - 1], &x[1..], &y[1..]],
        Some(0.0),
    )?;
    Ok(sum / 2.0)
}

/// Root of `f` in `[x_min, x_max]` by interval bisection.
///
/// `f` must change sign over the interval. Returns the midpoint of the
/// remaining interval after `max_steps` halvings, or earlier on an exact zero.
pub fn bisection_root<F>(
    f: F,
    x_min: f64,
    x_max: f64,
    max_steps: usize,
) -> std::result::Result<f64, NumericError>
where
    F: Fn(f64) -> f64,
{
    let (mut lower, mut upper) = (x_min, x_max);
    let mut f_upper = f(upper);

    if f(lower) * f_upper > 0.0 {
        error!(x_min, x_max, "function must have different signs on the interval bounds");
        return Err(NumericError::InvalidBracket { x_min, x_max });
    }

    for _ in 0..max_steps {
        let mid = (lower + upper) / 2.0;
        let f_mid = f(mid);

        if f_mid == 0.0 {
            return Ok(mid);
        }

        // keep the half whose bounds differ in sign
        if f_mid * f_upper > 0.0 {
            upper = mid;
            f_upper = f_mid;
        } else {
            lower = mid;
        }
    }

    Ok((lower + upper) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn linear(x: &[f64], m: f64, t: f64) -> Vec<f64> {
        x.iter().map(|x| x * m + t).collect()
    }

    fn exponential_samples(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| -10.0 * (1.0 - rng.random::<f64>()).ln()).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-7 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "{actual} differs from {expected}"
        );
    }

    #[test]
    fn test_derivative_of_linear_function() {
        let x = exponential_samples(100, 1);
        let y = linear(&x, 14.2, 4.0);

        let result = center_derivative(&x, &y).unwrap();
        assert_eq!(result.len(), 98);
        for slope in result {
            assert_close(slope, 14.2);
        }
    }

    #[test]
    fn test_parallel_derivative_matches_sequential() {
        let x = exponential_samples(501, 2);
        let y = linear(&x, 3472.5553, -234.33);
        let processor = numeric_processor(Some(4)).unwrap();

        let expected = center_derivative(&x, &y).unwrap();
        let result = center_derivative_parallel(&x, &y, &processor).unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_derivative_short_input() {
        let processor = numeric_processor(None).unwrap();
        assert!(center_derivative(&[1.0, 2.0], &[1.0, 2.0]).unwrap().is_empty());
        assert!(center_derivative_parallel(&[], &[], &processor).unwrap().is_empty());
    }

    #[test]
    fn test_integral_of_linear_function() {
        let x = exponential_samples(100, 3);
        let y = linear(&x, 14.2, 4.0);
        let processor = numeric_processor(Some(4)).unwrap();

        let x_min = x.iter().copied().fold(f64::INFINITY, f64::min);
        let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let expected = 14.2 * (x_max * x_max - x_min * x_min) * 0.5 + 4.0 * (x_max - x_min);

        assert_close(trapezoid_integral(&x, &y).unwrap(), expected);
        assert_close(trapezoid_integral_parallel(&x, &y, &processor).unwrap(), expected);
    }

    #[test]
    fn test_integral_of_unsorted_constant() {
        let x = [3.0, 1.0, 2.0];
        let y = [4.0, 4.0, 4.0];
        assert_close(trapezoid_integral(&x, &y).unwrap(), 8.0);
    }

    #[test]
    fn test_integral_length_mismatch() {
        let processor = numeric_processor(None).unwrap();
        let result = trapezoid_integral_parallel(&[1.0, 2.0], &[1.0], &processor);
        assert!(matches!(result, Err(Error::LengthMismatch { .. })));
    }

    #[test]
    fn test_bisection_finds_linear_root() {
        let root = bisection_root(|x| x * 14.2 + 4.0, -10.0, 10.0, 60).unwrap();
        assert_close(root, -4.0 / 14.2);
    }

    #[test]
    fn test_bisection_exact_midpoint() {
        let root = bisection_root(|x| x - 1.0, 0.0, 2.0, DEFAULT_BISECTION_STEPS).unwrap();
        assert_eq!(root, 1.0);
    }

    #[test]
    fn test_bisection_rejects_same_sign() {
        let result = bisection_root(|x| x * x + 1.0, -1.0, 1.0, DEFAULT_BISECTION_STEPS);
        assert!(matches!(result, Err(NumericError::InvalidBracket { .. })));
    }
}
