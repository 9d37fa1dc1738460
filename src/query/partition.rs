// src/query/partition.rs
//! Interval partitioning of a numeric range.
//!
//! Pure functions over `f64`. The partitioned collector feeds them creation
//! times in epoch milliseconds; nothing here knows about time.

use crate::constants::{DEFAULT_DECREASE_RATIO, DEFAULT_PARTITION_COUNT};
use crate::error::AppError;

/// How a time span is carved into sub-ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionOptions {
    /// Exponent of the power-law warp. Above 1 the intervals shrink from the
    /// low end of the range toward the high end.
    pub decrease_ratio: f64,
    /// Number of interior split points, excluding the two outer boundaries.
    pub count: i32,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            decrease_ratio: DEFAULT_DECREASE_RATIO,
            count: DEFAULT_PARTITION_COUNT,
        }
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Splits `[min(a, b), max(a, b)]` into `count + 2` evenly spaced boundaries.
///
/// Interior points are each rounded to the nearest integer on their own, so
/// spacing may differ by one between neighbours. A `count` of zero or less
/// yields just the two endpoints.
pub fn partition_between(a: f64, b: f64, count: i32) -> Vec<f64> {
    let (min, max) = ordered(a, b);
    if count <= 0 {
        return vec![min, max];
    }

    let step = (max - min) / f64::from(count + 1);
    let mut boundaries = Vec::with_capacity(count as usize + 2);
    boundaries.push(min);
    boundaries.extend((1..=count).map(|i| (min + f64::from(i) * step).round()));
    boundaries.push(max);
    boundaries
}

/// Like [`partition_between`], but warped through `x^ratio` so that
/// consecutive intervals get smaller from the low end toward the high end.
///
/// The warp always starts at the lower endpoint, whichever argument it was
/// passed as. The result is ascending and ends exactly at both endpoints.
pub fn decreasing_size_partition_between(
    a: f64,
    b: f64,
    options: &PartitionOptions,
) -> Result<Vec<f64>, AppError> {
    let ratio = options.decrease_ratio;
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(AppError::InvalidArgument(format!(
            "decrease ratio must be a positive number, got {}",
            ratio
        )));
    }

    let (low, high) = ordered(a, b);
    let span = high - low;
    let warped_span = span.powf(ratio);
    let mut boundaries: Vec<f64> = if warped_span.is_finite() {
        partition_between(0.0, warped_span, options.count)
            .into_iter()
            .map(|s| low + s.powf(1.0 / ratio).round())
            .collect()
    } else {
        // The warped span overflowed; place each point by its fraction of it.
        let parts = f64::from(options.count.max(0) + 1);
        (0..=options.count.max(0) + 1)
            .map(|i| low + (span * (f64::from(i) / parts).powf(1.0 / ratio)).round())
            .collect()
    };

    // Undo any drift the round trip through powf left on the endpoints.
    if let Some(first) = boundaries.first_mut() {
        *first = low;
    }
    if let Some(last) = boundaries.last_mut() {
        *last = high;
    }
    Ok(boundaries)
}

/// Pairs up adjacent boundaries: `[a, b, c]` becomes `[(a, b), (b, c)]`.
pub fn intervals_from_boundaries<T: Clone>(boundaries: &[T]) -> Result<Vec<(T, T)>, AppError> {
    if boundaries.len() < 2 {
        return Err(AppError::InvalidArgument(format!(
            "at least two boundaries are needed to form an interval, got {}",
            boundaries.len()
        )));
    }

    Ok(boundaries
        .windows(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect())
}
