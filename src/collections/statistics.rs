//! collections::statistics — order statistics and binning helpers.
//!
//! Purpose
//! -------
//! Slice-level routines shared by every collection: percentiles by linear
//! interpolation between order statistics, top/bottom-N selection with
//! original indices, frequency histograms (plain and circular) and the
//! `linspace` / `arange` generators used to build bin edges.
//!
//! Conventions
//! -----------
//! - Inputs are `&[f64]`; nothing here knows about headers or keys.
//! - Sorting uses `f64::total_cmp`, so NaN values sort last instead of
//!   panicking.
//! - Histogram bins include their lower edge and exclude their upper edge.

use crate::collections::errors::{CollectionError, CollectionResult};

/// Value at percentile `p` (0–100), interpolating between the two adjacent
/// order statistics.
///
/// Errors
/// ------
/// - `InvalidPercentile(p)` when `p` is outside `[0, 100]` or NaN.
/// - `EmptyCollection` for an empty slice.
pub fn percentile(values: &[f64], p: f64) -> CollectionResult<f64> {
    if !(0.0..=100.0).contains(&p) {
        return Err(CollectionError::InvalidPercentile(p));
    }
    if values.is_empty() {
        return Err(CollectionError::EmptyCollection);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let k = (sorted.len() - 1) as f64 * (p / 100.0);
    let (f, c) = (k.floor(), k.ceil());
    if f == c {
        return Ok(sorted[k as usize]);
    }
    Ok(sorted[f as usize] * (c - k) + sorted[c as usize] * (k - f))
}

/// The `count` largest values, highest first, with their original indices.
///
/// Ties keep their original order.
pub fn highest_values(values: &[f64], count: usize) -> CollectionResult<(Vec<f64>, Vec<usize>)> {
    ranked(values, count, |a, b| b.total_cmp(a))
}

/// The `count` smallest values, lowest first, with their original indices.
///
/// Ties keep their original order.
pub fn lowest_values(values: &[f64], count: usize) -> CollectionResult<(Vec<f64>, Vec<usize>)> {
    ranked(values, count, f64::total_cmp)
}

fn ranked(
    values: &[f64], count: usize, order: impl Fn(&f64, &f64) -> std::cmp::Ordering,
) -> CollectionResult<(Vec<f64>, Vec<usize>)> {
    if count == 0 || count > values.len() {
        return Err(CollectionError::InvalidCount { count, len: values.len() });
    }
    let mut indices: Vec<usize> = (0..values.len()).collect();
    // `sort_by` is stable, which gives the tie rule.
    indices.sort_by(|&i, &j| order(&values[i], &values[j]));
    indices.truncate(count);
    let picked = indices.iter().map(|&i| values[i]).collect();
    Ok((picked, indices))
}

/// Frequency histogram of `values` over monotonically increasing bin edges.
///
/// Returns one bucket per adjacent edge pair, each holding the sorted
/// values with `bins[i] <= v < bins[i + 1]`. Values outside
/// `[min(bins), max(bins)]` are dropped.
pub fn histogram(values: &[f64], bins: &[f64]) -> Vec<Vec<f64>> {
    let n_buckets = bins.len().saturating_sub(1);
    let mut hist = vec![Vec::new(); n_buckets];
    if n_buckets == 0 {
        return hist;
    }
    let min_bound = bins.iter().copied().fold(f64::INFINITY, f64::min);
    let max_bound = bins.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut bin_index = 0;
    for v in sorted {
        if v < min_bound || v > max_bound {
            continue;
        }
        if let Some(i) = (bin_index..n_buckets).find(|&i| v < bins[i + 1]) {
            hist[i].push(v);
            bin_index = i;
        }
    }
    hist
}

/// Frequency histogram of circular values (angles, hours of day).
///
/// Bin edges need not increase: a bucket whose lower edge exceeds its
/// upper edge wraps around the end of `hist_range`. `hist_range` defaults
/// to `(min(values), max(values) + 1)`; values outside it are dropped.
pub fn histogram_circular(
    values: &[f64], bins: &[f64], hist_range: Option<(f64, f64)>,
) -> Vec<Vec<f64>> {
    let n_buckets = bins.len().saturating_sub(1);
    let mut hist = vec![Vec::new(); n_buckets];

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let (lo, hi) = match (hist_range, sorted.first(), sorted.last()) {
        (Some(range), _, _) => range,
        (None, Some(&first), Some(&last)) => (first, last + 1.0),
        (None, _, _) => return hist,
    };

    for v in sorted {
        if v < lo || v >= hi {
            continue;
        }
        let bucket = (0..n_buckets).find(|&i| {
            let (start, end) = (bins[i], bins[i + 1]);
            if start < end {
                v >= start && v < end
            } else {
                (v <= hi && v >= start) || (v < end && v >= lo)
            }
        });
        if let Some(i) = bucket {
            hist[i].push(v);
        }
    }
    hist
}

/// `num` evenly spaced values from `start` to `stop` inclusive.
///
/// `num == 1` yields `[start]`; `num == 0` yields nothing.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num).map(|i| i as f64 * step + start).collect()
        }
    }
}

/// Values from `start` (inclusive) toward `stop` (exclusive) by `step`.
///
/// Descending ranges work with a negative step. A step pointing away from
/// `stop` (or zero) yields nothing rather than looping forever.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let ascending = start <= stop;
    if step == 0.0 || (ascending && step < 0.0) || (!ascending && step > 0.0) {
        return Vec::new();
    }
    let before = |a: f64| if ascending { a < stop } else { a > stop };
    let mut out = Vec::new();
    let mut val = start;
    while before(val) && (val - stop).abs() > 1e-10 {
        out.push(val);
        val += step;
    }
    out
}
