//! Summary Statistics Module
//! Pure aggregations over a filtered frame: KPI scalars, grouped means,
//! the Pearson correlation matrix and scatter sampling.
//!
//! Every function is total over an empty frame; "no data" comes back as
//! `None` (or an empty sequence), never as a panic.

use polars::prelude::*;
use rayon::prelude::*;
use statrs::statistics::Statistics;
use std::collections::HashMap;

use crate::data::loader::numeric_column_names;

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Standard median: average of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

/// Mean rounded to the nearest integer.
///
/// Rounding rule: round-half-away-from-zero (`f64::round`), i.e. half-up
/// for the non-negative values this dashboard works with.
pub fn rounded_mean_int(values: &[f64]) -> Option<i64> {
    mean(values).map(|m| m.round() as i64)
}

/// Per-group mean of `value_col`, one entry per distinct key.
///
/// Keys come back in first-encounter order; null keys and null/NaN values
/// are skipped.
pub fn group_mean(
    df: &DataFrame,
    group_col: &str,
    value_col: &str,
) -> PolarsResult<Vec<(String, f64)>> {
    let keys = df.column(group_col)?;
    let values = df.column(value_col)?.cast(&DataType::Float64)?;
    let values = values.f64()?;

    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, (f64, usize)> = HashMap::new();

    for i in 0..df.height() {
        let (Ok(key), Some(value)) = (keys.get(i), values.get(i)) else {
            continue;
        };
        if key.is_null() || value.is_nan() {
            continue;
        }

        let key = key.to_string().trim_matches('"').to_string();
        let entry = sums.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (0.0, 0)
        });
        entry.0 += value;
        entry.1 += 1;
    }

    Ok(order
        .into_iter()
        .map(|key| {
            let (sum, count) = sums[&key];
            (key, sum / count as f64)
        })
        .collect())
}

/// The `n` groups with the highest mean, descending by mean.
///
/// The sort is stable over first-encounter order, so ties resolve to the
/// group seen first.
pub fn top_n_by_group_mean(
    df: &DataFrame,
    group_col: &str,
    value_col: &str,
    n: usize,
) -> PolarsResult<Vec<(String, f64)>> {
    let mut means = group_mean(df, group_col, value_col)?;
    means.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    means.truncate(n);
    Ok(means)
}

/// Pearson correlations between all numeric columns, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` square. Entries are in [-1, 1]; a pair
    /// involving a zero-variance column is NaN.
    pub values: Vec<Vec<f64>>,
}

/// Correlation over all numeric columns; `None` when fewer than two numeric
/// columns or fewer than two records remain.
pub fn correlation_matrix(df: &DataFrame) -> Option<CorrelationMatrix> {
    let columns = numeric_column_names(df);
    if columns.len() < 2 || df.height() < 2 {
        return None;
    }

    let series: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|name| {
            df.column(name)
                .ok()
                .and_then(|col| col.cast(&DataType::Float64).ok())
                .and_then(|col| col.f64().ok().map(|ca| ca.into_iter().collect()))
                .unwrap_or_default()
        })
        .collect();

    let values: Vec<Vec<f64>> = (0..columns.len())
        .into_par_iter()
        .map(|i| {
            (0..columns.len())
                .map(|j| round2(pearson(&series[i], &series[j])))
                .collect()
        })
        .collect();

    Some(CorrelationMatrix { columns, values })
}

/// Pearson coefficient over pairwise-complete observations.
fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if !x.is_nan() && !y.is_nan() => Some((*x, *y)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let xv: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let yv: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let mx = xv.iter().mean();
    let my = yv.iter().mean();
    let sx = xv.iter().std_dev();
    let sy = yv.iter().std_dev();

    if sx == 0.0 || sy == 0.0 {
        return f64::NAN;
    }

    let cov = pairs
        .iter()
        .map(|(x, y)| (x - mx) * (y - my))
        .sum::<f64>()
        / (pairs.len() - 1) as f64;

    (cov / (sx * sy)).clamp(-1.0, 1.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Uniformly sampled subset of at most `max_count` rows.
///
/// The full frame comes back when it already fits; otherwise each call
/// draws a fresh sample with no ordering guarantee. Visualization only.
pub fn sample_rows(df: &DataFrame, max_count: usize) -> PolarsResult<DataFrame> {
    let height = df.height();
    if height <= max_count {
        return Ok(df.clone());
    }

    let mut rng = rand::rng();
    let indices: Vec<IdxSize> = rand::seq::index::sample(&mut rng, height, max_count)
        .into_iter()
        .map(|i| i as IdxSize)
        .collect();

    df.take(&IdxCa::from_vec("sample".into(), indices))
}
