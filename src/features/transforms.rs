//! Transform primitives for derived features
//!
//! Every function maps panel columns (`Option<f64>` per calendar date) to a
//! derived column of the same length, using only values at or before each
//! output date. Rows without enough history, or with any missing input in
//! the window, come out as `None`.

/// Rolling arithmetic mean over the trailing `window` rows (inclusive)
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Rolling population standard deviation over the trailing `window` rows
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| {
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        let variance = w.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / w.len() as f64;
        variance.sqrt()
    })
}

fn rolling(
    values: &[Option<f64>],
    window: usize,
    stat: impl Fn(&[f64]) -> f64,
) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    if window == 0 || window > n {
        return out;
    }
    let mut buf = Vec::with_capacity(window);
    for i in (window - 1)..n {
        buf.clear();
        for value in &values[i + 1 - window..=i] {
            match value {
                Some(v) => buf.push(*v),
                None => break,
            }
        }
        if buf.len() == window {
            out[i] = Some(stat(&buf));
        }
    }
    out
}

/// Pointwise difference `left - right`
pub fn spread(left: &[Option<f64>], right: &[Option<f64>]) -> Vec<Option<f64>> {
    left.iter()
        .zip(right.iter())
        .map(|(l, r)| match (l, r) {
            (Some(l), Some(r)) => Some(l - r),
            _ => None,
        })
        .collect()
}

/// Pointwise ratio `left / right`; zero denominators are missing
pub fn ratio(left: &[Option<f64>], right: &[Option<f64>]) -> Vec<Option<f64>> {
    left.iter()
        .zip(right.iter())
        .map(|(l, r)| match (l, r) {
            (Some(l), Some(r)) if *r != 0.0 => Some(l / r),
            _ => None,
        })
        .collect()
}

/// Log return over `period` rows: `ln(v[i] / v[i - period])`
///
/// Defined only for strictly positive values.
pub fn log_return(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    shifted_pair(values, period, |prev, cur| {
        if prev > 0.0 && cur > 0.0 {
            Some((cur / prev).ln())
        } else {
            None
        }
    })
}

/// Absolute change over `period` rows: `v[i] - v[i - period]`
pub fn momentum(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    shifted_pair(values, period, |prev, cur| Some(cur - prev))
}

fn shifted_pair(
    values: &[Option<f64>],
    period: usize,
    combine: impl Fn(f64, f64) -> Option<f64>,
) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    if period == 0 || period >= n {
        return out;
    }
    for i in period..n {
        if let (Some(prev), Some(cur)) = (values[i - period], values[i]) {
            out[i] = combine(prev, cur);
        }
    }
    out
}

/// Slope between two forward-curve tenors, per unit of tenor gap
pub fn curve_slope(
    near: &[Option<f64>],
    far: &[Option<f64>],
    tenor_gap: f64,
) -> Vec<Option<f64>> {
    near.iter()
        .zip(far.iter())
        .map(|(n, f)| match (n, f) {
            (Some(n), Some(f)) if tenor_gap != 0.0 => Some((f - n) / tenor_gap),
            _ => None,
        })
        .collect()
}
