//! Trailing-window statistics over ordered series.
//!
//! Every output has the same length as its input. Position `i` depends only
//! on inputs `..=i`, and is `None` until the window is full.

/// Fractional change versus the previous element, `(v - prev) / prev`.
/// `None` at index 0 and wherever the previous value is zero.
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for (i, &v) in values.iter().enumerate() {
        if i == 0 {
            out.push(None);
            continue;
        }
        let prev = values[i - 1];
        out.push((prev != 0.0).then(|| (v - prev) / prev));
    }
    out
}

/// Simple moving average over a trailing window of `period` values.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    assert!(period >= 1, "rolling mean period must be >= 1");
    let n = values.len();
    let mut out = vec![None; n];
    if n < period {
        return out;
    }

    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = Some(sum / period as f64);

    for i in period..n {
        sum += values[i] - values[i - period];
        out[i] = Some(sum / period as f64);
    }
    out
}

/// Sample standard deviation (n−1 denominator) over a trailing window.
///
/// A window containing any `None` yields `None`.
pub fn rolling_sample_std(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    assert!(period >= 2, "sample std-dev needs a period of at least 2");
    let n = values.len();
    let mut out = vec![None; n];

    for i in (period - 1)..n {
        let window = &values[(i + 1 - period)..=i];
        let Some(window) = window.iter().copied().collect::<Option<Vec<f64>>>() else {
            continue;
        };
        out[i] = Some(sample_std(&window));
    }
    out
}

/// Bessel-corrected standard deviation. Caller guarantees `len >= 2`.
fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (n - 1.0)).sqrt()
}
