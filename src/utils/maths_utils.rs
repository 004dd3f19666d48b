use argminmax::ArgMinMax;
use statrs::statistics::Statistics;

/// (min, max) of a slice, `None` when empty.
#[inline]
pub(crate) fn value_range(vec: &[f64]) -> Option<(f64, f64)> {
    if vec.is_empty() {
        return None;
    }
    let (min_index, max_index): (usize, usize) = vec.argminmax();
    Some((vec[min_index], vec[max_index]))
}

/// Maps `value` from [min, max] into [0.0, 1.0]. A degenerate range maps to 0.5.
#[inline]
pub(crate) fn normalize_between(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span.abs() <= f64::EPSILON {
        return 0.5;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

#[inline]
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}

/// Pearson correlation coefficient of two equally long samples.
/// `None` for fewer than two points, mismatched lengths or a constant sample.
pub(crate) fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let sd_x = xs.iter().std_dev();
    let sd_y = ys.iter().std_dev();
    if sd_x <= f64::EPSILON || sd_y <= f64::EPSILON {
        return None;
    }
    let r = xs.iter().covariance(ys.iter()) / (sd_x * sd_y);
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}
