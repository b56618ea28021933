//! Safe arithmetic for derived metrics

/// `numerator / denominator`, or `None` when either side is absent, the denominator
/// is zero, or the result is not finite
pub fn safe_ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (n, d) = (numerator?, denominator?);
    if d == 0.0 {
        return None;
    }
    Some(n / d).filter(|v| v.is_finite())
}

/// [`safe_ratio`] scaled to a percentage
pub fn safe_percent(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    safe_ratio(numerator, denominator).map(|r| r * 100.0)
}

/// Sum of the present values, `None` when none are present
pub fn sum_present(values: &[Option<f64>]) -> Option<f64> {
    values
        .iter()
        .flatten()
        .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}
