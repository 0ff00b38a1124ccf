//! Variance-normalized ("SSE") distance between records.
//!
//! For every attribute the two values are treated as a two-element sample; its
//! population variance is divided by the attribute's variance over the whole
//! dataset, and the distance is the square root of the sum:
//!
//! ```text
//! d(a, b) = sqrt( Σ_d  var({a_d, b_d}) / var_d )      var({x, y}) = ((x - y) / 2)²
//! ```
//!
//! Normalizing by the global spread makes attributes on different scales
//! (age in years, income in euros) contribute comparably.
//!
//! ## Constant columns
//!
//! An attribute whose dataset variance is zero contributes exactly zero to every
//! distance. There is no division by zero and no NaN.

/// Population variance of the pair `{x, y}`.
#[inline]
#[must_use]
pub fn pair_variance(x: f64, y: f64) -> f64 {
    let m = (x + y) / 2.0;
    ((x - m) * (x - m) + (y - m) * (y - m)) / 2.0
}

#[inline]
fn normalized_term(x: f64, y: f64, variance: f64) -> f64 {
    let num = pair_variance(x, y);
    if num != 0.0 && variance != 0.0 {
        num / variance
    } else {
        0.0
    }
}

/// SSE distance between two records given per-attribute dataset variances.
///
/// `a`, `b` and `variances` are zipped; callers pass slices of equal length.
#[inline]
#[must_use]
pub fn sse_distance(a: &[f64], b: &[f64], variances: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), variances.len());
    a.iter()
        .zip(b)
        .zip(variances)
        .map(|((&x, &y), &v)| normalized_term(x, y, v))
        .sum::<f64>()
        .sqrt()
}

/// SSE distance restricted to one attribute with dataset variance `variance`.
#[inline]
#[must_use]
pub fn scalar_distance(x: f64, y: f64, variance: f64) -> f64 {
    normalized_term(x, y, variance).sqrt()
}

/// SSE distance bound to one dataset's variance table.
#[derive(Debug, Clone, Copy)]
pub struct DistanceMetric<'a> {
    variances: &'a [f64],
}

impl<'a> DistanceMetric<'a> {
    pub fn new(variances: &'a [f64]) -> Self {
        Self { variances }
    }

    #[inline]
    #[must_use]
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        sse_distance(a, b, self.variances)
    }

    /// Single-attribute distance for attribute `attr`.
    #[inline]
    #[must_use]
    pub fn scalar(&self, x: f64, y: f64, attr: usize) -> f64 {
        scalar_distance(x, y, self.variances[attr])
    }

    pub fn variances(&self) -> &'a [f64] {
        self.variances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_variance_is_quarter_squared_gap() {
        assert!((pair_variance(1.0, 5.0) - 4.0).abs() < 1e-12);
        assert_eq!(pair_variance(3.0, 3.0), 0.0);
    }

    #[test]
    fn constant_column_contributes_nothing() {
        let d = sse_distance(&[1.0, 7.0], &[3.0, 9.0], &[1.0, 0.0]);
        // only the first attribute counts: var({1,3}) = 1
        assert!((d - 1.0).abs() < 1e-12);
        assert!(d.is_finite());
    }

    #[test]
    fn scalar_matches_single_column_record_distance() {
        let v = 2.5;
        let d1 = scalar_distance(4.0, 10.0, v);
        let d2 = sse_distance(&[4.0], &[10.0], &[v]);
        assert!((d1 - d2).abs() < 1e-12);
    }

    #[test]
    fn metric_binds_variances() {
        let variances = [4.0, 1.0];
        let metric = DistanceMetric::new(&variances);
        let a = [0.0, 0.0];
        let b = [4.0, 2.0];
        // 4/4 + 1/1
        assert!((metric.distance(&a, &b) - 2.0_f64.sqrt()).abs() < 1e-12);
        assert!((metric.scalar(0.0, 4.0, 0) - 1.0).abs() < 1e-12);
    }
}
