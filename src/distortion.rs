//! Simple perturbations: coarsening and additive Gaussian noise.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::data::Dataset;
use crate::error::{Result, SdcError};

/// Snap `x` to the nearest multiple of `res`.
#[inline]
#[must_use]
pub fn resolution(res: f64, x: f64) -> f64 {
    if res == 0.0 {
        return x;
    }
    res * (x / res).round()
}

/// Round `x` to `decimals` fractional digits (half to even).
#[inline]
#[must_use]
pub fn round_to_decimals(decimals: u32, x: f64) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (x * scale).round_ties_even() / scale
}

/// Add independent `N(mean, variance)` noise to every non-identifier value.
///
/// Identifier attributes are copied as is.
pub fn add_gaussian_noise<R: Rng + ?Sized>(
    dataset: &Dataset,
    mean: f64,
    variance: f64,
    rng: &mut R,
) -> Result<Dataset> {
    if !(variance >= 0.0 && variance.is_finite()) {
        return Err(SdcError::Config(format!("noise variance must be >= 0, got {variance}")));
    }
    let normal = Normal::new(mean, variance.sqrt())
        .map_err(|e| SdcError::Config(format!("invalid noise distribution: {e}")))?;
    let mut output = dataset.clone();
    for attr in dataset.non_identifiers() {
        for row in 0..output.len() {
            let noisy = output.value(row, attr) + normal.sample(rng);
            output.set_value(row, attr, noisy);
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Attribute;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn resolution_snaps_to_grid() {
        assert_eq!(resolution(0.5, 1.3), 1.5);
        assert_eq!(resolution(10.0, 44.0), 40.0);
        assert_eq!(resolution(0.0, 3.3), 3.3);
    }

    #[test]
    fn rounds_to_decimals() {
        assert!((round_to_decimals(2, 3.14159) - 3.14).abs() < 1e-12);
        assert_eq!(round_to_decimals(0, 2.5), 2.0);
    }

    #[test]
    fn noise_skips_identifiers_and_rejects_negative_variance() {
        let ds = Dataset::from_rows(
            vec![Attribute::new("id"), Attribute::confidential("x")],
            (0..50).map(|i| vec![i as f64, 10.0]),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let out = add_gaussian_noise(&ds, 0.0, 1.0, &mut rng).unwrap();
        assert_eq!(out.column(0), ds.column(0));
        assert!(out.column(1).iter().any(|&v| v != 10.0));
        assert!(add_gaussian_noise(&ds, 0.0, -1.0, &mut rng).is_err());
    }
}
