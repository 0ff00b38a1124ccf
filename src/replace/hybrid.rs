//! Hybrid synthetic generation (microhybrid).
//!
//! Inside each group, every confidential value `x` is replaced by a random draw
//! `x'` from the group's observed range `[min, max]`, accepted only when
//!
//! ```text
//! d(x, x') <= max_{v in group} d(x, v)
//! ```
//!
//! with `d` the single-attribute SSE distance normalized by the attribute's
//! variance over the whole dataset. The perturbation of each value is therefore
//! bounded by the spread of its own group.
//!
//! The accepted interval `[x - M, x + M] ∩ [min, max]` always covers at least half
//! of the range (the budget `M` reaches the farther end), so the expected number
//! of draws per value is at most two.

use rand::Rng;
use tracing::warn;

use super::{check_rows, tag_groups, GroupReplacer};
use crate::data::Dataset;
use crate::distance::scalar_distance;
use crate::error::{Result, SdcError};
use crate::partitioning::Partition;

/// Draws per value before falling back to the original value.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Bounded-distance rejection sampling of confidential responses.
///
/// Predictor attributes and non-confidential attributes are copied unchanged.
#[derive(Debug, Clone)]
pub struct HybridSynthesis<R> {
    rng: R,
    max_attempts: usize,
}

impl<R: Rng> HybridSynthesis<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Cap on draws per value.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// `None` when no candidate was accepted, or when the group range is not finite.
    fn draw(&mut self, x: f64, lo: f64, hi: f64, variance: f64, budget: f64) -> Option<f64> {
        if !(lo.is_finite() && hi.is_finite()) {
            return None;
        }
        for _ in 0..self.max_attempts {
            let candidate = if hi > lo {
                self.rng.random_range(lo..=hi)
            } else {
                lo
            };
            if scalar_distance(x, candidate, variance) <= budget {
                return Some(candidate);
            }
        }
        None
    }
}

/// Largest single-attribute distance from `x` to any value of the group.
fn distance_budget(x: f64, values: &[f64], variance: f64) -> f64 {
    values
        .iter()
        .map(|&v| scalar_distance(x, v, variance))
        .fold(0.0, f64::max)
}

impl<R: Rng> GroupReplacer for HybridSynthesis<R> {
    fn apply(&mut self, partition: &Partition<'_>, output: &mut Dataset) -> Result<()> {
        check_rows(partition, output)?;
        let targets: Vec<usize> = output
            .attributes()
            .iter()
            .filter(|a| a.is_confidential() && !a.is_predictor())
            .map(|a| a.index())
            .collect();
        if targets.is_empty() {
            return Err(SdcError::NoAttributes("confidential response"));
        }
        // Budgets are measured against the unperturbed data.
        let variances = output.variances().to_vec();

        for members in partition.groups().iter().filter(|g| !g.is_empty()) {
            for &attr in &targets {
                let values: Vec<f64> = members.iter().map(|&r| output.value(r, attr)).collect();
                let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let variance = variances[attr];

                let synthetic: Vec<f64> = values
                    .iter()
                    .map(|&x| {
                        let budget = distance_budget(x, &values, variance);
                        self.draw(x, lo, hi, variance, budget).unwrap_or_else(|| {
                            warn!(
                                attribute = attr,
                                value = x,
                                "hybrid sampling exhausted, keeping original value"
                            );
                            x
                        })
                    })
                    .collect();

                for (&r, v) in members.iter().zip(synthetic) {
                    output.set_value(r, attr, v);
                }
            }
        }
        tag_groups(partition, output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Attribute, Role};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn budget_is_distance_to_farthest_group_value() {
        let b = distance_budget(2.0, &[1.0, 2.0, 6.0], 4.0);
        assert!((b - scalar_distance(2.0, 6.0, 4.0)).abs() < 1e-12);
    }

    #[test]
    fn constant_group_keeps_its_value() {
        let ds = Dataset::from_rows(
            vec![Attribute::confidential("c")],
            vec![vec![5.0], vec![5.0], vec![9.0], vec![9.0]],
        )
        .unwrap();
        let mut p = Partition::new(&ds, 2);
        p.add_group(vec![0, 1]);
        p.add_group(vec![2, 3]);
        let out = HybridSynthesis::new(StdRng::seed_from_u64(11))
            .replace(&ds, &p)
            .unwrap();
        assert_eq!(out.column(0), vec![5.0, 5.0, 9.0, 9.0]);
    }

    #[test]
    fn predictors_are_left_alone() {
        let ds = Dataset::from_rows(
            vec![
                Attribute::confidential("x").with_role(Role::Predictor),
                Attribute::confidential("y"),
            ],
            (0..6).map(|i| vec![i as f64, (i * i) as f64]),
        )
        .unwrap();
        let mut p = Partition::new(&ds, 3);
        p.add_group(vec![0, 1, 2]);
        p.add_group(vec![3, 4, 5]);
        let out = HybridSynthesis::new(StdRng::seed_from_u64(5))
            .replace(&ds, &p)
            .unwrap();
        assert_eq!(out.column(0), ds.column(0));
        for (g, (lo, hi)) in [(0.0, 4.0), (9.0, 25.0)].into_iter().enumerate() {
            for &r in p.group(g) {
                let v = out.value(r, 1);
                assert!((lo..=hi).contains(&v), "{v} outside [{lo}, {hi}]");
            }
        }
    }

    #[test]
    fn infinite_group_values_are_kept() {
        let ds = Dataset::from_rows(
            vec![Attribute::confidential("c")],
            vec![vec![1.0], vec![f64::INFINITY], vec![3.0]],
        )
        .unwrap();
        let mut p = Partition::new(&ds, 3);
        p.add_group(vec![0, 1, 2]);
        let out = HybridSynthesis::new(StdRng::seed_from_u64(2))
            .replace(&ds, &p)
            .unwrap();
        assert_eq!(out.column(0), vec![1.0, f64::INFINITY, 3.0]);
    }

    #[test]
    fn requires_a_confidential_response() {
        let ds = Dataset::from_rows(
            vec![Attribute::quasi_identifier("q")],
            (0..4).map(|i| vec![i as f64]),
        )
        .unwrap();
        let mut p = Partition::new(&ds, 2);
        p.add_group(vec![0, 1, 2, 3]);
        let err = HybridSynthesis::new(StdRng::seed_from_u64(0))
            .replace(&ds, &p)
            .unwrap_err();
        assert!(matches!(err, SdcError::NoAttributes(_)));
    }
}
