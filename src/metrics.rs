//! Information-loss measures between an original and a protected dataset.
//!
//! Protection should preserve the first and second moments. For each selected
//! attribute these compare means, variances and the covariance matrix through
//! the relative difference
//!
//! ```text
//! rel(o, p) = |p - o| / |o|        (|p - o| / |o + 1| when o == 0)
//! ```

use crate::data::Dataset;
use crate::error::{Result, SdcError};

/// Original value, protected value and their relative difference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Discrepancy {
    pub original: f64,
    pub protected: f64,
    pub relative: f64,
}

impl Discrepancy {
    pub fn new(original: f64, protected: f64) -> Self {
        Self {
            original,
            protected,
            relative: relative_difference(original, protected),
        }
    }
}

/// Relative difference of `protected` from `original`.
#[must_use]
pub fn relative_difference(original: f64, protected: f64) -> f64 {
    let gap = (protected - original).abs();
    if original == 0.0 {
        gap / (original + 1.0).abs()
    } else {
        gap / original.abs()
    }
}

/// Moment comparison over a set of attributes.
#[derive(Debug, Clone)]
pub struct InformationLoss {
    /// Attributes compared, in report order.
    pub attributes: Vec<usize>,
    pub means: Vec<Discrepancy>,
    pub variances: Vec<Discrepancy>,
    /// Row-major `attributes.len()²` covariance comparison.
    pub covariances: Vec<Discrepancy>,
}

impl InformationLoss {
    /// Mean relative difference over means, variances and covariances.
    pub fn average_relative(&self) -> f64 {
        let all: Vec<f64> = self
            .means
            .iter()
            .chain(&self.variances)
            .chain(&self.covariances)
            .map(|d| d.relative)
            .collect();
        if all.is_empty() {
            0.0
        } else {
            all.iter().sum::<f64>() / all.len() as f64
        }
    }

    /// Covariance comparison for the pair at report positions `(i, j)`.
    pub fn covariance(&self, i: usize, j: usize) -> &Discrepancy {
        &self.covariances[i * self.attributes.len() + j]
    }
}

fn check_shape(original: &Dataset, protected: &Dataset) -> Result<()> {
    if original.num_attributes() != protected.num_attributes() {
        return Err(SdcError::ShapeMismatch {
            expected: original.num_attributes(),
            actual: protected.num_attributes(),
        });
    }
    if original.len() != protected.len() {
        return Err(SdcError::ShapeMismatch {
            expected: original.len(),
            actual: protected.len(),
        });
    }
    Ok(())
}

/// Compare means, variances and covariances of `attributes`.
pub fn information_loss(
    original: &Dataset,
    protected: &Dataset,
    attributes: &[usize],
) -> Result<InformationLoss> {
    check_shape(original, protected)?;
    if let Some(&bad) = attributes.iter().find(|&&a| a >= original.num_attributes()) {
        return Err(SdcError::UnknownAttribute(format!("#{bad}")));
    }

    let (om, pm) = (original.means(), protected.means());
    let means = attributes
        .iter()
        .map(|&a| Discrepancy::new(om[a], pm[a]))
        .collect();
    let variances = attributes
        .iter()
        .map(|&a| Discrepancy::new(original.variance(a), protected.variance(a)))
        .collect();
    let mut covariances = Vec::with_capacity(attributes.len() * attributes.len());
    for &i in attributes {
        for &j in attributes {
            covariances.push(Discrepancy::new(
                original.covariance(i, j),
                protected.covariance(i, j),
            ));
        }
    }

    Ok(InformationLoss {
        attributes: attributes.to_vec(),
        means,
        variances,
        covariances,
    })
}

/// Sum of squared differences per attribute between matching records.
pub fn sse_per_attribute(original: &Dataset, protected: &Dataset) -> Result<Vec<f64>> {
    check_shape(original, protected)?;
    Ok((0..original.num_attributes())
        .map(|a| {
            original
                .records()
                .iter()
                .zip(protected.records())
                .map(|(o, p)| (p.value(a) - o.value(a)).powi(2))
                .sum()
        })
        .collect())
}
