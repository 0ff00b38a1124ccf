//! Tabular microdata: records, attribute metadata and datasets.
//!
//! Every attribute is numeric. Identifiers are carried through untouched;
//! quasi-identifiers drive clustering; confidential attributes are the values
//! protected by swapping or synthesis.

mod attribute;
mod dataset;
mod record;

pub use attribute::{Attribute, Confidentiality, NumericKind, Role};
pub use dataset::Dataset;
pub use record::Record;

/// Arithmetic mean. Zero for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divisor `n`). Zero for an empty slice.
#[must_use]
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}
