use super::{check_attributes, check_rows, tag_groups, GroupReplacer};
use crate::data::{mean, Dataset, NumericKind};
use crate::error::{Result, SdcError};
use crate::partitioning::Partition;

/// Representative value of a group: the mean, rounded half to even for integer attributes.
#[must_use]
pub fn centroid(values: &[f64], kind: NumericKind) -> f64 {
    debug_assert!(!values.is_empty(), "centroid of an empty group");
    // A constant group keeps its exact value; summing and dividing could drift.
    let m = if values.windows(2).all(|w| w[0] == w[1]) {
        values[0]
    } else {
        mean(values)
    };
    match kind {
        NumericKind::Integer => m.round_ties_even(),
        NumericKind::Real => m,
    }
}

/// Classic microaggregation: replace each quasi-identifier value by its group centroid.
///
/// Applying it twice with the same partition changes nothing the second time.
#[derive(Debug, Clone, Default)]
pub struct CentroidSubstitution {
    attributes: Option<Vec<usize>>,
}

impl CentroidSubstitution {
    /// Substitute the output dataset's quasi-identifiers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitute an explicit set of attributes instead.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Vec<usize>) -> Self {
        self.attributes = Some(attributes);
        self
    }
}

impl GroupReplacer for CentroidSubstitution {
    fn apply(&mut self, partition: &Partition<'_>, output: &mut Dataset) -> Result<()> {
        check_rows(partition, output)?;
        let attrs = match &self.attributes {
            Some(a) => a.clone(),
            None => output.quasi_identifiers(),
        };
        if attrs.is_empty() {
            return Err(SdcError::NoAttributes("quasi-identifier"));
        }
        check_attributes(&attrs, output)?;

        for members in partition.groups().iter().filter(|g| !g.is_empty()) {
            for &attr in &attrs {
                let values: Vec<f64> = members.iter().map(|&r| output.value(r, attr)).collect();
                let c = centroid(&values, output.attribute(attr).kind());
                for &r in members {
                    output.set_value(r, attr, c);
                }
            }
        }
        tag_groups(partition, output);
        Ok(())
    }
}
