use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::{check_attributes, check_rows, tag_groups, GroupReplacer};
use crate::data::Dataset;
use crate::error::{Result, SdcError};
use crate::partitioning::{Mdav, Partition};

/// Rank swapping within groups.
///
/// For every targeted attribute, the values held by a group's members are
/// shuffled (Fisher–Yates) and written back. Each attribute is shuffled
/// independently, so the link between attributes of one record is broken while
/// the multiset of values per group and attribute is preserved exactly.
#[derive(Debug, Clone)]
pub struct GroupPermutation<R> {
    rng: R,
    attributes: Option<Vec<usize>>,
}

impl<R: Rng> GroupPermutation<R> {
    /// Shuffle the output dataset's quasi-identifiers.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            attributes: None,
        }
    }

    /// Shuffle only `attributes`.
    pub fn targeting(rng: R, attributes: Vec<usize>) -> Self {
        Self {
            rng,
            attributes: Some(attributes),
        }
    }
}

impl<R: Rng> GroupReplacer for GroupPermutation<R> {
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

        for members in partition.groups() {
            if members.len() < 2 {
                continue;
            }
            for &attr in &attrs {
                let mut values: Vec<f64> =
                    members.iter().map(|&r| output.value(r, attr)).collect();
                values.shuffle(&mut self.rng);
                for (&r, v) in members.iter().zip(values) {
                    output.set_value(r, attr, v);
                }
            }
        }
        tag_groups(partition, output);
        Ok(())
    }
}

/// Swap every confidential attribute within its own MDAV groups.
///
/// Each confidential attribute is clustered on its own (a one-column projection)
/// and its values are shuffled inside those groups. Other attributes are copied.
/// Group tags in the result refer to the partition of the last attribute.
pub fn permute_confidential<R: Rng + ?Sized>(
    source: &Dataset,
    k: usize,
    rng: &mut R,
) -> Result<Dataset> {
    let confidential = source.confidential_attributes();
    if confidential.is_empty() {
        return Err(SdcError::NoAttributes("confidential"));
    }
    let mdav = Mdav::new(k)?;
    let mut output = source.clone();

    for attr in confidential {
        let projected = source.confidential_dataset(attr)?;
        let partition = mdav.partition(&projected)?;
        debug!(
            attribute = source.attribute(attr).name(),
            groups = partition.num_groups(),
            "swapping confidential attribute"
        );
        GroupPermutation::targeting(&mut *rng, vec![attr]).apply(&partition, &mut output)?;
    }
    Ok(output)
}
