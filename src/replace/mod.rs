//! Record replacement strategies built on a partition.
//!
//! Each strategy reads the group structure of a [`Partition`] and rewrites a
//! subset of attributes of an output dataset shaped like the source:
//!
//! | Strategy | Attributes | Per group |
//! |----------|------------|-----------|
//! | [`CentroidSubstitution`] | quasi-identifiers | every value becomes the group mean |
//! | [`GroupPermutation`] | quasi-identifiers (or chosen) | values are shuffled among members |
//! | [`permute_confidential`] | each confidential attribute | shuffled within its own MDAV groups |
//! | [`HybridSynthesis`] | confidential responses | values redrawn within a distance budget |
//!
//! The partition may be built over a projection of the output dataset (for
//! example its quasi-identifier columns). Projections keep record order, so group
//! member `i` is output row `i`.

mod centroid;
mod hybrid;
mod permutation;

pub use centroid::{centroid, CentroidSubstitution};
pub use hybrid::{HybridSynthesis, DEFAULT_MAX_ATTEMPTS};
pub use permutation::{permute_confidential, GroupPermutation};

use crate::data::Dataset;
use crate::error::{Result, SdcError};
use crate::partitioning::Partition;

/// A policy that rewrites records group by group.
pub trait GroupReplacer {
    /// Rewrite `output` in place according to `partition`.
    ///
    /// `output` must have exactly as many records as the partition's dataset.
    /// Every row of a group is also tagged with the group number.
    fn apply(&mut self, partition: &Partition<'_>, output: &mut Dataset) -> Result<()>;

    /// Copy `source` and rewrite the copy.
    fn replace(&mut self, source: &Dataset, partition: &Partition<'_>) -> Result<Dataset> {
        let mut output = source.clone();
        self.apply(partition, &mut output)?;
        Ok(output)
    }
}

fn check_rows(partition: &Partition<'_>, output: &Dataset) -> Result<()> {
    if partition.num_records() != output.len() {
        return Err(SdcError::ShapeMismatch {
            expected: output.len(),
            actual: partition.num_records(),
        });
    }
    Ok(())
}

fn check_attributes(attrs: &[usize], output: &Dataset) -> Result<()> {
    match attrs.iter().find(|&&a| a >= output.num_attributes()) {
        Some(bad) => Err(SdcError::UnknownAttribute(format!("#{bad}"))),
        None => Ok(()),
    }
}

fn tag_groups(partition: &Partition<'_>, output: &mut Dataset) {
    for (g, members) in partition.groups().iter().enumerate() {
        for &row in members {
            output.set_group_id(row, Some(g));
        }
    }
}
