//! Disjoint groups of record indices over one dataset.

use std::fmt;

use crate::data::{Dataset, Record};
use crate::error::{Result, SdcError};

/// A grouping of a dataset's records.
///
/// Indices refer to positions in [`Partition::dataset`]. The structure does not
/// enforce the size invariant while it is being built; [`Partition::is_well_formed`]
/// reports it.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    dataset: &'a Dataset,
    k: usize,
    groups: Vec<Vec<usize>>,
}

impl<'a> Partition<'a> {
    /// Empty partition over `dataset` with microaggregation parameter `k`.
    pub fn new(dataset: &'a Dataset, k: usize) -> Self {
        Self {
            dataset,
            k,
            groups: Vec::new(),
        }
    }

    /// Rebuild a partition from the records' `group_id` tags.
    ///
    /// Group `g` holds every record tagged `g`; ids without records yield empty
    /// groups. Every record must carry a tag.
    pub fn from_group_tags(dataset: &'a Dataset, k: usize) -> Result<Self> {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (i, record) in dataset.records().iter().enumerate() {
            let g = record.group_id().ok_or_else(|| {
                SdcError::Config(format!("record {i} has no group tag"))
            })?;
            if g >= groups.len() {
                groups.resize_with(g + 1, Vec::new);
            }
            groups[g].push(i);
        }
        Ok(Self { dataset, k, groups })
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn add_group(&mut self, indices: Vec<usize>) {
        self.groups.push(indices);
    }

    /// Remove group `i`; later groups shift down by one.
    pub fn remove_group(&mut self, i: usize) -> Vec<usize> {
        self.groups.remove(i)
    }

    /// Move every index of group `j` into group `i`.
    ///
    /// Group `j` stays in place, empty, so other group numbers are unaffected.
    pub fn merge(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let moved = std::mem::take(&mut self.groups[j]);
        self.groups[i].extend(moved);
    }

    pub fn group(&self, i: usize) -> &[usize] {
        &self.groups[i]
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn group_size(&self, i: usize) -> usize {
        self.groups[i].len()
    }

    /// Records of group `i`, in group order.
    pub fn group_records(&self, i: usize) -> Vec<&'a Record> {
        let dataset = self.dataset;
        self.groups[i].iter().map(|&r| dataset.record(r)).collect()
    }

    /// Values of attribute `attr` for the members of group `i`.
    pub fn group_values(&self, i: usize, attr: usize) -> Vec<f64> {
        self.groups[i]
            .iter()
            .map(|&r| self.dataset.value(r, attr))
            .collect()
    }

    /// True when every member of group `i` has the same value of `attr`.
    pub fn is_constant_within_group(&self, i: usize, attr: usize) -> bool {
        let values = self.group_values(i, attr);
        values.windows(2).all(|w| w[0] == w[1])
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Number of records in the underlying dataset.
    pub fn num_records(&self) -> usize {
        self.dataset.len()
    }

    /// True iff every non-empty group has at least `k` members.
    pub fn is_well_formed(&self) -> bool {
        self.groups.iter().all(|g| g.is_empty() || g.len() >= self.k)
    }

    /// Group number of every record, or `None` for records in no group.
    pub fn assignments(&self) -> Vec<Option<usize>> {
        let mut out = vec![None; self.dataset.len()];
        for (g, members) in self.groups.iter().enumerate() {
            for &r in members {
                out[r] = Some(g);
            }
        }
        out
    }
}

impl fmt::Display for Partition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-- partition (k = {}) --", self.k)?;
        for members in &self.groups {
            for &r in members {
                let values: Vec<String> = self
                    .dataset
                    .record(r)
                    .values()
                    .iter()
                    .map(f64::to_string)
                    .collect();
                writeln!(f, "{r}: {}", values.join(", "))?;
            }
            writeln!(f, "---------------")?;
        }
        Ok(())
    }
}
