//! MDAV: Maximum Distance to Average Vector.
//!
//! # Intuition
//!
//! Optimal k-partitioning (minimum within-group SSE with every group of size at
//! least k) is NP-hard. MDAV is the standard greedy approximation: repeatedly
//! take the record farthest from the centre of what is left, and the record
//! farthest from *that* one. These two extremes sit on opposite edges of the
//! remaining cloud, so grouping each with its k-1 nearest neighbours peels
//! compact groups off the boundary and moves inwards.
//!
//! # Algorithm
//!
//! ```text
//! while |U| >= 3k:
//!     c  = mean(U)
//!     xr = argmax_{x in U} d(x, c)
//!     xs = argmax_{x in U \ xr} d(x, xr)
//!     emit {xr} ∪ knn(xr, k-1)    (removed from U)
//!     emit {xs} ∪ knn(xs, k-1)    (removed from U)
//! if 2k <= |U| <= 3k-1:
//!     r  = argmax_{x in U} d(x, mean(U))
//!     emit {r} ∪ knn(r, k-1)
//! emit U (if non-empty)
//! ```
//!
//! Every iteration removes at least k records, so the loop terminates. With
//! `n >= k` every emitted group has between k and 2k-1 members.
//!
//! # Determinism
//!
//! Ties are broken by record index (first found wins for the extremes, lower
//! index first among equidistant neighbours), so a partition is a pure function
//! of the dataset and k.
//!
//! # References
//!
//! - Domingo-Ferrer & Torra (2005). "Ordinal, Continuous and Heterogeneous
//!   k-Anonymity Through Microaggregation."

use tracing::{debug, info};

use super::partition::Partition;
use crate::data::Dataset;
use crate::distance::DistanceMetric;
use crate::error::{Result, SdcError};

/// Records processed between two progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// MDAV partitioning engine.
#[derive(Debug, Clone)]
pub struct Mdav {
    k: usize,
    progress_interval: usize,
}

impl Mdav {
    /// Create an engine for groups of at least `k` records.
    ///
    /// Fails for `k < 2`: a group of one record protects nothing.
    pub fn new(k: usize) -> Result<Self> {
        if k < 2 {
            return Err(SdcError::InvalidK { k });
        }
        Ok(Self {
            k,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        })
    }

    /// Log progress every `interval` processed records (0 disables it).
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Partition every record of `dataset` into groups of size `[k, 2k-1]`.
    ///
    /// Distances are normalized by the dataset's own variances, so pass the
    /// projection onto the attributes that should drive clustering.
    pub fn partition<'a>(&self, dataset: &'a Dataset) -> Result<Partition<'a>> {
        let k = self.k;
        let n = dataset.len();
        if n < k {
            return Err(SdcError::DatasetTooSmall { records: n, k });
        }

        let metric = DistanceMetric::new(dataset.variances());
        let mut partition = Partition::new(dataset, k);
        let mut unassigned = Unassigned::new(n);
        let mut processed = 0usize;

        info!(records = n, k, attributes = dataset.num_attributes(), "starting MDAV");

        while unassigned.len() >= 3 * k {
            let centre = unassigned.mean(dataset);
            let Some(xr) = farthest(dataset, &metric, &centre, &unassigned, None) else {
                break;
            };
            let Some(xs) = farthest(
                dataset,
                &metric,
                dataset.record(xr).values(),
                &unassigned,
                Some(xr),
            ) else {
                break;
            };
            unassigned.remove(xr);
            unassigned.remove(xs);

            for seed in [xr, xs] {
                let group = self.grow_group(dataset, &metric, seed, &mut unassigned)?;
                partition.add_group(group);
            }

            let before = processed;
            processed += 2 * k;
            if self.progress_interval > 0
                && processed / self.progress_interval > before / self.progress_interval
            {
                debug!(processed, total = n, "MDAV progress");
            }
        }

        let remaining = unassigned.len();
        if remaining >= 2 * k {
            let centre = unassigned.mean(dataset);
            if let Some(r) = farthest(dataset, &metric, &centre, &unassigned, None) {
                unassigned.remove(r);
                let group = self.grow_group(dataset, &metric, r, &mut unassigned)?;
                partition.add_group(group);
            }
        }
        if !unassigned.is_empty() {
            partition.add_group(unassigned.iter().collect());
        }

        info!(groups = partition.num_groups(), "MDAV finished");
        Ok(partition)
    }

    /// `seed` followed by its k-1 nearest unassigned records, which are claimed.
    fn grow_group(
        &self,
        dataset: &Dataset,
        metric: &DistanceMetric<'_>,
        seed: usize,
        unassigned: &mut Unassigned,
    ) -> Result<Vec<usize>> {
        let neighbours = nearest(dataset, metric, seed, self.k - 1, unassigned)?;
        let mut group = Vec::with_capacity(self.k);
        group.push(seed);
        group.extend(neighbours);
        Ok(group)
    }
}

/// Records not yet placed in a group.
///
/// A liveness mask plus a count: O(1) removal, scans in index order.
#[derive(Debug)]
struct Unassigned {
    live: Vec<bool>,
    count: usize,
}

impl Unassigned {
    fn new(n: usize) -> Self {
        Self {
            live: vec![true; n],
            count: n,
        }
    }

    fn len(&self) -> usize {
        self.count
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn remove(&mut self, i: usize) {
        if std::mem::replace(&mut self.live[i], false) {
            self.count -= 1;
        }
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.live
            .iter()
            .enumerate()
            .filter_map(|(i, &alive)| alive.then_some(i))
    }

    /// Attribute-wise mean of the unassigned records.
    fn mean(&self, dataset: &Dataset) -> Vec<f64> {
        let mut sums = vec![0.0; dataset.num_attributes()];
        for i in self.iter() {
            for (s, v) in sums.iter_mut().zip(dataset.record(i).values()) {
                *s += v;
            }
        }
        let count = self.count.max(1) as f64;
        sums.iter_mut().for_each(|s| *s /= count);
        sums
    }
}

/// Unassigned record farthest from `point`; the lowest index wins ties.
fn farthest(
    dataset: &Dataset,
    metric: &DistanceMetric<'_>,
    point: &[f64],
    unassigned: &Unassigned,
    exclude: Option<usize>,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for i in unassigned.iter() {
        if Some(i) == exclude {
            continue;
        }
        let d = metric.distance(point, dataset.record(i).values());
        if best.map_or(true, |(_, bd)| d > bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Claim the `num` unassigned records nearest to `seed` (ascending distance, then index).
fn nearest(
    dataset: &Dataset,
    metric: &DistanceMetric<'_>,
    seed: usize,
    num: usize,
    unassigned: &mut Unassigned,
) -> Result<Vec<usize>> {
    let available = dataset.len().saturating_sub(1);
    if num >= available {
        return Err(SdcError::TooManyNeighbours {
            requested: num,
            available,
        });
    }

    let origin = dataset.record(seed).values();
    let mut candidates: Vec<(usize, f64)> = unassigned
        .iter()
        .filter(|&i| i != seed)
        .map(|i| (i, metric.distance(origin, dataset.record(i).values())))
        .collect();
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    candidates.truncate(num);

    let picked: Vec<usize> = candidates.into_iter().map(|(i, _)| i).collect();
    for &i in &picked {
        unassigned.remove(i);
    }
    Ok(picked)
}
