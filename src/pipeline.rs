//! End-to-end protection runs: partition, then replace.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::{Method, MicroaggregationConfig};
use crate::data::Dataset;
use crate::error::Result;
use crate::partitioning::{Mdav, Partition};
use crate::replace::{
    permute_confidential, CentroidSubstitution, GroupPermutation, GroupReplacer, HybridSynthesis,
};

/// Runs one configured microaggregation method over a dataset.
#[derive(Debug, Clone)]
pub struct Microaggregator {
    config: MicroaggregationConfig,
}

impl Microaggregator {
    pub fn new(config: MicroaggregationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MicroaggregationConfig {
        &self.config
    }

    /// Protect `source` and return the perturbed copy.
    ///
    /// Attribute designations are read from `source`; see
    /// [`MicroaggregationConfig::designate`].
    pub fn run(&self, source: &Dataset) -> Result<Dataset> {
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);
        let mdav = Mdav::new(self.config.k)?.with_progress_interval(self.config.progress_interval);

        info!(
            method = %self.config.method,
            k = self.config.k,
            records = source.len(),
            "starting microaggregation"
        );

        let output = match self.config.method {
            Method::Centroid => {
                let qi = source.quasi_identifier_dataset()?;
                let partition = mdav.partition(&qi)?;
                CentroidSubstitution::new().replace(source, &partition)?
            }
            Method::Swap => {
                let qi = source.quasi_identifier_dataset()?;
                let partition = mdav.partition(&qi)?;
                GroupPermutation::new(&mut rng).replace(source, &partition)?
            }
            Method::ConfidentialSwap => permute_confidential(source, self.config.k, &mut rng)?,
            Method::Hybrid => {
                let projected = source.restrict(&source.non_identifiers())?;
                let pre_tagged =
                    !projected.is_empty() && projected.records().iter().all(|r| r.group_id().is_some());
                let partition = if pre_tagged {
                    Partition::from_group_tags(&projected, self.config.k)?
                } else {
                    mdav.partition(&projected)?
                };
                HybridSynthesis::new(&mut rng)
                    .with_max_attempts(self.config.max_attempts)
                    .replace(source, &partition)?
            }
        };

        info!(method = %self.config.method, "microaggregation finished");
        Ok(output)
    }
}
