//! Run configuration, loadable from TOML.
//!
//! ```toml
//! method = "hybrid"
//! k = 5
//! seed = 42
//! quasi_identifiers = ["age", "zip"]
//! confidential = ["income"]
//! predictors = ["age"]
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::Dataset;
use crate::error::{Result, SdcError};
use crate::partitioning::mdav::DEFAULT_PROGRESS_INTERVAL;
use crate::replace::DEFAULT_MAX_ATTEMPTS;

/// End-to-end protection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// MDAV on the quasi-identifiers, then centroid substitution.
    #[default]
    Centroid,
    /// MDAV on the quasi-identifiers, then rank swapping within groups.
    Swap,
    /// Per confidential attribute: one-column MDAV, then swapping within groups.
    #[serde(alias = "confidential-swap")]
    ConfidentialSwap,
    /// MDAV on all non-identifiers, then hybrid synthesis of confidential responses.
    Hybrid,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Centroid => "centroid",
            Method::Swap => "swap",
            Method::ConfidentialSwap => "confidential-swap",
            Method::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = SdcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "centroid" | "mdav" => Ok(Method::Centroid),
            "swap" => Ok(Method::Swap),
            "confidential-swap" => Ok(Method::ConfidentialSwap),
            "hybrid" | "microhybrid" => Ok(Method::Hybrid),
            other => Err(SdcError::Config(format!("unknown method '{other}'"))),
        }
    }
}

/// Parameters of one microaggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MicroaggregationConfig {
    pub method: Method,
    /// Minimum group size.
    pub k: usize,
    /// Seed for the randomized methods; drawn from entropy when absent.
    pub seed: Option<u64>,
    /// Attribute names to mark as quasi-identifiers.
    pub quasi_identifiers: Vec<String>,
    /// Attribute names to mark as confidential.
    pub confidential: Vec<String>,
    /// Attribute names to mark as predictors (all others become responses).
    pub predictors: Vec<String>,
    /// Hybrid synthesis: draws per value before keeping the original.
    pub max_attempts: usize,
    /// MDAV progress logging interval in records (0 disables).
    pub progress_interval: usize,
}

impl Default for MicroaggregationConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            k: 3,
            seed: None,
            quasi_identifiers: Vec::new(),
            confidential: Vec::new(),
            predictors: Vec::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl MicroaggregationConfig {
    pub fn new(method: Method, k: usize) -> Self {
        Self {
            method,
            k,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SdcError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.k < 2 {
            return Err(SdcError::InvalidK { k: self.k });
        }
        if self.max_attempts == 0 {
            return Err(SdcError::Config("max_attempts must be positive".to_string()));
        }
        Ok(())
    }

    /// Apply the named attribute designations to `dataset`.
    pub fn designate(&self, dataset: &mut Dataset) -> Result<()> {
        dataset.set_quasi_identifiers(self.quasi_identifiers.as_slice())?;
        dataset.set_confidential(self.confidential.as_slice())?;
        if !self.predictors.is_empty() {
            dataset.set_predictors(self.predictors.as_slice())?;
        }
        Ok(())
    }
}
