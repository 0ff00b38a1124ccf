//! microagg: statistical disclosure control for numeric microdata.
//!
//! Transforms a dataset so individual records cannot be re-identified while
//! means, variances and covariances stay close to the original.
//!
//! - `distance`: variance-normalized (SSE) distance between records
//! - `partitioning/`: the [`Partition`] structure and the [`Mdav`] heuristic
//! - `replace/`: strategies rewriting records group by group (centroids,
//!   rank swapping, confidential swapping, hybrid synthesis)
//! - `pipeline`: configured end-to-end runs
//!
//! ```no_run
//! use microagg::data::{Attribute, Dataset};
//! use microagg::replace::{CentroidSubstitution, GroupReplacer};
//! use microagg::Mdav;
//!
//! let ds = Dataset::from_rows(
//!     vec![Attribute::quasi_identifier("age"), Attribute::confidential("income")],
//!     vec![vec![23.0, 1800.0], vec![25.0, 2100.0], vec![61.0, 900.0], vec![64.0, 1200.0]],
//! )?;
//! let qi = ds.quasi_identifier_dataset()?;
//! let partition = Mdav::new(2)?.partition(&qi)?;
//! let protected = CentroidSubstitution::new().replace(&ds, &partition)?;
//! # Ok::<(), microagg::SdcError>(())
//! ```
//!
//! # Critical Nuances
//!
//! ## Which attributes drive the clustering
//!
//! Distances are normalized by the variances of the dataset handed to
//! [`Mdav::partition`]. Pass the projection onto the attributes that should
//! define similarity (usually the quasi-identifiers): identifiers such as row
//! numbers would otherwise dominate the grouping.
//!
//! ## Group sizes
//!
//! With `n >= k` records every MDAV group has between k and 2k-1 members. With
//! `n < 2k` that is a single group of all records; `n < k` is an error rather
//! than an undersized group.
//!
//! ## Randomness
//!
//! Every randomized operation takes the RNG as a parameter. Seed a
//! `rand::rngs::StdRng` for reproducible output.

pub mod config;
pub mod data;
pub mod distance;
pub mod distortion;
pub mod error;
pub mod io;
pub mod metrics;
pub mod partitioning;
pub mod pipeline;
pub mod replace;

// Re-exports
pub use config::{Method, MicroaggregationConfig};
pub use data::{Attribute, Dataset, Record};
pub use distance::{scalar_distance, sse_distance, DistanceMetric};
pub use error::{Result, SdcError};
pub use partitioning::{Mdav, Partition};
pub use pipeline::Microaggregator;
pub use replace::GroupReplacer;
