//! Grouping records into clusters of bounded size.
//!
//! - [`Partition`]: disjoint groups of record indices over one dataset.
//! - [`Mdav`]: the MDAV greedy heuristic producing groups of size `[k, 2k-1]`.

pub mod mdav;
pub mod partition;

pub use mdav::Mdav;
pub use partition::Partition;
