//! Outdated report construction
//!
//! - `filter`: include/exclude filters on direct dependency names
//! - `aggregator`: classify every node and fold attention upward

mod aggregator;
mod filter;

pub use aggregator::{Lookups, ReportAggregator, ReportOptions};
pub use filter::PackageFilter;
