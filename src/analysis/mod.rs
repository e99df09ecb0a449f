//! Analysis modules.
//!
//! Derives dashboard statistics from fetched GitHub records.

pub mod aggregator;

pub use aggregator::*;
