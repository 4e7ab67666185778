//! Statistics computation.

pub mod aggregator;

pub use aggregator::*;
