//! Window-manager state → display model projection.

pub mod aggregator;
pub mod natural;

pub use aggregator::StatusAggregator;
pub use natural::natural_cmp;
