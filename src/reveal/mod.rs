//! Committed tiles and the border lines drawn around them.

/// Incremental border synchronization.
pub mod border;
/// Revealed-tile ledger.
pub mod ledger;
