//! Error type shared by every fallible table operation

use thiserror::Error;

/// Failures surfaced by [`Table`](crate::Table) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The slot array for a new capacity could not be allocated.
    #[error("failed to allocate storage for {slots} slots")]
    Allocation {
        /// Number of slots that was requested
        slots: usize,
    },
    /// A probe walk visited every slot without finding an empty one.
    #[error("probe sequence exhausted all {capacity} slots without finding an empty one")]
    ProbeExhausted {
        /// Capacity of the table at the time of the walk
        capacity: usize,
    },
    /// A [`TableConfig`](crate::TableConfig) violates its constraints.
    #[error("invalid table configuration: {0}")]
    InvalidConfig(&'static str),
}
