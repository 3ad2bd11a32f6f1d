// SPDX-License-Identifier: MIT OR Apache-2.0
//! Crate-wide error types.
//!
//! Precondition violations (an invalid octant, an out-of-range index, resizing an
//! array that isn't resizable, ...) are programmer errors and abort via `assert!`/
//! `panic!` rather than being threaded through [`Result`]. The error type here exists
//! for the three kinds of failure that a caller can reasonably recover from: a leaked
//! reference observed at drop, a backing-store failure, and a collective-transport
//! failure.

use thiserror::Error;

/// Errors a caller of this crate may need to handle, as opposed to a precondition
/// violation (which panics; see the module documentation).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ForestError {
    /// A [`DynArray`](crate::array::DynArray) was dropped with references still
    /// outstanding, or the backing allocator reported a mismatched free.
    ///
    /// This is reported rather than silently ignored so that tests can assert its
    /// absence, per the leak-detection discipline described in the crate's design
    /// notes.
    #[error("leaked reference: {0}")]
    Leak(String),

    /// The backing store for a [`DynArray`](crate::array::DynArray) could not supply
    /// the requested capacity.
    #[error("allocation of {requested} elements failed")]
    Alloc {
        /// The element count that could not be allocated.
        requested: usize,
    },

    /// A [`ReduceGroup`](crate::reduce::ReduceGroup) transport call failed.
    #[error("reduction transport failure: {0}")]
    Protocol(String),
}

/// Convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, ForestError>;
