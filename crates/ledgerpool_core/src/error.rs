//! # Error Types
//!
//! All errors that can occur in the pool allocator and the pool-backed list.

use thiserror::Error;

/// Errors that can occur while allocating from a pool or using a list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The pool has no free region that fits and the tail is exhausted.
    #[error("out of memory: requested {requested} bytes, {available} bytes left at the tail")]
    OutOfMemory {
        /// Bytes asked for.
        requested: usize,
        /// Bytes still unclaimed at the tail of the pool.
        available: usize,
    },

    /// The address was never issued by this pool, or is already free.
    #[error("pointer {0:#x} was not allocated by this memory resource")]
    InvalidPointer(usize),

    /// Pop, front or back on an empty list.
    #[error("container is empty")]
    EmptyContainer,

    /// Allocation request for zero bytes.
    #[error("zero-sized allocation requested")]
    ZeroSizedAllocation,

    /// Alignment is not a power of two.
    #[error("alignment {0} is not a power of two")]
    InvalidAlignment(usize),

    /// Invalid configuration file or pool parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for pool and list operations.
pub type PoolResult<T> = Result<T, PoolError>;
