//! # Memory Management
//!
//! A fixed-capacity pool and the allocator interface it implements.
//!
//! ## Design Philosophy
//!
//! The pool buffer is allocated once, up front. After that:
//! - Requests are carved from that buffer only
//! - Every issued region is recorded on the ledger
//! - Freed regions are reused as-is, never merged or split

mod pool;
mod region;
mod resource;

pub use pool::Pool;
pub use region::{LedgerReport, Region};
pub use resource::MemoryResource;
