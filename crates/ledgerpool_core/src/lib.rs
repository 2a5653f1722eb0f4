//! # LEDGERPOOL Core
//!
//! A fixed-capacity memory pool and a doubly-linked list that lives in it:
//! - One buffer, allocated once, released once
//! - A ledger of every region the pool has issued
//! - First-fit reuse of freed regions, never split or merged
//!
//! ## Architecture Rules
//!
//! 1. **The pool is a leaf** - it never calls back into its users
//! 2. **The list borrows the pool** - the pool must outlive every list
//! 3. **Single-threaded** - no locks, no atomics
//!
//! ## Example
//!
//! ```rust
//! use ledgerpool_core::{List, Pool};
//!
//! let pool = Pool::new(4096);
//! let mut list = List::new(&pool);
//!
//! list.push_back(10)?;
//! let used = pool.used_bytes();
//! list.pop_back()?;
//!
//! assert!(list.is_empty());
//! assert_eq!(pool.region_count(), 1);
//! assert_eq!(pool.used_bytes(), used);
//! # Ok::<(), ledgerpool_core::PoolError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod list;
pub mod memory;

pub use config::PoolConfig;
pub use error::{PoolError, PoolResult};
pub use list::{Cursor, CursorMut, IntoIter, Iter, IterMut, List};
pub use memory::{LedgerReport, MemoryResource, Pool, Region};
