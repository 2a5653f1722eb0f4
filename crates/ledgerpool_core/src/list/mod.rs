//! # Pool-Backed List
//!
//! A doubly-linked list whose nodes are carved from a [`MemoryResource`]
//! (normally a [`Pool`](crate::memory::Pool)).
//!
//! ## Ownership
//!
//! ```text
//! Pool   owns the bytes:   [ node 0 ][ node 1 ][ free ][ node 2 ] ...
//! List   owns the values:  head -> node 0 <-> node 1 <-> node 2 <- tail
//! ```
//!
//! Pushing requests one node-sized region; popping moves the value out and
//! marks the region free on the pool ledger.
//!
//! [`MemoryResource`]: crate::memory::MemoryResource

mod cursor;
mod iter;
mod linked_list;
mod node;

pub use cursor::{Cursor, CursorMut};
pub use iter::{IntoIter, Iter, IterMut};
pub use linked_list::List;
