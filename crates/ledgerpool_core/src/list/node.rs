//! List node stored in memory-resource storage.

use std::alloc::Layout;
use std::ptr::NonNull;

/// Link to a neighbouring node; `None` is the end sentinel.
pub(crate) type Link<T> = Option<NonNull<Node<T>>>;

/// A value plus its two non-owning neighbour links.
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) prev: Link<T>,
    pub(crate) next: Link<T>,
}

impl<T> Node<T> {
    #[inline]
    pub(crate) const fn new(value: T) -> Self {
        Self {
            value,
            prev: None,
            next: None,
        }
    }

    /// Size and alignment requested from the memory resource per node.
    #[inline]
    pub(crate) const fn layout() -> Layout {
        Layout::new::<Self>()
    }
}
