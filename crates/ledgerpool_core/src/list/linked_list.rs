//! # Pool-Backed Doubly-Linked List
//!
//! Every node lives in a region obtained from a [`MemoryResource`]. The list
//! constructs and destroys values in place; the resource owns the bytes.

// SAFETY: Nodes are raw pool regions linked by address.
// Every unsafe block touches only nodes currently linked into this list.
#![allow(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use super::cursor::{Cursor, CursorMut};
use super::iter::{IntoIter, Iter, IterMut};
use super::node::{Link, Node};
use crate::error::{PoolError, PoolResult};
use crate::memory::{MemoryResource, Pool};

/// A doubly-linked list whose nodes are allocated from a borrowed pool.
///
/// The pool must outlive the list; the borrow checker enforces this through
/// the `'pool` lifetime. Several lists may share one pool.
///
/// # Panics
///
/// A [`Pool`] reuses a freed region without shrinking it and insists on the
/// recorded size at release. Lists sharing a pool should therefore hold
/// elements of one node size: if a `List<u64>` takes over a region freed by
/// a `List<[u64; 4]>`, popping that node panics.
///
/// # Thread Safety
///
/// Single-threaded only. The list is neither `Send` nor `Sync`.
///
/// # Example
///
/// ```rust
/// use ledgerpool_core::{List, Pool};
///
/// let pool = Pool::new(4096);
/// let mut list = List::new(&pool);
///
/// list.push_back(2)?;
/// list.push_front(1)?;
/// list.push_back(3)?;
///
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
/// assert_eq!(list.pop_front()?, 1);
/// assert_eq!(list.len(), 2);
/// # Ok::<(), ledgerpool_core::PoolError>(())
/// ```
pub struct List<'pool, T, R: MemoryResource + ?Sized = Pool> {
    /// Source of node storage.
    resource: &'pool R,
    /// First node, or the end sentinel.
    head: Link<T>,
    /// Last node, or the end sentinel.
    tail: Link<T>,
    /// Number of linked nodes.
    len: usize,
    /// The list owns its values.
    _owns: PhantomData<T>,
}

impl<'pool, T, R: MemoryResource + ?Sized> List<'pool, T, R> {
    /// Creates an empty list drawing node storage from `resource`.
    #[inline]
    #[must_use]
    pub fn new(resource: &'pool R) -> Self {
        Self {
            resource,
            head: None,
            tail: None,
            len: 0,
            _owns: PhantomData,
        }
    }

    /// Returns the memory resource backing this list.
    #[inline]
    #[must_use]
    pub fn resource(&self) -> &'pool R {
        self.resource
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list has no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `value` at the back.
    ///
    /// # Errors
    ///
    /// Propagates the resource error (typically [`PoolError::OutOfMemory`]);
    /// the list is unchanged and `value` is dropped.
    pub fn push_back(&mut self, value: T) -> PoolResult<()> {
        let node = self.alloc_node(value)?;

        // SAFETY: `node` is freshly written; `tail` is linked into this list.
        unsafe {
            (*node.as_ptr()).prev = self.tail;
            match self.tail {
                Some(tail) => (*tail.as_ptr()).next = Some(node),
                None => self.head = Some(node),
            }
        }

        self.tail = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Inserts `value` at the front.
    ///
    /// # Errors
    ///
    /// Same as [`List::push_back`].
    pub fn push_front(&mut self, value: T) -> PoolResult<()> {
        let node = self.alloc_node(value)?;

        // SAFETY: `node` is freshly written; `head` is linked into this list.
        unsafe {
            (*node.as_ptr()).next = self.head;
            match self.head {
                Some(head) => (*head.as_ptr()).prev = Some(node),
                None => self.tail = Some(node),
            }
        }

        self.head = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the last element.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::EmptyContainer`] if the list is empty. If the
    /// resource refuses the node region, the node is still unlinked and the
    /// value dropped before the error is returned.
    ///
    /// # Panics
    ///
    /// With a [`Pool`], panics if the node sits in a reused region that was
    /// first carved with a different size. See the type docs.
    pub fn pop_back(&mut self) -> PoolResult<T> {
        let (value, released) = self.take_back().ok_or(PoolError::EmptyContainer)?;
        released?;
        Ok(value)
    }

    /// Removes and returns the first element.
    ///
    /// # Errors
    ///
    /// Same as [`List::pop_back`].
    ///
    /// # Panics
    ///
    /// Same as [`List::pop_back`].
    pub fn pop_front(&mut self) -> PoolResult<T> {
        let (value, released) = self.take_front().ok_or(PoolError::EmptyContainer)?;
        released?;
        Ok(value)
    }

    /// Unlinks the tail and moves its value out. The release result is
    /// returned next to the value so callers can decide whether to keep it.
    pub(crate) fn take_back(&mut self) -> Option<(T, PoolResult<()>)> {
        let node = self.tail?;

        // SAFETY: `node` is the linked tail; reading moves the value out and
        // the region is released below without being read again.
        let Node { value, prev, .. } = unsafe { node.as_ptr().read() };

        self.tail = prev;
        match prev {
            // SAFETY: `prev` is linked into this list.
            Some(prev) => unsafe { (*prev.as_ptr()).next = None },
            None => self.head = None,
        }
        self.len -= 1;

        Some((value, self.release_node(node)))
    }

    /// Unlinks the head and moves its value out. See [`List::take_back`].
    pub(crate) fn take_front(&mut self) -> Option<(T, PoolResult<()>)> {
        let node = self.head?;

        // SAFETY: `node` is the linked head; see take_back.
        let Node { value, next, .. } = unsafe { node.as_ptr().read() };

        self.head = next;
        match next {
            // SAFETY: `next` is linked into this list.
            Some(next) => unsafe { (*next.as_ptr()).prev = None },
            None => self.tail = None,
        }
        self.len -= 1;

        Some((value, self.release_node(node)))
    }

    /// Removes every element, returning all node regions to the resource.
    pub fn clear(&mut self) {
        while !self.is_empty() {
            if let Err(err) = self.pop_front() {
                tracing::warn!("Failed to release list node: {}", err);
            }
        }
    }

    /// Returns the first element.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::EmptyContainer`] if the list is empty.
    pub fn front(&self) -> PoolResult<&T> {
        self.begin().current().ok_or(PoolError::EmptyContainer)
    }

    /// Returns the last element.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::EmptyContainer`] if the list is empty.
    pub fn back(&self) -> PoolResult<&T> {
        // SAFETY: `tail` is linked into this list, which we borrow.
        self.tail
            .map(|node| unsafe { &(*node.as_ptr()).value })
            .ok_or(PoolError::EmptyContainer)
    }

    /// Returns the first element mutably.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::EmptyContainer`] if the list is empty.
    pub fn front_mut(&mut self) -> PoolResult<&mut T> {
        // SAFETY: `head` is linked into this list, which we borrow mutably.
        self.head
            .map(|node| unsafe { &mut (*node.as_ptr()).value })
            .ok_or(PoolError::EmptyContainer)
    }

    /// Returns the last element mutably.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::EmptyContainer`] if the list is empty.
    pub fn back_mut(&mut self) -> PoolResult<&mut T> {
        // SAFETY: `tail` is linked into this list, which we borrow mutably.
        self.tail
            .map(|node| unsafe { &mut (*node.as_ptr()).value })
            .ok_or(PoolError::EmptyContainer)
    }

    /// Returns true if some element equals `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    /// Appends every item of `iter`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first push error. Items pushed before it stay in the list.
    pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> PoolResult<()> {
        for value in iter {
            self.push_back(value)?;
        }
        Ok(())
    }

    /// Returns a cursor at the first element, or the end cursor if empty.
    #[inline]
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.head)
    }

    /// Returns the end sentinel cursor.
    #[inline]
    #[must_use]
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(None)
    }

    /// Returns a writable cursor at the first element.
    #[inline]
    #[must_use]
    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self.head)
    }

    /// Iterates front to back.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.head, self.tail, self.len)
    }

    /// Iterates front to back with mutable access.
    #[inline]
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.head, self.tail, self.len)
    }

    fn alloc_node(&self, value: T) -> PoolResult<NonNull<Node<T>>> {
        let node = self
            .resource
            .allocate_layout(Node::<T>::layout())?
            .cast::<Node<T>>();

        // SAFETY: the resource contract guarantees an exclusive, aligned
        // region of at least size_of::<Node<T>>() bytes.
        unsafe { node.as_ptr().write(Node::new(value)) };
        Ok(node)
    }

    /// `node` must already be unlinked with its value moved out.
    fn release_node(&self, node: NonNull<Node<T>>) -> PoolResult<()> {
        // SAFETY: `node` came from `alloc_node` on this resource and no
        // link or cursor of this list reaches it any more.
        unsafe {
            self.resource
                .deallocate_layout(node.cast::<u8>(), Node::<T>::layout())
        }
    }
}

impl<T, R: MemoryResource + ?Sized> Drop for List<'_, T, R> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug, R: MemoryResource + ?Sized> fmt::Debug for List<'_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'list, T, R: MemoryResource + ?Sized> IntoIterator for &'list List<'_, T, R> {
    type Item = &'list T;
    type IntoIter = Iter<'list, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'list, T, R: MemoryResource + ?Sized> IntoIterator for &'list mut List<'_, T, R> {
    type Item = &'list mut T;
    type IntoIter = IterMut<'list, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<'pool, T, R: MemoryResource + ?Sized> IntoIterator for List<'pool, T, R> {
    type Item = T;
    type IntoIter = IntoIter<'pool, T, R>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}
