//! # List Cursors
//!
//! Position handles over a [`List`](super::List) with dereference, advance
//! and equality, in the style of a forward iterator.
//!
//! A [`Cursor`] is `Copy`: any number may coexist and advance independently.
//! Because it borrows the list, no push, pop or clear can happen while one
//! is alive. The end position is a sentinel shared by every cursor.

// SAFETY: Cursors hold node addresses borrowed from a live list.
#![allow(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;

use super::node::Link;

/// Read-only position in a list.
///
/// # Example
///
/// ```rust
/// use ledgerpool_core::{List, Pool};
///
/// let pool = Pool::new(1024);
/// let mut list = List::new(&pool);
/// list.try_extend([1, 2, 3])?;
///
/// let mut cursor = list.begin();
/// let mut sum = 0;
/// while cursor != list.end() {
///     sum += cursor.current().copied().unwrap_or_default();
///     cursor.advance();
/// }
/// assert_eq!(sum, 6);
/// # Ok::<(), ledgerpool_core::PoolError>(())
/// ```
pub struct Cursor<'list, T> {
    node: Link<T>,
    _list: PhantomData<&'list T>,
}

impl<'list, T> Cursor<'list, T> {
    #[inline]
    pub(crate) const fn new(node: Link<T>) -> Self {
        Self {
            node,
            _list: PhantomData,
        }
    }

    /// Returns the element under the cursor, or `None` at the end.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<&'list T> {
        // SAFETY: the node is linked into a list borrowed for 'list.
        self.node.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Returns true at the end sentinel.
    #[inline]
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Moves to the next element and returns the moved cursor.
    ///
    /// Advancing the end cursor leaves it at the end.
    #[inline]
    pub fn advance(&mut self) -> &mut Self {
        if let Some(node) = self.node {
            // SAFETY: the node is linked into a list borrowed for 'list.
            self.node = unsafe { (*node.as_ptr()).next };
        }
        self
    }

    /// Moves to the next element and returns the position before the move.
    #[inline]
    #[must_use = "use `advance` if the previous position is not needed"]
    pub fn advance_post(&mut self) -> Self {
        let previous = *self;
        self.advance();
        previous
    }

    /// Counts the steps from this cursor to `last`.
    ///
    /// Stops at the end sentinel if `last` is never reached.
    #[must_use]
    pub fn distance_to(self, last: Self) -> usize {
        let mut cursor = self;
        let mut steps = 0;
        while cursor != last && !cursor.is_end() {
            cursor.advance();
            steps += 1;
        }
        steps
    }
}

impl<T> Clone for Cursor<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Some(node) => write!(f, "Cursor({node:p})"),
            None => f.write_str("Cursor(end)"),
        }
    }
}

/// Writable position in a list.
///
/// Holds the list's unique borrow, so only one exists at a time.
pub struct CursorMut<'list, T> {
    node: Link<T>,
    _list: PhantomData<&'list mut T>,
}

impl<'list, T> CursorMut<'list, T> {
    #[inline]
    pub(crate) const fn new(node: Link<T>) -> Self {
        Self {
            node,
            _list: PhantomData,
        }
    }

    /// Returns the element under the cursor, or `None` at the end.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        // SAFETY: the node is linked into a list borrowed for 'list.
        self.node.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Returns the element under the cursor mutably, or `None` at the end.
    #[inline]
    pub fn current_mut(&mut self) -> Option<&mut T> {
        // SAFETY: the list is uniquely borrowed for 'list and this cursor
        // hands out at most one reference at a time.
        self.node.map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Returns true at the end sentinel.
    #[inline]
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Moves to the next element and returns the moved cursor.
    #[inline]
    pub fn advance(&mut self) -> &mut Self {
        if let Some(node) = self.node {
            // SAFETY: the node is linked into a list borrowed for 'list.
            self.node = unsafe { (*node.as_ptr()).next };
        }
        self
    }

    /// Returns a read-only cursor at the same position.
    #[inline]
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self.node)
    }
}

impl<T> fmt::Debug for CursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Some(node) => write!(f, "CursorMut({node:p})"),
            None => f.write_str("CursorMut(end)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{List, Pool};

    #[test]
    fn test_prefix_and_postfix() {
        let pool = Pool::new(1024);
        let mut list = List::new(&pool);
        list.try_extend([10, 20, 30]).unwrap();

        let mut it = list.begin();
        let old = it.advance_post();
        assert_eq!(old.current(), Some(&10));
        assert_eq!(it.current(), Some(&20));

        assert_eq!(it.advance().current(), Some(&30));
        it.advance();
        assert_eq!(it, list.end());
        assert!(it.is_end());
        assert_eq!(it.current(), None);

        // The end is sticky.
        it.advance();
        assert_eq!(it, list.end());
    }

    #[test]
    fn test_copies_are_independent() {
        let pool = Pool::new(1024);
        let mut list = List::new(&pool);
        list.try_extend([1, 2, 3, 4]).unwrap();

        let mut it1 = list.begin();
        let mut it2 = it1;
        assert_eq!(it1, it2);
        it2.advance().advance();
        assert_ne!(it1, it2);
        assert_eq!(it1.current(), Some(&1));
        assert_eq!(it2.current(), Some(&3));

        it1.advance();
        assert_eq!(it1.current(), Some(&2));
        assert_eq!(it2.current(), Some(&3));
    }

    #[test]
    fn test_distance() {
        let pool = Pool::new(1024);
        let mut list = List::new(&pool);
        assert_eq!(list.begin().distance_to(list.end()), 0);

        list.try_extend(1..=5).unwrap();
        assert_eq!(list.begin().distance_to(list.end()), 5);

        let mut mid = list.begin();
        mid.advance().advance();
        assert_eq!(list.begin().distance_to(mid), 2);
        assert_eq!(mid.distance_to(list.end()), 3);
    }

    #[test]
    fn test_cursor_mut_writes() {
        let pool = Pool::new(1024);
        let mut list = List::new(&pool);
        list.try_extend([1, 2, 3]).unwrap();

        let mut cursor = list.begin_mut();
        while let Some(value) = cursor.current_mut() {
            *value *= 2;
            cursor.advance();
        }
        assert!(cursor.is_end());
        assert_eq!(cursor.as_cursor().current(), None);

        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [2, 4, 6]);
    }

    #[test]
    fn test_member_access() {
        struct Point {
            x: i32,
            y: i32,
        }

        let pool = Pool::new(1024);
        let mut list = List::new(&pool);
        list.push_back(Point { x: 10, y: 20 }).unwrap();

        let it = list.begin();
        assert_eq!(it.current().map(|p| p.x), Some(10));
        assert_eq!(it.current().map(|p| p.y), Some(20));

        let mut cursor = list.begin_mut();
        if let Some(p) = cursor.current_mut() {
            p.x = 30;
        }
        assert_eq!(cursor.current().map(|p| p.x), Some(30));
    }

    #[test]
    fn test_debug() {
        let pool = Pool::new(256);
        let list: List<'_, u8> = List::new(&pool);
        assert_eq!(format!("{:?}", list.end()), "Cursor(end)");
    }
}
