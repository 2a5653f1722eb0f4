//! Standard iterators over a [`List`].

// SAFETY: Iterators walk node addresses of a list they borrow or own.
#![allow(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::linked_list::List;
use super::node::Link;
use crate::memory::MemoryResource;

/// Borrowing iterator, front to back. Created by [`List::iter`].
pub struct Iter<'list, T> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    _list: PhantomData<&'list T>,
}

impl<T> Iter<'_, T> {
    #[inline]
    pub(crate) const fn new(head: Link<T>, tail: Link<T>, len: usize) -> Self {
        Self {
            head,
            tail,
            len,
            _list: PhantomData,
        }
    }
}

impl<'list, T> Iterator for Iter<'list, T> {
    type Item = &'list T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.head.map(|node| {
            // SAFETY: `len > 0`, so `node` is linked into the borrowed list.
            let node = unsafe { &*node.as_ptr() };
            self.len -= 1;
            self.head = node.next;
            &node.value
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.tail.map(|node| {
            // SAFETY: `len > 0`, so `node` is linked into the borrowed list.
            let node = unsafe { &*node.as_ptr() };
            self.len -= 1;
            self.tail = node.prev;
            &node.value
        })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        Self::new(self.head, self.tail, self.len)
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Mutably borrowing iterator, front to back. Created by [`List::iter_mut`].
pub struct IterMut<'list, T> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    _list: PhantomData<&'list mut T>,
}

impl<T> IterMut<'_, T> {
    #[inline]
    pub(crate) const fn new(head: Link<T>, tail: Link<T>, len: usize) -> Self {
        Self {
            head,
            tail,
            len,
            _list: PhantomData,
        }
    }
}

impl<'list, T> Iterator for IterMut<'list, T> {
    type Item = &'list mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.head.map(|node| {
            // SAFETY: `len > 0`, so `node` is linked into the uniquely
            // borrowed list and has not been yielded yet.
            let node = unsafe { &mut *node.as_ptr() };
            self.len -= 1;
            self.head = node.next;
            &mut node.value
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.tail.map(|node| {
            // SAFETY: see `next`.
            let node = unsafe { &mut *node.as_ptr() };
            self.len -= 1;
            self.tail = node.prev;
            &mut node.value
        })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator. Each step pops a node and returns its region to the pool.
///
/// A region the resource refuses to take back is logged and the value is
/// still yielded, so the iterator visits every element exactly once.
pub struct IntoIter<'pool, T, R: MemoryResource + ?Sized> {
    list: List<'pool, T, R>,
}

impl<'pool, T, R: MemoryResource + ?Sized> IntoIter<'pool, T, R> {
    #[inline]
    pub(crate) fn new(list: List<'pool, T, R>) -> Self {
        Self { list }
    }
}

impl<T, R: MemoryResource + ?Sized> Iterator for IntoIter<'_, T, R> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        let (value, released) = self.list.take_front()?;
        if let Err(err) = released {
            tracing::warn!("Failed to release list node: {}", err);
        }
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T, R: MemoryResource + ?Sized> DoubleEndedIterator for IntoIter<'_, T, R> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        let (value, released) = self.list.take_back()?;
        if let Err(err) = released {
            tracing::warn!("Failed to release list node: {}", err);
        }
        Some(value)
    }
}

impl<T, R: MemoryResource + ?Sized> ExactSizeIterator for IntoIter<'_, T, R> {}

impl<T, R: MemoryResource + ?Sized> FusedIterator for IntoIter<'_, T, R> {}
