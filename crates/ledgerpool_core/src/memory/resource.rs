//! # Memory Resource
//!
//! The generic allocator interface that containers request storage through.

// SAFETY: Declares an unsafe trait and unsafe release methods; implementors
// and callers carry the proof obligations.
#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;

use crate::error::PoolResult;

/// A source of raw, aligned byte regions.
///
/// Containers such as [`List`](crate::list::List) borrow a resource and ask
/// it for storage, then construct their values in place.
///
/// # Safety
///
/// Implementors must guarantee that every address returned by
/// [`allocate`](MemoryResource::allocate):
///
/// - is aligned to the requested alignment,
/// - points to at least `bytes` writable bytes,
/// - does not overlap any other region that is still allocated,
/// - stays valid until it is passed back to
///   [`deallocate`](MemoryResource::deallocate) or the resource is dropped.
pub unsafe trait MemoryResource {
    /// Allocates `bytes` bytes aligned to `alignment`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is malformed or cannot be satisfied.
    fn allocate(&self, bytes: usize, alignment: usize) -> PoolResult<NonNull<u8>>;

    /// Returns a region previously obtained from [`MemoryResource::allocate`].
    ///
    /// # Errors
    ///
    /// Returns an error if `ptr` was not issued by this resource.
    ///
    /// # Safety
    ///
    /// If `ptr` names a live region of this resource, the caller must own it:
    /// it came from [`MemoryResource::allocate`] and nothing else still reads
    /// or writes through it. The caller must not use `ptr` after this call.
    unsafe fn deallocate(
        &self,
        ptr: NonNull<u8>,
        bytes: usize,
        alignment: usize,
    ) -> PoolResult<()>;

    /// Returns true if `other` is this very resource instance.
    fn is_equal(&self, other: &dyn MemoryResource) -> bool;

    /// Allocates storage for `layout`.
    ///
    /// # Errors
    ///
    /// Same as [`MemoryResource::allocate`].
    #[inline]
    fn allocate_layout(&self, layout: Layout) -> PoolResult<NonNull<u8>> {
        self.allocate(layout.size(), layout.align())
    }

    /// Returns storage obtained through [`MemoryResource::allocate_layout`].
    ///
    /// # Errors
    ///
    /// Same as [`MemoryResource::deallocate`].
    ///
    /// # Safety
    ///
    /// Same as [`MemoryResource::deallocate`].
    #[inline]
    unsafe fn deallocate_layout(&self, ptr: NonNull<u8>, layout: Layout) -> PoolResult<()> {
        // SAFETY: forwarded from the caller.
        unsafe { self.deallocate(ptr, layout.size(), layout.align()) }
    }
}

/// Address identity of two resources, ignoring vtables.
#[inline]
#[must_use]
pub(crate) fn same_instance<R: MemoryResource + ?Sized>(
    this: &R,
    other: &dyn MemoryResource,
) -> bool {
    let this = (this as *const R).cast::<()>();
    let other = (other as *const dyn MemoryResource).cast::<()>();
    this == other
}
