//! Lists over memory resources other than a bare `Pool`.

use std::cell::Cell;
use std::ptr::NonNull;

use ledgerpool_core::{List, MemoryResource, Pool, PoolError, PoolResult};

/// Forwards to a pool and counts calls.
struct CountingResource<'a> {
    inner: &'a Pool,
    allocations: Cell<usize>,
    deallocations: Cell<usize>,
}

impl<'a> CountingResource<'a> {
    fn new(inner: &'a Pool) -> Self {
        Self {
            inner,
            allocations: Cell::new(0),
            deallocations: Cell::new(0),
        }
    }
}

// SAFETY: every call is forwarded unchanged to a Pool.
#[allow(unsafe_code)]
unsafe impl MemoryResource for CountingResource<'_> {
    fn allocate(&self, bytes: usize, alignment: usize) -> PoolResult<NonNull<u8>> {
        self.allocations.set(self.allocations.get() + 1);
        self.inner.allocate(bytes, alignment)
    }

    unsafe fn deallocate(
        &self,
        ptr: NonNull<u8>,
        bytes: usize,
        alignment: usize,
    ) -> PoolResult<()> {
        self.deallocations.set(self.deallocations.get() + 1);
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.deallocate(ptr, bytes, alignment) }
    }

    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        std::ptr::eq(
            (self as *const Self).cast::<()>(),
            (other as *const dyn MemoryResource).cast::<()>(),
        )
    }
}

/// Refuses every request.
struct Exhausted;

// SAFETY: never hands out memory.
#[allow(unsafe_code)]
unsafe impl MemoryResource for Exhausted {
    fn allocate(&self, bytes: usize, _alignment: usize) -> PoolResult<NonNull<u8>> {
        Err(PoolError::OutOfMemory {
            requested: bytes,
            available: 0,
        })
    }

    unsafe fn deallocate(
        &self,
        ptr: NonNull<u8>,
        _bytes: usize,
        _alignment: usize,
    ) -> PoolResult<()> {
        Err(PoolError::InvalidPointer(ptr.as_ptr() as usize))
    }

    fn is_equal(&self, _other: &dyn MemoryResource) -> bool {
        false
    }
}

/// Forwards to a pool but refuses the release numbered `fail_at` (from 1).
struct FlakyRelease<'a> {
    inner: &'a Pool,
    releases: Cell<usize>,
    fail_at: usize,
}

impl<'a> FlakyRelease<'a> {
    fn new(inner: &'a Pool, fail_at: usize) -> Self {
        Self {
            inner,
            releases: Cell::new(0),
            fail_at,
        }
    }
}

// SAFETY: allocation is forwarded unchanged; a refused release leaves the
// region allocated in the pool.
#[allow(unsafe_code)]
unsafe impl MemoryResource for FlakyRelease<'_> {
    fn allocate(&self, bytes: usize, alignment: usize) -> PoolResult<NonNull<u8>> {
        self.inner.allocate(bytes, alignment)
    }

    unsafe fn deallocate(
        &self,
        ptr: NonNull<u8>,
        bytes: usize,
        alignment: usize,
    ) -> PoolResult<()> {
        self.releases.set(self.releases.get() + 1);
        if self.releases.get() == self.fail_at {
            return Err(PoolError::InvalidPointer(ptr.as_ptr() as usize));
        }
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.deallocate(ptr, bytes, alignment) }
    }

    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        self.inner.is_equal(other)
    }
}

#[test]
fn test_list_over_custom_resource() {
    let pool = Pool::new(4096);
    let counting = CountingResource::new(&pool);
    {
        let mut list = List::new(&counting);
        list.try_extend(1..=4).unwrap();
        assert_eq!(list.pop_front().unwrap(), 1);
        assert_eq!(counting.allocations.get(), 4);
        assert_eq!(counting.deallocations.get(), 1);
    }
    // Drop released the remaining three nodes.
    assert_eq!(counting.deallocations.get(), 4);
    assert_eq!(pool.live_regions(), 0);
    assert!(counting.is_equal(&counting));
    assert!(!counting.is_equal(&pool));
}

#[test]
fn test_list_over_dyn_resource() {
    let pool = Pool::new(4096);
    let resource: &(dyn MemoryResource + 'static) = &pool;
    let mut list: List<'_, &str, dyn MemoryResource> = List::new(resource);

    list.push_back("b").unwrap();
    list.push_front("a").unwrap();
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["a", "b"]);
    assert!(list.resource().is_equal(&pool));
    assert!(pool.is_equal(list.resource()));
}

#[test]
fn test_push_failure_propagates() {
    let resource = Exhausted;
    let mut list = List::new(&resource);

    assert_eq!(
        list.push_back(String::from("lost")),
        Err(PoolError::OutOfMemory {
            requested: std::mem::size_of::<String>() + 2 * std::mem::size_of::<usize>(),
            available: 0
        })
    );
    assert!(list.is_empty());
    assert_eq!(list.front(), Err(PoolError::EmptyContainer));
}

#[test]
#[allow(unsafe_code)]
fn test_layout_helpers() {
    let pool = Pool::new(256);
    let layout = std::alloc::Layout::new::<[u32; 4]>();
    let ptr = pool.allocate_layout(layout).unwrap();
    assert_eq!(ptr.as_ptr() as usize % layout.align(), 0);
    // SAFETY: `ptr` is not used again.
    unsafe { pool.deallocate_layout(ptr, layout).unwrap() };
    assert_eq!(pool.live_regions(), 0);
}

#[test]
fn test_into_iter_yields_every_value_when_release_fails() {
    let pool = Pool::new(4096);
    let resource = FlakyRelease::new(&pool, 2);
    let mut list = List::new(&resource);
    list.try_extend([1, 2, 3]).unwrap();

    let mut it = list.into_iter();
    assert_eq!(it.next(), Some(1));
    assert_eq!(it.len(), 2);
    // The second release is refused; the value still comes out.
    assert_eq!(it.next(), Some(2));
    assert_eq!(it.len(), 1);
    assert_eq!(it.next(), Some(3));
    assert_eq!(it.len(), 0);
    assert_eq!(it.next(), None);
    assert_eq!(it.next(), None);
    drop(it);

    assert_eq!(resource.releases.get(), 3);
    // Only the refused region is still held.
    assert_eq!(pool.live_regions(), 1);
}

#[test]
fn test_into_iter_from_back_when_release_fails() {
    let pool = Pool::new(4096);
    let resource = FlakyRelease::new(&pool, 1);
    let mut list = List::new(&resource);
    list.try_extend([1, 2, 3]).unwrap();

    let values: Vec<i32> = list.into_iter().rev().collect();
    assert_eq!(values, [3, 2, 1]);
}

#[test]
fn test_pop_reports_refused_release() {
    let pool = Pool::new(4096);
    let resource = FlakyRelease::new(&pool, 1);
    let mut list = List::new(&resource);
    list.try_extend([1, 2]).unwrap();

    assert_eq!(list.pop_front(), Err(PoolError::InvalidPointer(pool.regions()[0].addr())));
    assert_eq!(list.len(), 1);
    assert_eq!(list.pop_front(), Ok(2));
}
