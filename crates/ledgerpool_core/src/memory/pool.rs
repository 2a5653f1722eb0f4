//! # Pool Allocator
//!
//! Fixed-capacity byte pool that hands out aligned regions and keeps a
//! ledger of everything it has issued.

// SAFETY: This module owns a raw heap buffer.
// Unsafe is limited to allocating, addressing and releasing that buffer.
#![allow(unsafe_code)]

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::cell::RefCell;
use std::ptr::NonNull;

use super::region::{LedgerReport, Region};
use super::resource::{same_instance, MemoryResource};
use crate::config::{PoolConfig, DEFAULT_POOL_SIZE};
use crate::error::{PoolError, PoolResult};

/// A fixed-capacity memory pool with a region ledger.
///
/// The whole buffer is allocated once at construction and released once on
/// drop. Requests are served first-fit from previously freed regions, then
/// from the tail of the buffer.
///
/// ## Policy
///
/// - A free region is reused only if it is large enough **and** its address
///   already meets the requested alignment. Regions are never split, shrunk,
///   realigned or coalesced.
/// - `used_bytes` counts every byte ever claimed from the tail, padding
///   included. Freeing a region does not lower it.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. The ledger sits behind a `RefCell` so that
/// several lists can share `&Pool` on one thread.
///
/// # Example
///
/// ```rust
/// # #![allow(unsafe_code)]
/// use ledgerpool_core::Pool;
///
/// let pool = Pool::new(4096);
/// let ptr = pool.allocate(64, 8)?;
/// assert_eq!(pool.used_bytes(), 64);
///
/// // SAFETY: `ptr` came from this pool and is not used again.
/// unsafe { pool.deallocate(ptr, 64, 8)? };
/// // Reused, no tail growth.
/// assert_eq!(pool.allocate(32, 8)?, ptr);
/// assert_eq!(pool.used_bytes(), 64);
/// # Ok::<(), ledgerpool_core::PoolError>(())
/// ```
#[derive(Debug)]
pub struct Pool {
    /// Start of the buffer.
    storage: NonNull<u8>,
    /// Layout the buffer was allocated with.
    storage_layout: Layout,
    /// Total capacity in bytes.
    pool_size: usize,
    /// Tail offset and ledger.
    state: RefCell<LedgerState>,
}

#[derive(Debug, Default)]
struct LedgerState {
    /// Bytes ever claimed from the tail.
    used_bytes: usize,
    /// Issued regions in insertion order.
    regions: Vec<Region>,
}

impl Pool {
    /// Creates a pool of `pool_size` bytes with the default base alignment.
    ///
    /// # Panics
    ///
    /// Panics if `pool_size` is zero or too large for a single allocation.
    #[must_use]
    pub fn new(pool_size: usize) -> Self {
        match Self::try_new(pool_size) {
            Ok(pool) => pool,
            Err(err) => panic!("cannot create pool: {err}"),
        }
    }

    /// Creates a pool of `pool_size` bytes with the default base alignment.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if `pool_size` is zero or too
    /// large for a single allocation.
    pub fn try_new(pool_size: usize) -> PoolResult<Self> {
        Self::with_config(&PoolConfig::with_size(pool_size))
    }

    /// Creates a pool from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the configuration is rejected.
    pub fn with_config(config: &PoolConfig) -> PoolResult<Self> {
        config.validate()?;
        let layout = Layout::from_size_align(config.pool_size, config.base_alignment)
            .map_err(|e| PoolError::InvalidConfig(e.to_string()))?;

        // SAFETY: layout has a non-zero size, checked by validate().
        let storage = unsafe {
            let ptr = alloc(layout);
            match NonNull::new(ptr) {
                Some(ptr) => ptr,
                None => handle_alloc_error(layout),
            }
        };

        tracing::debug!(
            "Pool created: {} bytes at {:p} (base alignment {})",
            config.pool_size,
            storage,
            config.base_alignment
        );

        Ok(Self {
            storage,
            storage_layout: layout,
            pool_size: config.pool_size,
            state: RefCell::new(LedgerState::default()),
        })
    }

    /// Returns the total capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.pool_size
    }

    /// Returns the bytes ever claimed from the tail.
    ///
    /// This never decreases; it does not reflect currently live bytes.
    #[inline]
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.state.borrow().used_bytes
    }

    /// Returns the bytes never claimed from the tail.
    #[inline]
    #[must_use]
    pub fn free_bytes(&self) -> usize {
        self.pool_size - self.used_bytes()
    }

    /// Returns the sum of recorded sizes of occupied regions.
    #[must_use]
    pub fn live_bytes(&self) -> usize {
        self.state
            .borrow()
            .regions
            .iter()
            .filter(|r| !r.is_free())
            .map(Region::size)
            .sum()
    }

    /// Returns the number of ledger entries.
    #[inline]
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.state.borrow().regions.len()
    }

    /// Returns the number of occupied ledger entries.
    #[must_use]
    pub fn live_regions(&self) -> usize {
        self.state.borrow().regions.iter().filter(|r| !r.is_free()).count()
    }

    /// Returns a snapshot of the ledger in insertion order.
    #[must_use]
    pub fn regions(&self) -> Vec<Region> {
        self.state.borrow().regions.clone()
    }

    /// Returns a printable dump of the ledger.
    #[must_use]
    pub fn report(&self) -> LedgerReport {
        LedgerReport::new(self.regions())
    }

    /// Emits every ledger entry as a debug event.
    pub fn log_regions(&self) {
        let state = self.state.borrow();
        for (index, region) in state.regions.iter().enumerate() {
            tracing::debug!(
                "Block {}: Address={:p}, Size={}, {}",
                index,
                region.address(),
                region.size(),
                if region.is_free() { "Free" } else { "Allocated" }
            );
        }
    }

    /// Returns true if `ptr` lies inside the pool buffer.
    #[inline]
    #[must_use]
    pub fn owns(&self, ptr: NonNull<u8>) -> bool {
        let addr = ptr.as_ptr() as usize;
        addr >= self.base_addr() && addr < self.base_addr() + self.pool_size
    }

    /// Returns true if `other` is this very pool instance.
    #[inline]
    #[must_use]
    pub fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        same_instance(self, other)
    }

    #[inline]
    fn base_addr(&self) -> usize {
        self.storage.as_ptr() as usize
    }

    /// Allocates `bytes` bytes aligned to `alignment`.
    ///
    /// Scans the ledger first-fit for a free region that is large enough
    /// and already aligned; otherwise claims `padding + bytes` from the tail.
    ///
    /// # Errors
    ///
    /// - [`PoolError::ZeroSizedAllocation`] if `bytes` is zero.
    /// - [`PoolError::InvalidAlignment`] if `alignment` is not a power of two.
    /// - [`PoolError::OutOfMemory`] if no region fits and the tail is too short.
    pub fn allocate(&self, bytes: usize, alignment: usize) -> PoolResult<NonNull<u8>> {
        if bytes == 0 {
            return Err(PoolError::ZeroSizedAllocation);
        }
        if !alignment.is_power_of_two() {
            return Err(PoolError::InvalidAlignment(alignment));
        }

        let mut state = self.state.borrow_mut();

        if let Some((index, region)) = state
            .regions
            .iter_mut()
            .enumerate()
            .find(|(_, region)| region.fits(bytes, alignment))
        {
            region.mark_occupied();
            tracing::trace!(
                "Reused block {}: {:p} ({} bytes recorded, {} requested)",
                index,
                region.address(),
                region.size(),
                bytes
            );
            return Ok(region.address());
        }

        let current = self.base_addr() + state.used_bytes;
        let claimed = current
            .checked_add(alignment - 1)
            .map(|end| (end & !(alignment - 1)) - current)
            .and_then(|padding| padding.checked_add(bytes).map(|size| (padding, size)))
            .filter(|&(_, size)| size <= self.pool_size - state.used_bytes);

        let Some((padding, size)) = claimed else {
            let available = self.pool_size - state.used_bytes;
            tracing::warn!(
                "Pool exhausted: requested {} bytes (align {}), {} bytes left",
                bytes,
                alignment,
                available
            );
            return Err(PoolError::OutOfMemory {
                requested: bytes,
                available,
            });
        };

        let offset = state.used_bytes + padding;
        // SAFETY: offset + bytes <= pool_size, so the pointer stays inside
        // the buffer and is non-null.
        let address = unsafe { NonNull::new_unchecked(self.storage.as_ptr().add(offset)) };

        state.regions.push(Region::occupied(address, bytes));
        state.used_bytes += size;

        tracing::debug!(
            "Tail block {}: {:p} ({} bytes, {} padding, {} used)",
            state.regions.len() - 1,
            address,
            bytes,
            padding,
            state.used_bytes
        );

        Ok(address)
    }

    /// Marks the region at `ptr` free.
    ///
    /// The tail offset is untouched and neighbouring free regions are not
    /// merged.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidPointer`] if `ptr` is not the address of
    /// an occupied region of this pool.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` differs from the size recorded for the region. A
    /// reused region keeps the size it was first carved with, so callers
    /// must release with that size. The ledger is left unchanged.
    ///
    /// # Safety
    ///
    /// If `ptr` names an occupied region of this pool, the caller must own
    /// it: it came from [`Pool::allocate`] and nothing else (a [`List`]
    /// node, for one) still reads or writes through it. The caller must not
    /// use `ptr` after this call. Foreign and already freed pointers are
    /// rejected without touching memory.
    ///
    /// Releasing is therefore not available to safe code:
    ///
    /// ```compile_fail
    /// use ledgerpool_core::Pool;
    ///
    /// let pool = Pool::new(64);
    /// let ptr = pool.allocate(8, 8).unwrap();
    /// pool.deallocate(ptr, 8, 8).unwrap();
    /// ```
    ///
    /// [`List`]: crate::list::List
    pub unsafe fn deallocate(
        &self,
        ptr: NonNull<u8>,
        bytes: usize,
        alignment: usize,
    ) -> PoolResult<()> {
        let mut state = self.state.borrow_mut();

        let Some(region) = state
            .regions
            .iter_mut()
            .find(|region| region.address() == ptr && !region.is_free())
        else {
            tracing::warn!("Deallocate of foreign pointer {:p}", ptr);
            return Err(PoolError::InvalidPointer(ptr.as_ptr() as usize));
        };

        assert!(
            region.size() == bytes,
            "Deallocating block with incorrect size: recorded {}, given {}",
            region.size(),
            bytes
        );

        region.mark_free();
        tracing::trace!("Freed {:p} ({} bytes, align {})", ptr, bytes, alignment);
        Ok(())
    }
}

impl Default for Pool {
    /// A 1 MiB pool.
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE)
    }
}

impl PartialEq for Pool {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Pool {}

impl Drop for Pool {
    fn drop(&mut self) {
        // SAFETY: We allocated this memory with this layout.
        unsafe {
            dealloc(self.storage.as_ptr(), self.storage_layout);
        }
    }
}

// SAFETY: Pool::allocate only returns aligned, in-bounds addresses of
// regions marked occupied, and an occupied region is never handed out
// again until it is deallocated.
unsafe impl MemoryResource for Pool {
    #[inline]
    fn allocate(&self, bytes: usize, alignment: usize) -> PoolResult<NonNull<u8>> {
        Pool::allocate(self, bytes, alignment)
    }

    #[inline]
    unsafe fn deallocate(
        &self,
        ptr: NonNull<u8>,
        bytes: usize,
        alignment: usize,
    ) -> PoolResult<()> {
        // SAFETY: the caller upholds the same contract.
        unsafe { Pool::deallocate(self, ptr, bytes, alignment) }
    }

    #[inline]
    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        Pool::is_equal(self, other)
    }
}
