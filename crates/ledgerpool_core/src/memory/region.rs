//! # Ledger Regions
//!
//! Bookkeeping entries for byte ranges issued by a pool.

use std::fmt;
use std::ptr::NonNull;

/// One entry of the pool ledger.
///
/// Entries are appended when a request is served from the tail of the pool
/// and are never removed afterwards, only flipped between free and occupied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// First byte of the region.
    address: NonNull<u8>,
    /// Size recorded when the region was first carved from the tail.
    size: usize,
    /// Whether the region is available for reuse.
    is_free: bool,
}

impl Region {
    /// Creates an occupied region.
    #[inline]
    pub(crate) const fn occupied(address: NonNull<u8>, size: usize) -> Self {
        Self {
            address,
            size,
            is_free: false,
        }
    }

    /// Returns the first byte of the region.
    #[inline]
    #[must_use]
    pub const fn address(&self) -> NonNull<u8> {
        self.address
    }

    /// Returns the address as an integer.
    #[inline]
    #[must_use]
    pub fn addr(&self) -> usize {
        self.address.as_ptr() as usize
    }

    /// Returns the recorded size in bytes.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns true if the region may be handed out again.
    #[inline]
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.is_free
    }

    /// Returns the address one past the last byte.
    #[inline]
    #[must_use]
    pub fn end_addr(&self) -> usize {
        self.addr() + self.size
    }

    /// Returns true if this region can serve `bytes` at `alignment` as-is.
    #[inline]
    pub(crate) fn fits(&self, bytes: usize, alignment: usize) -> bool {
        self.is_free && self.size >= bytes && self.addr() % alignment == 0
    }

    #[inline]
    pub(crate) fn mark_free(&mut self) {
        self.is_free = true;
    }

    #[inline]
    pub(crate) fn mark_occupied(&mut self) {
        self.is_free = false;
    }

    /// Returns true if the byte ranges of the two regions intersect.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Region) -> bool {
        self.addr() < other.end_addr() && other.addr() < self.end_addr()
    }
}

/// Human-readable dump of a pool ledger.
///
/// Not a stable format; intended for inspection only.
#[derive(Clone, Debug, Default)]
pub struct LedgerReport {
    regions: Vec<Region>,
}

impl LedgerReport {
    pub(crate) fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Returns the entries in ledger order.
    #[inline]
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
}

impl fmt::Display for LedgerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, region) in self.regions.iter().enumerate() {
            writeln!(
                f,
                "Block {index}: Address={:p}, Size={}, {}",
                region.address,
                region.size,
                if region.is_free { "Free" } else { "Allocated" }
            )?;
        }
        Ok(())
    }
}
