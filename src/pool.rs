//! A bump allocator over a single fixed block of slots.
//!
//! A [`Pool`] hands out consecutive runs of slots in increasing order and
//! never reclaims them: releasing a run is a no-op, and the space only
//! becomes available again when the pool itself is dropped. The pool does
//! not construct or destroy values; that is left to its clients.
//!
//! Standard containers may draw their storage from a pool through the
//! [`Allocator`] implementation for `&Pool`:
//!
//! ```
//! use allocator_api2::vec::Vec;
//! use bounded_alloc::pool::InlinePool;
//!
//! let pool = InlinePool::<u64, 40>::new();
//! let mut values = Vec::with_capacity_in(40, &pool);
//! for i in 0..40u64 {
//!     values.push(i * 2);
//! }
//! assert_eq!(pool.used(), 40);
//! assert_eq!(values[39], 78);
//! ```

use core::alloc::Layout;
use core::cell::Cell;
use core::fmt;
use core::mem::{align_of, size_of, MaybeUninit};
use core::ptr::NonNull;

use crate::alloc::{layout_dangling, AllocError, Allocator, SlotAlloc};
use crate::error::StorageError;
use crate::storage::utils::slots_for_size;
use crate::storage::{Inline, SlotStorage, StorageConfig, StorageConfigNew, StorageConfigSpawn};

/// A `Pool` which keeps its slots inline. The pool cannot be moved while
/// any allocation from it is still borrowed.
pub type InlinePool<T, const N: usize> = Pool<T, Inline<N>>;

#[cfg(feature = "alloc")]
/// A `Pool` which obtains its slots from the global allocator.
pub type HeapPool<T, const N: usize> = Pool<T, crate::storage::Heap<N>>;

/// A bump allocator handing out runs of slots for values of type `T`.
pub struct Pool<T, C: StorageConfig> {
    storage: C::Storage<T>,
    used: Cell<usize>,
}

impl<T, C: StorageConfigNew> Pool<T, C> {
    /// Construct a new, empty pool.
    ///
    /// For heap-backed configs the storage block is obtained immediately,
    /// and allocation failure results in a panic.
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(pool) => pool,
            Err(err) => err.panic(),
        }
    }

    /// Try to construct a new, empty pool.
    pub fn try_new() -> Result<Self, StorageError> {
        Ok(Self::from_storage(C::try_new_storage()?))
    }
}

impl<T, C: StorageConfig> Pool<T, C> {
    /// Construct a new, empty pool over an existing storage block.
    #[inline]
    pub const fn from_storage(storage: C::Storage<T>) -> Self {
        Self {
            storage,
            used: Cell::new(0),
        }
    }

    /// The fixed number of slots in the pool.
    #[inline]
    pub fn capacity(&self) -> usize {
        C::CAPACITY
    }

    /// The number of slots handed out so far.
    #[inline]
    pub fn used(&self) -> usize {
        self.used.get()
    }

    /// The number of slots still available.
    #[inline]
    pub fn remaining(&self) -> usize {
        C::CAPACITY - self.used.get()
    }

    /// Reserve a run of `count` consecutive slots.
    ///
    /// Fails with `OutOfCapacity` when fewer than `count` slots remain, in
    /// which case no slots are consumed.
    pub fn allocate(&self, count: usize) -> Result<NonNull<[MaybeUninit<T>]>, StorageError> {
        let used = self.used.get();
        if count > C::CAPACITY - used {
            log_debug!(
                requested = count,
                used,
                capacity = C::CAPACITY,
                "pool capacity exhausted"
            );
            return Err(StorageError::OutOfCapacity);
        }
        // SAFETY: `used + count` does not exceed the capacity.
        let head = unsafe { self.storage.slot(used) };
        self.used.set(used + count);
        Ok(NonNull::slice_from_raw_parts(head, count))
    }

    /// Release a run of slots. This has no effect: the slots are not
    /// reused until the pool is dropped.
    #[inline]
    pub fn deallocate(&self, _ptr: NonNull<T>, _count: usize) {}

    /// Create a fresh, empty pool of the same policy and capacity serving
    /// element type `U`.
    pub fn rebind<U>(&self) -> Result<Pool<U, C>, StorageError>
    where
        C: StorageConfigSpawn,
    {
        Ok(Pool::from_storage(C::try_spawn_storage(&self.storage)?))
    }
}

impl<T, C: StorageConfig> fmt::Debug for Pool<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("used", &self.used.get())
            .field("capacity", &C::CAPACITY)
            .finish()
    }
}

impl<T, C: StorageConfigNew> Default for Pool<T, C> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl<T, C: StorageConfigSpawn> SlotAlloc for Pool<T, C> {
    type Item = T;
    type Rebind<U> = Pool<U, C>;

    #[inline]
    fn allocate_slots(&self, count: usize) -> Result<NonNull<[MaybeUninit<T>]>, StorageError> {
        self.allocate(count)
    }

    #[inline]
    unsafe fn deallocate_slots(&self, ptr: NonNull<T>, count: usize) {
        self.deallocate(ptr, count)
    }

    #[inline]
    fn rebind<U>(&self) -> Result<Pool<U, C>, StorageError> {
        Pool::rebind(self)
    }
}

// A byte layout is served as a run of whole slots. Only alignments up to
// that of `T` can be satisfied, since every run starts on a slot boundary.
unsafe impl<T, C: StorageConfig> Allocator for &Pool<T, C> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        if layout.size() == 0 {
            return Ok(NonNull::slice_from_raw_parts(layout_dangling(layout), 0));
        }
        if size_of::<T>() == 0 || layout.align() > align_of::<T>() {
            return Err(AllocError);
        }
        let count = slots_for_size::<T>(layout.size());
        let run = Pool::allocate(*self, count).map_err(|_| AllocError)?;
        Ok(NonNull::slice_from_raw_parts(
            run.cast::<u8>(),
            count * size_of::<T>(),
        ))
    }

    #[inline]
    unsafe fn deallocate(&self, _ptr: NonNull<u8>, _layout: Layout) {}
}

/// ```compile_fail,E0505
/// use allocator_api2::vec::Vec;
/// use bounded_alloc::pool::InlinePool;
///
/// let pool = InlinePool::<u32, 8>::new();
/// let mut values = Vec::new_in(&pool);
/// values.push(1u32);
/// let moved = pool;
/// values.push(2);
/// ```
#[cfg(doctest)]
fn _pool_borrow_check() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_zero_size_layout() {
        let pool = InlinePool::<u32, 2>::new();
        let ptr = Allocator::allocate(&&pool, Layout::new::<()>()).expect("error allocating");
        assert_eq!(ptr.len(), 0);
        assert_eq!(pool.used(), 0);
    }

    #[test]
    fn pool_rejects_over_alignment() {
        let pool = InlinePool::<u16, 8>::new();
        assert_eq!(
            Allocator::allocate(&&pool, Layout::new::<u64>()),
            Err(AllocError)
        );
        assert_eq!(pool.used(), 0);
    }

    #[test]
    fn pool_rounds_up_to_slots() {
        let pool = InlinePool::<u32, 4>::new();
        let layout = Layout::from_size_align(6, 2).expect("invalid layout");
        let ptr = Allocator::allocate(&&pool, layout).expect("error allocating");
        assert_eq!(ptr.len(), 8);
        assert_eq!(pool.used(), 2);
    }
}
