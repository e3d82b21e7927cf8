//! Backing storage types for bounded containers.
//!
//! A storage block is a raw, aligned run of `CAPACITY` slots for values of
//! type `T`. Blocks know nothing about which slots hold live values; that
//! bookkeeping belongs to the owning container.

use core::mem::MaybeUninit;
use core::ptr::NonNull;

use const_default::ConstDefault;

mod array;
mod config;
mod heap;
mod inline;
pub(crate) mod insert;
pub(crate) mod utils;

pub use self::{
    array::ArrayStorage,
    config::{StorageConfig, StorageConfigNew, StorageConfigSpawn, StorageKind},
    heap::{Heap, HeapStorage},
    inline::Inline,
};

/// Create a new inline storage block for type `T` and capacity `N`.
pub const fn array_storage<T, const N: usize>() -> ArrayStorage<T, N> {
    ArrayStorage::DEFAULT
}

#[cfg(feature = "alloc")]
/// Create a new heap storage block for type `T` and capacity `N` using the
/// global allocator.
pub fn heap_storage<T, const N: usize>() -> HeapStorage<T, N> {
    match HeapStorage::try_new_in(crate::alloc::Global) {
        Ok(storage) => storage,
        Err(err) => err.panic(),
    }
}

/// A fixed block of uninitialized slots.
///
/// # Safety
/// `base` must return a pointer aligned for `Item` which is valid for reads
/// and writes of `CAPACITY` consecutive values for as long as the storage is
/// neither moved nor dropped. Writes through the pointer must be permitted
/// from a shared reference to the storage.
pub unsafe trait SlotStorage: Sized {
    /// The slot value type.
    type Item;

    /// The fixed number of slots in the block.
    const CAPACITY: usize;

    /// Access the first slot of the block.
    fn base(&self) -> NonNull<Self::Item>;

    /// Access the slot at `index`.
    ///
    /// # Safety
    /// `index` must not exceed `CAPACITY`. An index equal to `CAPACITY`
    /// produces a pointer one past the end, which must not be dereferenced.
    #[inline]
    unsafe fn slot(&self, index: usize) -> NonNull<MaybeUninit<Self::Item>> {
        debug_assert!(index <= Self::CAPACITY);
        NonNull::new_unchecked(self.base().as_ptr().add(index)).cast()
    }
}
