//! Support for memory allocation.

use core::alloc::Layout;
use core::mem::MaybeUninit;
use core::ptr::{self, NonNull};

#[cfg(feature = "alloc")]
pub use allocator_api2::alloc::Global;
pub use allocator_api2::alloc::{AllocError, Allocator};

use crate::error::StorageError;

#[cfg(all(not(test), feature = "alloc"))]
pub use alloc_crate::alloc::handle_alloc_error;

#[cfg(any(test, not(feature = "alloc")))]
/// Custom allocation error handler.
pub fn handle_alloc_error(layout: Layout) -> ! {
    panic!("memory allocation of {} bytes failed", layout.size());
}

#[inline]
pub(crate) fn layout_dangling(layout: Layout) -> NonNull<u8> {
    // SAFETY: layout alignments are guaranteed to be non-zero.
    unsafe { NonNull::new_unchecked(layout.align() as *mut u8) }
}

/// A typed allocation protocol which hands out runs of uninitialized slots
/// for values of type `Item`.
///
/// The allocator does not track which slots hold live values. Clients
/// construct values with [`construct`](SlotAlloc::construct) and must
/// [`destroy`](SlotAlloc::destroy) them before releasing the slots.
///
/// # Safety
/// A run returned by `allocate_slots` must be aligned for `Item`, valid for
/// reads and writes of the returned number of slots, and must not overlap
/// any other run produced by the same allocator until it is released.
pub unsafe trait SlotAlloc {
    /// The element type served by this allocator.
    type Item;

    /// The same allocator family serving a different element type.
    type Rebind<U>: SlotAlloc<Item = U>;

    /// Reserve a run of `count` consecutive slots.
    fn allocate_slots(
        &self,
        count: usize,
    ) -> Result<NonNull<[MaybeUninit<Self::Item>]>, StorageError>;

    /// Release a run of slots previously returned by `allocate_slots`.
    ///
    /// # Safety
    /// `ptr` and `count` must describe a run produced by this allocator, and
    /// every value constructed within the run must already be destroyed.
    unsafe fn deallocate_slots(&self, ptr: NonNull<Self::Item>, count: usize);

    /// Construct a value in place within a slot.
    ///
    /// # Safety
    /// `slot` must point to an uninitialized slot produced by this allocator.
    #[inline]
    unsafe fn construct(&self, slot: NonNull<Self::Item>, value: Self::Item) {
        slot.as_ptr().write(value)
    }

    /// Drop the value held in a slot, leaving the slot uninitialized.
    ///
    /// # Safety
    /// `slot` must point to a live value constructed within this allocator.
    #[inline]
    unsafe fn destroy(&self, slot: NonNull<Self::Item>) {
        ptr::drop_in_place(slot.as_ptr())
    }

    /// Create a fresh allocator of the same policy and capacity serving
    /// element type `U`.
    fn rebind<U>(&self) -> Result<Self::Rebind<U>, StorageError>;
}
