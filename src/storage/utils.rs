use core::alloc::Layout;

use crate::error::StorageError;

#[inline]
pub fn array_layout<T>(count: usize) -> Result<Layout, StorageError> {
    Layout::array::<T>(count).map_err(StorageError::LayoutError)
}

/// The number of slots of type `T` needed to cover `size` bytes.
#[inline]
pub const fn slots_for_size<T>(size: usize) -> usize {
    let slot = core::mem::size_of::<T>();
    if slot == 0 {
        0
    } else {
        size.div_ceil(slot)
    }
}
