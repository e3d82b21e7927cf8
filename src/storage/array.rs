use core::cell::UnsafeCell;
use core::fmt;
use core::mem::MaybeUninit;
use core::ptr::NonNull;

use const_default::ConstDefault;

use super::SlotStorage;

/// A storage block consisting of an uninitialized `MaybeUninit` array,
/// embedded within the owning value.
#[repr(transparent)]
pub struct ArrayStorage<T, const N: usize>(UnsafeCell<[MaybeUninit<T>; N]>);

impl<T, const N: usize> ArrayStorage<T, N> {
    /// Access the block contents as a mutable slice.
    pub fn as_uninit_slice(&mut self) -> &mut [MaybeUninit<T>] {
        self.0.get_mut()
    }
}

impl<T, const N: usize> fmt::Debug for ArrayStorage<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayStorage")
            .field("capacity", &N)
            .finish_non_exhaustive()
    }
}

impl<T, const N: usize> ConstDefault for ArrayStorage<T, N> {
    const DEFAULT: Self = Self(UnsafeCell::new(unsafe {
        MaybeUninit::uninit().assume_init()
    }));
}

impl<T, const N: usize> Default for ArrayStorage<T, N> {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

unsafe impl<T, const N: usize> SlotStorage for ArrayStorage<T, N> {
    type Item = T;

    const CAPACITY: usize = N;

    #[inline]
    fn base(&self) -> NonNull<T> {
        // SAFETY: the pointer produced by `UnsafeCell::get` is never null.
        unsafe { NonNull::new_unchecked(self.0.get().cast()) }
    }
}

#[cfg(feature = "zeroize")]
impl<T, const N: usize> zeroize::Zeroize for ArrayStorage<T, N> {
    #[inline]
    fn zeroize(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.0.get_mut()[..])
    }
}
