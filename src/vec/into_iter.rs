use core::fmt;
use core::iter::FusedIterator;
use core::ops::Range;
use core::ptr;
use core::slice;

use crate::storage::{SlotStorage, StorageConfig};

/// A consuming iterator over the elements of a
/// [`BoundedVec`](super::BoundedVec).
pub struct IntoIter<T, C: StorageConfig> {
    remain: Range<usize>,
    storage: C::Storage<T>,
}

impl<T, C: StorageConfig> IntoIter<T, C> {
    pub(super) fn new(storage: C::Storage<T>, length: usize) -> Self {
        Self {
            remain: Range {
                start: 0,
                end: length,
            },
            storage,
        }
    }

    /// Access the remaining elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        unsafe {
            slice::from_raw_parts(
                self.storage.base().as_ptr().add(self.remain.start),
                self.remain.len(),
            )
        }
    }

    /// Access the remaining elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe {
            slice::from_raw_parts_mut(
                self.storage.base().as_ptr().add(self.remain.start),
                self.remain.len(),
            )
        }
    }

    fn clear(&mut self) {
        if !self.remain.is_empty() {
            let to_drop: *mut [T] = self.as_mut_slice();
            self.remain.start = self.remain.end;
            unsafe { ptr::drop_in_place(to_drop) };
        }
    }
}

impl<T: fmt::Debug, C: StorageConfig> fmt::Debug for IntoIter<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, C: StorageConfig> AsRef<[T]> for IntoIter<T, C> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, C: StorageConfig> AsMut<[T]> for IntoIter<T, C> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, C: StorageConfig> Iterator for IntoIter<T, C> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.remain.start;
        if index != self.remain.end {
            self.remain.start = index + 1;
            unsafe { Some(ptr::read(self.storage.base().as_ptr().add(index))) }
        } else {
            None
        }
    }

    #[inline]
    fn count(self) -> usize
    where
        Self: Sized,
    {
        self.len()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remain.len();
        (len, Some(len))
    }
}

impl<T, C: StorageConfig> DoubleEndedIterator for IntoIter<T, C> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remain.start != self.remain.end {
            self.remain.end -= 1;
            unsafe {
                Some(ptr::read(
                    self.storage.base().as_ptr().add(self.remain.end),
                ))
            }
        } else {
            None
        }
    }
}

impl<T, C: StorageConfig> ExactSizeIterator for IntoIter<T, C> {}

impl<T, C: StorageConfig> FusedIterator for IntoIter<T, C> {}

impl<T, C: StorageConfig> Drop for IntoIter<T, C> {
    fn drop(&mut self) {
        self.clear();
    }
}
