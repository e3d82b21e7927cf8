use core::fmt;
use core::iter::FusedIterator;
use core::slice;

use super::RingBuffer;
use crate::storage::StorageConfig;

/// An iterator over the elements of a [`RingBuffer`], from front to back.
#[derive(Clone)]
pub struct Iter<'a, T> {
    front: slice::Iter<'a, T>,
    back: slice::Iter<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(front: &'a [T], back: &'a [T]) -> Self {
        Self {
            front: front.iter(),
            back: back.iter(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter")
            .field(&self.front.as_slice())
            .field(&self.back.as_slice())
            .finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self.front.next() {
            Some(item) => Some(item),
            None => {
                // Continue with the wrapped half.
                core::mem::swap(&mut self.front, &mut self.back);
                self.front.next()
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        match self.back.next_back() {
            Some(item) => Some(item),
            None => {
                core::mem::swap(&mut self.front, &mut self.back);
                self.back.next_back()
            }
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

/// A consuming iterator over the elements of a [`RingBuffer`], from front
/// to back.
pub struct IntoIter<T, C: StorageConfig> {
    inner: RingBuffer<T, C>,
}

impl<T, C: StorageConfig> IntoIter<T, C> {
    pub(super) fn new(inner: RingBuffer<T, C>) -> Self {
        Self { inner }
    }
}

impl<T: fmt::Debug, C: StorageConfig> fmt::Debug for IntoIter<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}

impl<T, C: StorageConfig> Iterator for IntoIter<T, C> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_pop()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }
}

impl<T, C: StorageConfig> ExactSizeIterator for IntoIter<T, C> {}

impl<T, C: StorageConfig> FusedIterator for IntoIter<T, C> {}
