//! Bounded FIFO ring buffer types.

use core::fmt;
use core::ptr;
use core::slice;

use const_default::ConstDefault;

use crate::error::{StorageError, UpdateError};
use crate::storage::{
    ArrayStorage, Inline, SlotStorage, StorageConfig, StorageConfigNew, StorageConfigSpawn,
};

pub use self::iter::{IntoIter, Iter};
pub use self::overflow::{Overflow, ParseOverflowError};

mod iter;
mod overflow;

/// A `RingBuffer` which stores its contents inline, using no external
/// allocation.
pub type InlineRing<T, const N: usize> = RingBuffer<T, Inline<N>>;

#[cfg(feature = "alloc")]
/// A `RingBuffer` which stores its contents in a single block obtained from
/// the global allocator.
pub type HeapRing<T, const N: usize> = RingBuffer<T, crate::storage::Heap<N>>;

/// A fixed-capacity FIFO queue over a circular run of slots.
///
/// The capacity must be a power of two, so that positions wrap around with
/// a mask. The [`Overflow`] policy, fixed at construction, decides what
/// happens when a value is pushed onto a full buffer.
///
/// # Examples
///
/// ```
/// use bounded_alloc::ring::{InlineRing, Overflow};
///
/// let mut ring = InlineRing::<u32, 4>::new(Overflow::EvictOldest);
/// for value in [0, 1, 2, 3, 5, 10] {
///     ring.push(value).unwrap();
/// }
/// assert_eq!(ring.iter().copied().collect::<Vec<_>>(), [2, 3, 5, 10]);
/// ```
///
/// A capacity which is not a power of two is rejected at compile time:
///
/// ```compile_fail
/// use bounded_alloc::ring::{InlineRing, Overflow};
///
/// let ring = InlineRing::<u32, 6>::new(Overflow::Reject);
/// ```
pub struct RingBuffer<T, C: StorageConfig> {
    storage: C::Storage<T>,
    head: usize,
    tail: usize,
    count: usize,
    overflow: Overflow,
}

impl<T, C: StorageConfigNew> RingBuffer<T, C> {
    /// Construct a new, empty ring buffer with the given overflow policy.
    ///
    /// For heap-backed configs the storage block is obtained immediately,
    /// and allocation failure results in a panic.
    pub fn new(overflow: Overflow) -> Self {
        match Self::try_new(overflow) {
            Ok(ring) => ring,
            Err(err) => err.panic(),
        }
    }

    /// Try to construct a new, empty ring buffer with the given overflow
    /// policy.
    pub fn try_new(overflow: Overflow) -> Result<Self, StorageError> {
        Ok(Self::from_storage(C::try_new_storage()?, overflow))
    }
}

impl<T, C: StorageConfig> RingBuffer<T, C> {
    const MASK: usize = {
        assert!(
            C::CAPACITY.is_power_of_two(),
            "ring buffer capacity must be a power of two"
        );
        C::CAPACITY - 1
    };

    /// Construct a new, empty ring buffer over an existing storage block.
    #[inline]
    pub const fn from_storage(storage: C::Storage<T>, overflow: Overflow) -> Self {
        let _mask = Self::MASK;
        Self {
            storage,
            head: 0,
            tail: 0,
            count: 0,
            overflow,
        }
    }

    /// Get a reference to the underlying storage block.
    #[inline]
    pub fn storage(&self) -> &C::Storage<T> {
        &self.storage
    }

    /// The fixed maximum number of elements.
    #[inline]
    pub fn capacity(&self) -> usize {
        Self::MASK + 1
    }

    /// The number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check if the buffer has reached its capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == C::CAPACITY
    }

    /// The overflow policy selected at construction.
    #[inline]
    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// Append a value at the back of the buffer.
    ///
    /// When the buffer is full, a [`Reject`](Overflow::Reject) buffer returns
    /// the value within a `BufferFull` error, while an
    /// [`EvictOldest`](Overflow::EvictOldest) buffer drops its front element
    /// to make room.
    pub fn push(&mut self, value: T) -> Result<(), UpdateError<T>> {
        if self.is_full() {
            match self.overflow {
                Overflow::Reject => {
                    return Err(UpdateError::new(StorageError::BufferFull, value));
                }
                Overflow::EvictOldest => self.evict_front(),
            }
        }
        unsafe { self.write_back(value) };
        Ok(())
    }

    /// Construct a new element at the back of the buffer, following the
    /// overflow policy when the buffer is full. The constructor is not
    /// invoked when the value is rejected.
    pub fn emplace_with<F>(&mut self, f: F) -> Result<&mut T, StorageError>
    where
        F: FnOnce() -> T,
    {
        if self.is_full() {
            match self.overflow {
                Overflow::Reject => return Err(StorageError::BufferFull),
                Overflow::EvictOldest => self.evict_front(),
            }
        }
        let slot = unsafe { self.slot_ptr(self.tail) };
        unsafe { slot.write(f()) };
        self.tail = (self.tail + 1) & Self::MASK;
        self.count += 1;
        Ok(unsafe { &mut *slot })
    }

    /// Try to append a value at the back of the buffer. The value is
    /// returned when the buffer is full, regardless of the overflow policy.
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            Err(value)
        } else {
            unsafe { self.write_back(value) };
            Ok(())
        }
    }

    /// Try to construct a new element at the back of the buffer. Returns
    /// `false` without invoking the constructor when the buffer is full,
    /// regardless of the overflow policy.
    #[inline]
    pub fn try_emplace_with<F>(&mut self, f: F) -> bool
    where
        F: FnOnce() -> T,
    {
        if self.is_full() {
            false
        } else {
            unsafe { self.write_back(f()) };
            true
        }
    }

    /// Remove and return the front element, failing if the buffer is empty.
    #[inline]
    pub fn pop(&mut self) -> Result<T, StorageError> {
        self.try_pop().ok_or(StorageError::BufferEmpty)
    }

    /// Remove and return the front element, if any.
    #[inline]
    pub fn try_pop(&mut self) -> Option<T> {
        if self.count == 0 {
            None
        } else {
            Some(unsafe { self.read_front() })
        }
    }

    /// Access the front (oldest) element.
    #[inline]
    pub fn front(&self) -> Result<&T, StorageError> {
        if self.count == 0 {
            Err(StorageError::BufferEmpty)
        } else {
            Ok(unsafe { &*self.slot_ptr(self.head) })
        }
    }

    /// Mutably access the front (oldest) element.
    #[inline]
    pub fn front_mut(&mut self) -> Result<&mut T, StorageError> {
        if self.count == 0 {
            Err(StorageError::BufferEmpty)
        } else {
            Ok(unsafe { &mut *self.slot_ptr(self.head) })
        }
    }

    /// Access the back (newest) element.
    #[inline]
    pub fn back(&self) -> Result<&T, StorageError> {
        if self.count == 0 {
            Err(StorageError::BufferEmpty)
        } else {
            Ok(unsafe { &*self.slot_ptr(self.back_index()) })
        }
    }

    /// Mutably access the back (newest) element.
    #[inline]
    pub fn back_mut(&mut self) -> Result<&mut T, StorageError> {
        if self.count == 0 {
            Err(StorageError::BufferEmpty)
        } else {
            Ok(unsafe { &mut *self.slot_ptr(self.back_index()) })
        }
    }

    /// Access the live elements as two slices, which together hold the
    /// elements from front to back.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let (front, back) = self.slice_ranges();
        let base = self.storage.base().as_ptr();
        unsafe {
            (
                slice::from_raw_parts(base.add(self.head), front),
                slice::from_raw_parts(base, back),
            )
        }
    }

    /// Mutably access the live elements as two slices, which together hold
    /// the elements from front to back.
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let (front, back) = self.slice_ranges();
        let base = self.storage.base().as_ptr();
        unsafe {
            (
                slice::from_raw_parts_mut(base.add(self.head), front),
                slice::from_raw_parts_mut(base, back),
            )
        }
    }

    /// Iterate over the live elements from front to back.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        let (front, back) = self.as_slices();
        Iter::new(front, back)
    }

    /// Drop every element, leaving the buffer empty.
    pub fn clear(&mut self) {
        struct DropGuard<T>(*mut [T]);

        impl<T> Drop for DropGuard<T> {
            fn drop(&mut self) {
                unsafe { ptr::drop_in_place(self.0) }
            }
        }

        let (front, back) = self.as_mut_slices();
        let front: *mut [T] = front;
        let back: *mut [T] = back;
        self.head = 0;
        self.tail = 0;
        self.count = 0;

        // The back half is still dropped if dropping the front half panics.
        let _back = DropGuard(back);
        unsafe { ptr::drop_in_place(front) };
    }

    #[inline]
    fn back_index(&self) -> usize {
        self.tail.wrapping_sub(1) & Self::MASK
    }

    #[inline]
    fn slice_ranges(&self) -> (usize, usize) {
        let front = self.count.min(C::CAPACITY - self.head);
        (front, self.count - front)
    }

    #[inline]
    unsafe fn slot_ptr(&self, index: usize) -> *mut T {
        self.storage.base().as_ptr().add(index)
    }

    #[inline]
    unsafe fn write_back(&mut self, value: T) {
        debug_assert!(self.count < C::CAPACITY);
        self.slot_ptr(self.tail).write(value);
        self.tail = (self.tail + 1) & Self::MASK;
        self.count += 1;
    }

    #[inline]
    unsafe fn read_front(&mut self) -> T {
        debug_assert!(self.count > 0);
        let value = self.slot_ptr(self.head).read();
        self.head = (self.head + 1) & Self::MASK;
        self.count -= 1;
        value
    }

    // The evicted element leaves the live range before it is dropped.
    #[cold]
    fn evict_front(&mut self) {
        log_trace!(capacity = C::CAPACITY, "evicting oldest ring buffer element");
        drop(unsafe { self.read_front() });
    }
}

impl<T: Clone, C: StorageConfigSpawn> Clone for RingBuffer<T, C> {
    fn clone(&self) -> Self {
        let storage = match C::try_spawn_storage(&self.storage) {
            Ok(storage) => storage,
            Err(err) => err.panic(),
        };
        let mut ring = Self::from_storage(storage, self.overflow);
        for item in self.iter() {
            unsafe { ring.write_back(item.clone()) };
        }
        ring
    }
}

impl<T, const N: usize> ConstDefault for RingBuffer<T, Inline<N>> {
    const DEFAULT: Self = Self::from_storage(ArrayStorage::DEFAULT, Overflow::Reject);
}

impl<T: fmt::Debug, C: StorageConfig> fmt::Debug for RingBuffer<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, C: StorageConfigNew> Default for RingBuffer<T, C> {
    #[inline]
    fn default() -> Self {
        Self::new(Overflow::default())
    }
}

impl<T, C: StorageConfig> Drop for RingBuffer<T, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, C: StorageConfig> Extend<T> for RingBuffer<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            if let Err(err) = self.push(item) {
                err.panic();
            }
        }
    }
}

impl<T, C: StorageConfig> IntoIterator for RingBuffer<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T, C>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, C: StorageConfig> IntoIterator for &'a RingBuffer<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T1, C1, T2, C2> PartialEq<RingBuffer<T2, C2>> for RingBuffer<T1, C1>
where
    C1: StorageConfig,
    C2: StorageConfig,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &RingBuffer<T2, C2>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq, C: StorageConfig> Eq for RingBuffer<T, C> {}

unsafe impl<T: Send, C: StorageConfig + Send> Send for RingBuffer<T, C> {}

unsafe impl<T: Sync, C: StorageConfig + Sync> Sync for RingBuffer<T, C> {}
