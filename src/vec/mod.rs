//! Bounded vector types.

use core::borrow::{Borrow, BorrowMut};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem::{self, ManuallyDrop, MaybeUninit};
use core::ops::{Deref, DerefMut};
use core::ptr;
use core::slice;

use const_default::ConstDefault;

use crate::error::{StorageError, UpdateError};
use crate::storage::insert::Inserter;
use crate::storage::{
    ArrayStorage, Inline, SlotStorage, StorageConfig, StorageConfigNew, StorageConfigSpawn,
};

pub use self::into_iter::IntoIter;

#[macro_use]
mod macros;

mod into_iter;

/// A `BoundedVec` which stores its contents inline, using no external
/// allocation.
pub type InlineVec<T, const N: usize> = BoundedVec<T, Inline<N>>;

#[cfg(feature = "alloc")]
/// A `BoundedVec` which stores its contents in a single block obtained from
/// the global allocator.
pub type HeapVec<T, const N: usize> = BoundedVec<T, crate::storage::Heap<N>>;

/// A contiguous sequence with a fixed upper bound on its length.
///
/// The capacity and the storage policy are selected by the config `C`. The
/// vector never reallocates: operations which would exceed the capacity
/// fail instead.
///
/// # Examples
///
/// ```
/// use bounded_alloc::vec::InlineVec;
///
/// let mut v = InlineVec::<&str, 5>::new();
/// v.emplace_with(|| "Hello");
/// v.emplace_with(|| "World");
/// v.emplace_with(|| "Stack");
/// assert_eq!(v.pop(), Some("Stack"));
/// assert_eq!(v, ["Hello", "World"]);
/// ```
pub struct BoundedVec<T, C: StorageConfig> {
    storage: C::Storage<T>,
    length: usize,
}

impl<T, C: StorageConfigNew> BoundedVec<T, C> {
    /// Constructs a new, empty `BoundedVec<T, C>`.
    ///
    /// For heap-backed configs the storage block is obtained immediately,
    /// and allocation failure results in a panic.
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(vec) => vec,
            Err(err) => err.panic(),
        }
    }

    /// Try to construct a new, empty `BoundedVec<T, C>`.
    pub fn try_new() -> Result<Self, StorageError> {
        Ok(Self::from_storage(C::try_new_storage()?))
    }

    /// Try to construct a new vector containing clones of the elements of
    /// `data`.
    pub fn try_from_slice(data: &[T]) -> Result<Self, StorageError>
    where
        T: Clone,
    {
        if data.len() > C::CAPACITY {
            return Err(StorageError::CapacityExceeded);
        }
        let mut vec = Self::try_new()?;
        vec.try_extend_from_slice(data)?;
        Ok(vec)
    }

    /// Construct a new vector containing clones of the elements of `data`,
    /// panicking if they do not fit.
    pub fn from_slice(data: &[T]) -> Self
    where
        T: Clone,
    {
        match Self::try_from_slice(data) {
            Ok(vec) => vec,
            Err(err) => err.panic(),
        }
    }

    /// Construct a new vector from an array of values, panicking if they do
    /// not fit.
    pub fn from_array<const M: usize>(data: [T; M]) -> Self {
        if M > C::CAPACITY {
            StorageError::CapacityExceeded.panic();
        }
        let mut vec = Self::new();
        for item in data {
            // SAFETY: the capacity was checked above.
            unsafe { vec.push_unchecked(item) };
        }
        vec
    }

    /// Construct a new vector holding `count` clones of `elem`, panicking if
    /// they do not fit.
    pub fn from_elem(elem: T, count: usize) -> Self
    where
        T: Clone,
    {
        let mut vec = Self::new();
        vec.resize(count, elem);
        vec
    }
}

impl<T, C: StorageConfig> BoundedVec<T, C> {
    /// Construct a new, empty vector over an existing storage block.
    ///
    /// # Examples
    ///
    /// ```
    /// use bounded_alloc::{storage::array_storage, vec::InlineVec};
    ///
    /// let mut v = InlineVec::<u32, 4>::from_storage(array_storage());
    /// v.push(1);
    /// assert_eq!(v, [1]);
    /// ```
    #[inline]
    pub const fn from_storage(storage: C::Storage<T>) -> Self {
        Self { storage, length: 0 }
    }

    /// Get a reference to the underlying storage block.
    #[inline]
    pub fn storage(&self) -> &C::Storage<T> {
        &self.storage
    }

    /// The fixed maximum number of elements.
    #[inline]
    pub fn capacity(&self) -> usize {
        C::CAPACITY
    }

    /// The number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Check if the vector holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Check if the vector has reached its capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.length == C::CAPACITY
    }

    /// The number of elements which may still be added.
    #[inline]
    pub fn remaining(&self) -> usize {
        C::CAPACITY - self.length
    }

    /// Access the live elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.as_ptr(), self.length) }
    }

    /// Access the live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.length) }
    }

    /// Get a pointer to the first slot of the storage block.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.base().as_ptr()
    }

    /// Get a mutable pointer to the first slot of the storage block.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.base().as_ptr()
    }

    /// Access the uninitialized slots following the live elements.
    #[inline]
    pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
        unsafe {
            slice::from_raw_parts_mut(
                self.as_mut_ptr().add(self.length).cast(),
                C::CAPACITY - self.length,
            )
        }
    }

    /// Append a value to the end of the vector, panicking if it is full.
    #[inline]
    pub fn push(&mut self, value: T) {
        match self.try_push(value) {
            Ok(_) => (),
            Err(err) => err.panic(),
        }
    }

    /// Try to append a value to the end of the vector. If the vector is
    /// full, the value is returned within the error.
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<(), UpdateError<T>> {
        if self.is_full() {
            return Err(UpdateError::new(StorageError::CapacityExceeded, value));
        }
        unsafe { self.push_unchecked(value) };
        Ok(())
    }

    /// Append a value to the end of the vector without checking the
    /// capacity.
    ///
    /// # Safety
    /// The vector must not be full.
    #[inline]
    pub unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(self.length < C::CAPACITY);
        self.as_mut_ptr().add(self.length).write(value);
        self.length += 1;
    }

    /// Construct a new element at the end of the vector, panicking if it is
    /// full.
    #[inline]
    pub fn emplace_with<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        match self.try_emplace_with(f) {
            Ok(value) => value,
            Err(err) => err.panic(),
        }
    }

    /// Try to construct a new element at the end of the vector. The
    /// constructor is not invoked when the vector is full.
    pub fn try_emplace_with<F>(&mut self, f: F) -> Result<&mut T, StorageError>
    where
        F: FnOnce() -> T,
    {
        if self.is_full() {
            return Err(StorageError::CapacityExceeded);
        }
        let slot = unsafe { self.as_mut_ptr().add(self.length) };
        unsafe { slot.write(f()) };
        self.length += 1;
        Ok(unsafe { &mut *slot })
    }

    /// Remove and return the last element, if any.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.length == 0 {
            None
        } else {
            self.length -= 1;
            Some(unsafe { self.as_ptr().add(self.length).read() })
        }
    }

    /// Remove and return the last element, failing if the vector is empty.
    #[inline]
    pub fn try_pop(&mut self) -> Result<T, StorageError> {
        self.pop().ok_or(StorageError::EmptyContainer)
    }

    /// Shorten the vector to `length` elements, dropping the rest in place.
    /// Has no effect if the vector is already shorter.
    pub fn truncate(&mut self, length: usize) {
        if length < self.length {
            let remove = self.length - length;
            self.length = length;
            unsafe {
                let to_drop: &mut [T] =
                    slice::from_raw_parts_mut(self.as_mut_ptr().add(length), remove);
                ptr::drop_in_place(to_drop);
            }
        }
    }

    /// Drop every element, leaving the vector empty.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Access the element at `index`, failing if it is not live.
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T, StorageError> {
        self.as_slice()
            .get(index)
            .ok_or(StorageError::IndexOutOfRange)
    }

    /// Mutably access the element at `index`, failing if it is not live.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, StorageError> {
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(StorageError::IndexOutOfRange)
    }

    /// Access the first element.
    #[inline]
    pub fn front(&self) -> Result<&T, StorageError> {
        self.as_slice().first().ok_or(StorageError::EmptyContainer)
    }

    /// Mutably access the first element.
    #[inline]
    pub fn front_mut(&mut self) -> Result<&mut T, StorageError> {
        self.as_mut_slice()
            .first_mut()
            .ok_or(StorageError::EmptyContainer)
    }

    /// Access the last element.
    #[inline]
    pub fn back(&self) -> Result<&T, StorageError> {
        self.as_slice().last().ok_or(StorageError::EmptyContainer)
    }

    /// Mutably access the last element.
    #[inline]
    pub fn back_mut(&mut self) -> Result<&mut T, StorageError> {
        self.as_mut_slice()
            .last_mut()
            .ok_or(StorageError::EmptyContainer)
    }

    /// Resize the vector to `new_len` elements, filling new slots with
    /// clones of `value`. Panics if `new_len` exceeds the capacity.
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        match self.try_resize(new_len, value) {
            Ok(_) => (),
            Err(err) => err.panic(),
        }
    }

    /// Try to resize the vector to `new_len` elements, filling new slots
    /// with clones of `value`.
    ///
    /// If cloning panics, the elements added so far are dropped and the
    /// vector keeps its previous contents.
    pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<(), StorageError>
    where
        T: Clone,
    {
        if new_len > C::CAPACITY {
            return Err(StorageError::CapacityExceeded);
        }
        if new_len <= self.length {
            self.truncate(new_len);
        } else {
            let count = new_len - self.length;
            let mut ins = Inserter::new(self.spare_capacity_mut());
            ins.push_repeat(&value, count - 1);
            ins.push(value);
            let added = ins.complete();
            self.length += added;
        }
        Ok(())
    }

    /// Resize the vector to `new_len` elements, producing new elements from
    /// a closure. Panics if `new_len` exceeds the capacity.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F)
    where
        F: FnMut() -> T,
    {
        match self.try_resize_with(new_len, f) {
            Ok(_) => (),
            Err(err) => err.panic(),
        }
    }

    /// Try to resize the vector to `new_len` elements, producing new
    /// elements from a closure.
    pub fn try_resize_with<F>(&mut self, new_len: usize, f: F) -> Result<(), StorageError>
    where
        F: FnMut() -> T,
    {
        if new_len > C::CAPACITY {
            return Err(StorageError::CapacityExceeded);
        }
        if new_len <= self.length {
            self.truncate(new_len);
        } else {
            let count = new_len - self.length;
            let mut ins = Inserter::new(self.spare_capacity_mut());
            ins.push_with(f, count);
            let added = ins.complete();
            self.length += added;
        }
        Ok(())
    }

    /// Append clones of all elements of `data`, panicking if they do not
    /// fit.
    pub fn extend_from_slice(&mut self, data: &[T])
    where
        T: Clone,
    {
        match self.try_extend_from_slice(data) {
            Ok(_) => (),
            Err(err) => err.panic(),
        }
    }

    /// Try to append clones of all elements of `data`. Nothing is added if
    /// they do not all fit.
    pub fn try_extend_from_slice(&mut self, data: &[T]) -> Result<(), StorageError>
    where
        T: Clone,
    {
        if data.len() > self.remaining() {
            return Err(StorageError::CapacityExceeded);
        }
        let mut ins = Inserter::new(self.spare_capacity_mut());
        ins.push_slice(data);
        let added = ins.complete();
        self.length += added;
        Ok(())
    }

    /// Try to append every item produced by an iterator. Items are added
    /// until the vector is full; the first item which does not fit is
    /// returned within the error.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<(), UpdateError<T>>
    where
        I: IntoIterator<Item = T>,
    {
        for item in iter {
            self.try_push(item)?;
        }
        Ok(())
    }

    /// Exchange the contents of two vectors element by element.
    pub fn swap_with(&mut self, other: &mut Self) {
        let span = self.length.max(other.length);
        unsafe { swap_slots(self.as_mut_ptr(), other.as_mut_ptr(), span) };
        mem::swap(&mut self.length, &mut other.length);
    }

    /// Exchange the contents of two vectors with possibly different
    /// configs, failing unless both share the same storage kind and
    /// capacity.
    pub fn try_swap_with<D: StorageConfig>(
        &mut self,
        other: &mut BoundedVec<T, D>,
    ) -> Result<(), StorageError> {
        if C::KIND != D::KIND || C::CAPACITY != D::CAPACITY {
            return Err(StorageError::IncompatiblePolicy);
        }
        let span = self.length.max(other.length);
        unsafe { swap_slots(self.as_mut_ptr(), other.as_mut_ptr(), span) };
        mem::swap(&mut self.length, &mut other.length);
        Ok(())
    }

    /// Replace the contents of this vector with the elements of `source`,
    /// leaving `source` empty. The elements are relocated, not cloned.
    ///
    /// Fails before modifying either vector when `source` holds more
    /// elements than this vector can.
    pub fn move_from<D: StorageConfig>(
        &mut self,
        source: &mut BoundedVec<T, D>,
    ) -> Result<(), StorageError> {
        if source.length > C::CAPACITY {
            return Err(StorageError::CapacityExceeded);
        }
        self.clear();
        let count = source.length;
        source.length = 0;
        unsafe { ptr::copy_nonoverlapping(source.as_ptr(), self.as_mut_ptr(), count) };
        self.length = count;
        Ok(())
    }
}

impl<T, C: StorageConfigSpawn> BoundedVec<T, C> {
    /// Try to move all elements into a new vector with the same config,
    /// leaving this vector empty.
    pub fn try_take(&mut self) -> Result<Self, StorageError> {
        let mut target = Self::from_storage(C::try_spawn_storage(&self.storage)?);
        target.move_from(self)?;
        Ok(target)
    }

    /// Move all elements into a new vector with the same config, leaving
    /// this vector empty. Panics if a new storage block cannot be created.
    pub fn take(&mut self) -> Self {
        match self.try_take() {
            Ok(vec) => vec,
            Err(err) => err.panic(),
        }
    }

    /// Try to create an independent copy of this vector.
    ///
    /// If cloning an element panics, the elements cloned so far are dropped
    /// and no new vector is produced.
    pub fn try_clone(&self) -> Result<Self, StorageError>
    where
        T: Clone,
    {
        let mut target = Self::from_storage(C::try_spawn_storage(&self.storage)?);
        target.try_extend_from_slice(self.as_slice())?;
        Ok(target)
    }
}

#[inline]
unsafe fn swap_slots<T>(a: *mut T, b: *mut T, count: usize) {
    ptr::swap_nonoverlapping(a.cast::<MaybeUninit<T>>(), b.cast::<MaybeUninit<T>>(), count)
}

impl<T, C: StorageConfig> AsRef<[T]> for BoundedVec<T, C> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, C: StorageConfig> AsMut<[T]> for BoundedVec<T, C> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, C: StorageConfig> Borrow<[T]> for BoundedVec<T, C> {
    #[inline]
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, C: StorageConfig> BorrowMut<[T]> for BoundedVec<T, C> {
    #[inline]
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone, C: StorageConfigSpawn> Clone for BoundedVec<T, C> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(vec) => vec,
            Err(err) => err.panic(),
        }
    }

    // The destination is emptied first, so a panicking clone leaves it empty.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extend_from_slice(source);
    }
}

impl<T, const N: usize> ConstDefault for BoundedVec<T, Inline<N>> {
    const DEFAULT: Self = Self::from_storage(ArrayStorage::DEFAULT);
}

impl<T: fmt::Debug, C: StorageConfig> fmt::Debug for BoundedVec<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T, C: StorageConfigNew> Default for BoundedVec<T, C> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: StorageConfig> Deref for BoundedVec<T, C> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, C: StorageConfig> DerefMut for BoundedVec<T, C> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, C: StorageConfig> Drop for BoundedVec<T, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, C: StorageConfig> Extend<T> for BoundedVec<T, C> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        match self.try_extend(iter) {
            Ok(_) => (),
            Err(err) => err.panic(),
        }
    }
}

impl<'a, T: Clone + 'a, C: StorageConfig> Extend<&'a T> for BoundedVec<T, C> {
    #[inline]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        match self.try_extend(iter.into_iter().cloned()) {
            Ok(_) => (),
            Err(err) => err.panic(),
        }
    }
}

impl<T, C: StorageConfigNew> FromIterator<T> for BoundedVec<T, C> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}

impl<T: Hash, C: StorageConfig> Hash for BoundedVec<T, C> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T, C: StorageConfig> IntoIterator for BoundedVec<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T, C>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        let slf = ManuallyDrop::new(self);
        // SAFETY: the storage is moved out exactly once and `slf` is never
        // dropped.
        let storage = unsafe { ptr::read(&slf.storage) };
        IntoIter::new(storage, slf.length)
    }
}

impl<'a, T, C: StorageConfig> IntoIterator for &'a BoundedVec<T, C> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, C: StorageConfig> IntoIterator for &'a mut BoundedVec<T, C> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T1, C1, T2, C2> PartialEq<BoundedVec<T2, C2>> for BoundedVec<T1, C1>
where
    C1: StorageConfig,
    C2: StorageConfig,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &BoundedVec<T2, C2>) -> bool {
        self.as_slice().eq(other.as_slice())
    }
}

impl<T: Eq, C: StorageConfig> Eq for BoundedVec<T, C> {}

impl<T1, C1, T2> PartialEq<[T2]> for BoundedVec<T1, C1>
where
    T1: PartialEq<T2>,
    C1: StorageConfig,
{
    #[inline]
    fn eq(&self, other: &[T2]) -> bool {
        self.as_slice().eq(other)
    }
}

impl<T1, C1, T2> PartialEq<&[T2]> for BoundedVec<T1, C1>
where
    T1: PartialEq<T2>,
    C1: StorageConfig,
{
    #[inline]
    fn eq(&self, other: &&[T2]) -> bool {
        self.as_slice().eq(*other)
    }
}

impl<T1, C1, T2, const N: usize> PartialEq<[T2; N]> for BoundedVec<T1, C1>
where
    T1: PartialEq<T2>,
    C1: StorageConfig,
{
    #[inline]
    fn eq(&self, other: &[T2; N]) -> bool {
        self.as_slice().eq(&other[..])
    }
}

impl<T1, C1, T2, const N: usize> PartialEq<&[T2; N]> for BoundedVec<T1, C1>
where
    T1: PartialEq<T2>,
    C1: StorageConfig,
{
    #[inline]
    fn eq(&self, other: &&[T2; N]) -> bool {
        self.as_slice().eq(&other[..])
    }
}

// Send and Sync follow from the element type and the config; a config
// whose storage is not thread-safe must not be `Send` or `Sync` itself.
unsafe impl<T: Send, C: StorageConfig + Send> Send for BoundedVec<T, C> {}

unsafe impl<T: Sync, C: StorageConfig + Sync> Sync for BoundedVec<T, C> {}

#[cfg(feature = "std")]
impl<C: StorageConfig> std::io::Write for BoundedVec<u8, C> {
    #[inline]
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let count = buf.len().min(self.remaining());
        if count == 0 && !buf.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                StorageError::CapacityExceeded,
            ));
        }
        let mut ins = Inserter::new(self.spare_capacity_mut());
        ins.push_slice(&buf[..count]);
        let added = ins.complete();
        self.length += added;
        Ok(count)
    }
}

#[cfg(feature = "zeroize")]
impl<T: zeroize::Zeroize, C: StorageConfig> zeroize::Zeroize for BoundedVec<T, C> {
    fn zeroize(&mut self) {
        self.as_mut_slice()
            .iter_mut()
            .for_each(zeroize::Zeroize::zeroize);
        self.clear();
        zeroize::Zeroize::zeroize(self.spare_capacity_mut());
    }
}

/// ```compile_fail,E0597
/// use bounded_alloc::vec::InlineVec;
///
/// fn keep(_v: InlineVec<&'static u32, 4>) {}
///
/// let mut v = InlineVec::<&u32, 4>::new();
/// {
///     let value = 5;
///     v.push(&value);
///     keep(v);
/// }
/// ```
#[cfg(doctest)]
fn _lifetime_check() {}
