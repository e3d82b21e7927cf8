use core::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;
use core::mem::{align_of, size_of};
use core::ptr::NonNull;

use super::config::{StorageConfig, StorageConfigNew, StorageConfigSpawn, StorageKind};
use super::utils::array_layout;
use super::SlotStorage;
use crate::alloc::Allocator;
use crate::error::StorageError;

#[cfg(feature = "alloc")]
use crate::alloc::Global;

/// A marker type used to indicate the heap storage policy, which obtains a
/// single block of `N` slots from the allocator `A` when the container is
/// created and releases it when the container is dropped.
#[cfg(feature = "alloc")]
pub struct Heap<const N: usize, A = Global>(PhantomData<A>);

/// A marker type used to indicate the heap storage policy, which obtains a
/// single block of `N` slots from the allocator `A` when the container is
/// created and releases it when the container is dropped.
#[cfg(not(feature = "alloc"))]
pub struct Heap<const N: usize, A>(PhantomData<A>);

impl<const N: usize, A> fmt::Debug for Heap<N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Heap").field(&N).finish()
    }
}

impl<const N: usize, A: Allocator> StorageConfig for Heap<N, A> {
    type Storage<T> = HeapStorage<T, N, A>;

    const KIND: StorageKind = StorageKind::Heap;
    const CAPACITY: usize = N;
}

impl<const N: usize, A: Allocator + Default> StorageConfigNew for Heap<N, A> {
    #[inline]
    fn try_new_storage<T>() -> Result<Self::Storage<T>, StorageError> {
        HeapStorage::try_new_in(A::default())
    }
}

impl<const N: usize, A: Allocator + Clone> StorageConfigSpawn for Heap<N, A> {
    #[inline]
    fn try_spawn_storage<T, U>(storage: &Self::Storage<T>) -> Result<Self::Storage<U>, StorageError> {
        HeapStorage::try_new_in(storage.alloc.clone())
    }
}

/// A storage block of `N` slots obtained from an allocator instance.
///
/// The block is owned exclusively. Moving the storage transfers ownership
/// of the block without touching its contents.
#[cfg(feature = "alloc")]
pub struct HeapStorage<T, const N: usize, A: Allocator = Global> {
    data: NonNull<T>,
    alloc: A,
}

/// A storage block of `N` slots obtained from an allocator instance.
///
/// The block is owned exclusively. Moving the storage transfers ownership
/// of the block without touching its contents.
#[cfg(not(feature = "alloc"))]
pub struct HeapStorage<T, const N: usize, A: Allocator> {
    data: NonNull<T>,
    alloc: A,
}

impl<T, const N: usize, A: Allocator> HeapStorage<T, N, A> {
    /// Try to obtain a new block from the allocator instance `alloc`.
    pub fn try_new_in(alloc: A) -> Result<Self, StorageError> {
        let layout = array_layout::<T>(N)?;
        let data = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            match alloc.allocate(layout) {
                Ok(ptr) => ptr.cast(),
                Err(_) => {
                    log_warn!(
                        capacity = N,
                        size = layout.size(),
                        "failed to allocate storage block"
                    );
                    return Err(StorageError::AllocationFailure(layout));
                }
            }
        };
        Ok(Self { data, alloc })
    }

    /// Obtain a new block from the allocator instance `alloc`, panicking on
    /// allocation failure.
    pub fn new_in(alloc: A) -> Self {
        match Self::try_new_in(alloc) {
            Ok(storage) => storage,
            Err(err) => err.panic(),
        }
    }

    /// Get a reference to the allocator instance.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    #[inline]
    fn layout() -> Layout {
        // SAFETY: the layout was validated when the block was allocated.
        unsafe { Layout::from_size_align_unchecked(size_of::<T>() * N, align_of::<T>()) }
    }
}

impl<T, const N: usize, A: Allocator> fmt::Debug for HeapStorage<T, N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapStorage")
            .field("data", &self.data)
            .field("capacity", &N)
            .finish_non_exhaustive()
    }
}

unsafe impl<T, const N: usize, A: Allocator> SlotStorage for HeapStorage<T, N, A> {
    type Item = T;

    const CAPACITY: usize = N;

    #[inline]
    fn base(&self) -> NonNull<T> {
        self.data
    }
}

impl<T, const N: usize, A: Allocator> Drop for HeapStorage<T, N, A> {
    fn drop(&mut self) {
        let layout = Self::layout();
        if layout.size() != 0 {
            unsafe { self.alloc.deallocate(self.data.cast(), layout) };
        }
    }
}
