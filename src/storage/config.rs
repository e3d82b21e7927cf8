use core::fmt::Debug;

use super::SlotStorage;
use crate::error::StorageError;

/// The backend family of a storage policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// Slots are embedded within the owning value.
    Inline,
    /// Slots live in a single block obtained from an allocator.
    Heap,
}

/// Type-level selection of a storage policy and capacity.
///
/// Containers are parameterized by a config marker such as
/// [`Inline<N>`](super::Inline) or [`Heap<N, A>`](super::Heap), which
/// determines the concrete storage block used for each element type.
pub trait StorageConfig: Debug {
    /// The storage block holding values of type `T`.
    type Storage<T>: SlotStorage<Item = T>;

    /// The backend family of this policy.
    const KIND: StorageKind;

    /// The fixed number of slots in each storage block.
    const CAPACITY: usize;
}

/// Storage policies which can produce a block without any external
/// context.
pub trait StorageConfigNew: StorageConfig {
    /// Try to create a new storage block.
    fn try_new_storage<T>() -> Result<Self::Storage<T>, StorageError>;
}

/// Storage policies which can produce a fresh block alongside an existing
/// one, reusing its allocator.
pub trait StorageConfigSpawn: StorageConfig {
    /// Try to create a new, empty block of the same policy and capacity,
    /// possibly for a different element type.
    fn try_spawn_storage<T, U>(storage: &Self::Storage<T>) -> Result<Self::Storage<U>, StorageError>;
}
