use const_default::ConstDefault;

use super::array::ArrayStorage;
use super::config::{StorageConfig, StorageConfigNew, StorageConfigSpawn, StorageKind};
use crate::error::StorageError;

/// A marker type used to indicate the inline storage policy, which keeps
/// all `N` slots within the container value itself.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Inline<const N: usize>;

impl<const N: usize> StorageConfig for Inline<N> {
    type Storage<T> = ArrayStorage<T, N>;

    const KIND: StorageKind = StorageKind::Inline;
    const CAPACITY: usize = N;
}

impl<const N: usize> StorageConfigNew for Inline<N> {
    #[inline]
    fn try_new_storage<T>() -> Result<Self::Storage<T>, StorageError> {
        Ok(ArrayStorage::DEFAULT)
    }
}

impl<const N: usize> StorageConfigSpawn for Inline<N> {
    #[inline]
    fn try_spawn_storage<T, U>(_storage: &Self::Storage<T>) -> Result<Self::Storage<U>, StorageError> {
        Ok(ArrayStorage::DEFAULT)
    }
}
