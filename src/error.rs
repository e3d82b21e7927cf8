//! Error handling.

use core::alloc::{Layout, LayoutError};
use core::fmt;

/// An enumeration of error types raised by bounded containers and their
/// storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The storage block could not be obtained from the allocator.
    AllocationFailure(Layout),
    /// A bounded vector has no room for the requested elements.
    CapacityExceeded,
    /// A ring buffer configured to reject new values is full.
    BufferFull,
    /// A ring buffer holds no values.
    BufferEmpty,
    /// A bounded vector holds no values.
    EmptyContainer,
    /// The requested index is not within the live range.
    IndexOutOfRange,
    /// The storage policies or capacities of two containers do not match.
    IncompatiblePolicy,
    /// The pool cannot satisfy the requested number of slots.
    OutOfCapacity,
    /// The storage layout could not be represented.
    LayoutError(LayoutError),
}

impl StorageError {
    /// Generic description of this error.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllocationFailure(_) => "Allocation failure",
            Self::CapacityExceeded => "Capacity exceeded",
            Self::BufferFull => "Buffer is full",
            Self::BufferEmpty => "Buffer is empty",
            Self::EmptyContainer => "Empty container",
            Self::IndexOutOfRange => "Index out of range",
            Self::IncompatiblePolicy => "Incompatible storage policy",
            Self::OutOfCapacity => "Pool capacity exhausted",
            Self::LayoutError(_) => "Layout error",
        }
    }

    /// Generate a panic with this error as the reason.
    #[cold]
    #[inline(never)]
    pub fn panic(self) -> ! {
        if let Self::AllocationFailure(layout) = self {
            crate::alloc::handle_alloc_error(layout);
        } else {
            panic!("{}", self.as_str())
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LayoutError> for StorageError {
    fn from(err: LayoutError) -> Self {
        Self::LayoutError(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StorageError {}

/// An error raised by container update operations when a value could not
/// be stored. Includes the rejected value.
#[derive(Clone)]
pub struct UpdateError<T> {
    pub(crate) error: StorageError,
    pub(crate) value: T,
}

impl<T> UpdateError<T> {
    pub(crate) fn new(error: StorageError, value: T) -> Self {
        Self { error, value }
    }

    /// Generic description of this error
    pub fn as_str(&self) -> &'static str {
        "Update error"
    }

    /// Get a reference to the contained `StorageError`
    pub fn error(&self) -> &StorageError {
        &self.error
    }

    /// Unwrap the rejected value
    pub fn into_value(self) -> T {
        self.value
    }

    /// Split this error into the `StorageError` and the rejected value
    pub fn into_parts(self) -> (StorageError, T) {
        (self.error, self.value)
    }

    /// Generate a panic with this error as the reason
    #[cold]
    #[inline(never)]
    pub fn panic(self) -> ! {
        panic!("{}: {}", self.as_str(), self.error.as_str());
    }
}

impl<T> fmt::Debug for UpdateError<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for UpdateError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}: {}", self.as_str(), self.error))
    }
}

#[cfg(feature = "std")]
impl<T> std::error::Error for UpdateError<T> {}
