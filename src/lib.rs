//! Fixed-capacity containers over inline or heap storage, with a bump
//! pool allocator.
//!
//! None of the structures in this crate ever grow past the capacity chosen
//! when they are constructed. The storage policy is selected at the type
//! level: [`Inline<N>`](storage::Inline) embeds the slots within the owning
//! value, while [`Heap<N, A>`](storage::Heap) obtains a single block from an
//! allocator.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "nightly", feature(allocator_api))]
#![warn(missing_docs)]

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
struct _ReadmeDoctests;

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc as alloc_crate;

#[macro_use]
mod trace;

pub mod alloc;

pub(crate) mod error;

pub mod pool;

pub mod ring;

pub mod storage;

pub mod vec;

pub use self::error::{StorageError, UpdateError};
