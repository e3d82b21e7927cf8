use core::mem::MaybeUninit;
use core::ptr;

/// A guard for constructing a run of values in uninitialized slots.
///
/// If the guard is dropped before `complete` is called, for instance when a
/// constructor panics, every value written so far is dropped again.
pub struct Inserter<'a, T> {
    buf: &'a mut [MaybeUninit<T>],
    pos: usize,
}

impl<'a, T> Inserter<'a, T> {
    #[inline]
    pub fn new(buf: &'a mut [MaybeUninit<T>]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    pub fn push(&mut self, val: T) {
        assert!(self.pos < self.buf.len());
        self.buf[self.pos].write(val);
        self.pos += 1;
    }

    #[inline]
    pub fn push_with(&mut self, mut f: impl FnMut() -> T, count: usize) {
        assert!(self.remaining() >= count);
        for _ in 0..count {
            self.buf[self.pos].write(f());
            self.pos += 1;
        }
    }

    #[inline]
    pub fn push_repeat(&mut self, val: &T, count: usize)
    where
        T: Clone,
    {
        self.push_with(|| val.clone(), count)
    }

    #[inline]
    pub fn push_slice(&mut self, data: &[T])
    where
        T: Clone,
    {
        assert!(self.remaining() >= data.len());
        for item in data {
            self.buf[self.pos].write(item.clone());
            self.pos += 1;
        }
    }

    // Successfully complete the insertion, returning the number of
    // initialized slots.
    #[inline]
    pub fn complete(mut self) -> usize {
        let count = self.pos;
        self.pos = 0;
        count
    }
}

impl<T> Drop for Inserter<'_, T> {
    #[inline]
    fn drop(&mut self) {
        if self.pos > 0 {
            unsafe {
                ptr::drop_in_place(&mut self.buf[..self.pos] as *mut [MaybeUninit<T>] as *mut [T])
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;
    use crate::storage::array_storage;

    struct Tracked<'c>(&'c Cell<usize>);

    impl Drop for Tracked<'_> {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn inserter_complete_keeps_values() {
        let drops = Cell::new(0);
        let mut storage = array_storage::<Tracked<'_>, 4>();
        let mut ins = Inserter::new(storage.as_uninit_slice());
        ins.push(Tracked(&drops));
        ins.push(Tracked(&drops));
        assert_eq!(ins.remaining(), 2);
        assert_eq!(ins.complete(), 2);
        assert_eq!(drops.get(), 0);
        unsafe {
            ptr::drop_in_place(
                &mut storage.as_uninit_slice()[..2] as *mut [MaybeUninit<Tracked<'_>>]
                    as *mut [Tracked<'_>],
            )
        };
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn inserter_unwinds_on_panic() {
        let drops = Cell::new(0);
        let mut storage = array_storage::<Tracked<'_>, 4>();
        let mut made = 0;
        let res = catch_unwind(AssertUnwindSafe(|| {
            let mut ins = Inserter::new(storage.as_uninit_slice());
            ins.push_with(
                || {
                    if made == 3 {
                        panic!("constructor failure");
                    }
                    made += 1;
                    Tracked(&drops)
                },
                4,
            );
            ins.complete()
        }));
        assert!(res.is_err());
        assert_eq!(drops.get(), 3);
    }
}
