use core::cell::Cell;
use core::marker::PhantomData as Cfg;
use core::mem::{align_of, MaybeUninit};
use core::ptr::NonNull;

use rstest::rstest;

use bounded_alloc::alloc::SlotAlloc;
use bounded_alloc::pool::{InlinePool, Pool};
#[cfg(feature = "alloc")]
use bounded_alloc::storage::Heap;
use bounded_alloc::storage::{Inline, StorageConfigNew, StorageConfigSpawn};
use bounded_alloc::StorageError;

fn run_start<T>(run: NonNull<[MaybeUninit<T>]>) -> *mut T {
    run.cast::<T>().as_ptr()
}

#[rstest]
#[case::inline(Cfg::<Inline<16>>)]
#[cfg_attr(feature = "alloc", case::heap(Cfg::<Heap<16>>))]
fn pool_sequential_runs<C: StorageConfigNew>(#[case] _config: Cfg<C>) {
    let pool = Pool::<u64, C>::new();
    assert_eq!(pool.capacity(), 16);
    assert_eq!(pool.remaining(), 16);

    let first = pool.allocate(3).expect("error allocating");
    let second = pool.allocate(5).expect("error allocating");
    let third = pool.allocate(8).expect("error allocating");
    assert_eq!(first.len(), 3);
    assert_eq!(third.len(), 8);

    let (a, b, c) = (run_start(first), run_start(second), run_start(third));
    assert_eq!(a as usize % align_of::<u64>(), 0);
    assert_eq!(unsafe { b.offset_from(a) }, 3);
    assert_eq!(unsafe { c.offset_from(b) }, 5);
    assert_eq!(pool.used(), 16);
    assert_eq!(pool.remaining(), 0);
}

#[rstest]
#[case::inline(Cfg::<Inline<4>>)]
#[cfg_attr(feature = "alloc", case::heap(Cfg::<Heap<4>>))]
fn pool_exhausted<C: StorageConfigNew>(#[case] _config: Cfg<C>) {
    let pool = Pool::<u32, C>::new();
    pool.allocate(3).expect("error allocating");
    assert_eq!(pool.allocate(2), Err(StorageError::OutOfCapacity));
    assert_eq!(pool.used(), 3);
    assert!(pool.allocate(1).is_ok());
    assert_eq!(pool.allocate(1), Err(StorageError::OutOfCapacity));
    // an empty run always succeeds
    assert!(pool.allocate(0).is_ok());
    assert_eq!(pool.used(), 4);
}

#[test]
fn pool_deallocate_does_not_reclaim() {
    let pool = InlinePool::<u8, 4>::new();
    let run = pool.allocate(4).expect("error allocating");
    pool.deallocate(run.cast(), 4);
    assert_eq!(pool.used(), 4);
    assert_eq!(pool.allocate(1), Err(StorageError::OutOfCapacity));
}

#[cfg(feature = "alloc")]
#[rstest]
#[case::inline(Cfg::<Inline<40>>)]
#[cfg_attr(feature = "alloc", case::heap(Cfg::<Heap<40>>))]
fn pool_backs_vec<C: StorageConfigNew>(#[case] _config: Cfg<C>) {
    let pool = Pool::<u64, C>::new();
    let mut values = allocator_api2::vec::Vec::with_capacity_in(40, &pool);
    for i in 0..40u64 {
        values.push(i * 2);
    }
    assert_eq!(pool.used(), 40);
    assert_eq!(values.iter().sum::<u64>(), 1560);
    assert!(values.try_reserve(1).is_err());
    assert_eq!(pool.used(), 40);
}

#[cfg(feature = "alloc")]
#[test]
fn pool_backs_box() {
    let pool = InlinePool::<u32, 2>::new();
    let first = allocator_api2::boxed::Box::new_in(7u32, &pool);
    let second = allocator_api2::boxed::Box::new_in(8u32, &pool);
    assert_eq!(*first + *second, 15);
    assert!(allocator_api2::boxed::Box::try_new_in(9u32, &pool).is_err());
    drop(first);
    // released runs are not reused
    assert!(allocator_api2::boxed::Box::try_new_in(9u32, &pool).is_err());
}

#[test]
fn pool_debug() {
    let pool = InlinePool::<u16, 8>::default();
    pool.allocate(3).expect("error allocating");
    assert_eq!(format!("{:?}", pool), "Pool { used: 3, capacity: 8 }");
}

struct Tracked<'c>(&'c Cell<usize>);

impl Drop for Tracked<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

// Construct `count` values within a fresh run and destroy them again.
fn fill_and_destroy<'c, A>(alloc: &A, count: usize, drops: &'c Cell<usize>)
where
    A: SlotAlloc<Item = Tracked<'c>>,
{
    let run = alloc.allocate_slots(count).expect("error allocating");
    let base = run.cast::<Tracked<'c>>();
    for index in 0..count {
        unsafe {
            let slot = NonNull::new_unchecked(base.as_ptr().add(index));
            alloc.construct(slot, Tracked(drops));
        }
    }
    for index in 0..count {
        unsafe { alloc.destroy(NonNull::new_unchecked(base.as_ptr().add(index))) };
    }
    unsafe { alloc.deallocate_slots(base, count) };
}

#[rstest]
#[case::inline(Cfg::<Inline<8>>)]
#[cfg_attr(feature = "alloc", case::heap(Cfg::<Heap<8>>))]
fn pool_slot_alloc<C: StorageConfigNew + StorageConfigSpawn>(#[case] _config: Cfg<C>) {
    let drops = Cell::new(0);
    let pool = Pool::<Tracked<'_>, C>::new();
    fill_and_destroy(&pool, 5, &drops);
    assert_eq!(drops.get(), 5);
    assert_eq!(pool.used(), 5);
    assert_eq!(
        pool.allocate_slots(4).err(),
        Some(StorageError::OutOfCapacity)
    );
}

#[rstest]
#[case::inline(Cfg::<Inline<4>>)]
#[cfg_attr(feature = "alloc", case::heap(Cfg::<Heap<4>>))]
fn pool_rebind<C: StorageConfigNew + StorageConfigSpawn>(#[case] _config: Cfg<C>) {
    let pool = Pool::<u8, C>::new();
    pool.allocate(4).expect("error allocating");

    let rebound = SlotAlloc::rebind::<u64>(&pool).expect("error rebinding");
    assert_eq!(rebound.capacity(), 4);
    assert_eq!(rebound.used(), 0);
    let run = rebound.allocate_slots(4).expect("error allocating");
    assert_eq!(run_start(run) as usize % align_of::<u64>(), 0);
    assert_eq!(pool.used(), 4);
}
