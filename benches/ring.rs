#[macro_use]
extern crate criterion;

use std::collections::VecDeque;

use criterion::{black_box, Criterion};

use bounded_alloc::ring::{InlineRing, Overflow};

fn ring_compare(c: &mut Criterion) {
    const CAPACITY: usize = 64;
    const COUNT: usize = 1000;

    c.bench_function(&format!("ring push/pop {} values", COUNT), |b| {
        b.iter(|| {
            let mut ring = InlineRing::<usize, CAPACITY>::new(Overflow::Reject);
            let mut total = 0;
            for value in 0..COUNT {
                if ring.is_full() {
                    total += ring.try_pop().unwrap_or_default();
                }
                let _ = ring.try_push(black_box(value));
            }
            total
        });
    });

    c.bench_function(&format!("ring evict-oldest push {} values", COUNT), |b| {
        b.iter(|| {
            let mut ring = InlineRing::<usize, CAPACITY>::new(Overflow::EvictOldest);
            for value in 0..COUNT {
                let _ = ring.push(black_box(value));
            }
            ring.len()
        });
    });

    c.bench_function(&format!("vecdeque push/pop {} values", COUNT), |b| {
        b.iter(|| {
            let mut deque = VecDeque::<usize>::with_capacity(CAPACITY);
            let mut total = 0;
            for value in 0..COUNT {
                if deque.len() == CAPACITY {
                    total += deque.pop_front().unwrap_or_default();
                }
                deque.push_back(black_box(value));
            }
            total
        });
    });
}

criterion_group!(benches, ring_compare);
criterion_main!(benches);
