//! Throughput of the BFS frontier queue: reserved steady-state cycling
//! versus growth from the default capacity.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use maze_core::{Point, RingQueue};

fn reserved_cycle(c: &mut Criterion) {
    c.bench_function("ring_queue_reserved_cycle_4096", |b| {
        let mut queue: RingQueue<Point> = RingQueue::new();
        queue.reserve(4096);
        b.iter(|| {
            for i in 0..4096 {
                queue.push(Point::new(i, i));
            }
            while queue.pop().is_some() {}
        });
    });
}

fn growth_from_default(c: &mut Criterion) {
    c.bench_function("ring_queue_grow_to_4096", |b| {
        b.iter_batched(
            RingQueue::<Point>::new,
            |mut queue| {
                for i in 0..4096 {
                    queue.push(Point::new(i, i));
                }
                queue
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, reserved_cycle, growth_from_default);
criterion_main!(benches);
