//! Cost of the hot carving primitives and the disjoint set that Kruskal
//! leans on, away from any terminal I/O.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use maze_build::{util, DisjointSet};
use maze_core::{Grid, Point, WallStyle};

fn fill_and_carve(c: &mut Criterion) {
    c.bench_function("fill_with_walls_51x51", |b| {
        let grid = Grid::new(51, 51, WallStyle::Sharp);
        b.iter(|| util::fill_with_walls(&grid));
    });

    c.bench_function("join_squares_row_sweep", |b| {
        let grid = Grid::new(51, 51, WallStyle::Sharp);
        b.iter(|| {
            util::fill_with_walls(&grid);
            let mut col = 1;
            while col < grid.cols() - 2 {
                util::join_squares(&grid, Point::new(25, col), Point::new(25, col + 2));
                col += 2;
            }
        });
    });
}

fn disjoint_set_unions(c: &mut Criterion) {
    c.bench_function("disjoint_set_union_sweep_4096", |b| {
        b.iter_batched(
            || DisjointSet::new(4096),
            |mut sets| {
                for elem in 0..4095 {
                    sets.made_union(elem, elem + 1);
                }
                sets.find(0)
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, fill_and_carve, disjoint_set_unions);
criterion_main!(benches);
