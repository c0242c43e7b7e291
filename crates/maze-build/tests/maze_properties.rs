//! Structural invariants every builder must uphold, checked across the
//! whole roster on several seeds and grid shapes.

use maze_build::{arena, backtracker, eller, gridrun, kruskal, prim, subdivision, wilson_adder,
                 wilson_carver};
use maze_core::cell::{self, EAST_WALL, NORTH_WALL, SOUTH_WALL, WEST_WALL};
use maze_core::point::CARDINALS;
use maze_core::{Grid, Point, WallStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

type Generate = fn(&Grid, &mut StdRng) -> anyhow::Result<()>;

const ALL_BUILDERS: [(&str, Generate); 9] = [
    ("backtracker", backtracker::generate),
    ("subdivision", subdivision::generate),
    ("wilson_carver", wilson_carver::generate),
    ("wilson_adder", wilson_adder::generate),
    ("kruskal", kruskal::generate),
    ("prim", prim::generate),
    ("eller", eller::generate),
    ("gridrun", gridrun::generate),
    ("arena", arena::generate),
];

/// Builders whose output must be a spanning tree of the odd-cell lattice.
const PERFECT_BUILDERS: [(&str, Generate); 5] = [
    ("backtracker", backtracker::generate),
    ("wilson_carver", wilson_carver::generate),
    ("kruskal", kruskal::generate),
    ("prim", prim::generate),
    ("eller", eller::generate),
];

fn built(name: &str, generate: Generate, rows: i32, cols: i32, seed: u64) -> Grid {
    let grid = Grid::new(rows, cols, WallStyle::Sharp);
    let mut rng = StdRng::seed_from_u64(seed);
    generate(&grid, &mut rng).unwrap_or_else(|e| panic!("{name} failed to build: {e}"));
    grid
}

fn path_cells(grid: &Grid) -> Vec<Point> {
    (0..grid.rows())
        .flat_map(|r| (0..grid.cols()).map(move |c| Point::new(r, c)))
        .filter(|&p| cell::is_path(grid.get(p)))
        .collect()
}

fn reachable_from(grid: &Grid, start: Point) -> HashSet<Point> {
    let mut seen = HashSet::from([start]);
    let mut stack = vec![start];
    while let Some(cur) = stack.pop() {
        for d in CARDINALS {
            let next = cur + d;
            if grid.contains(next) && cell::is_path(grid.get(next)) && seen.insert(next) {
                stack.push(next);
            }
        }
    }
    seen
}

#[test]
fn perimeter_is_never_walkable() {
    for (name, generate) in ALL_BUILDERS {
        let grid = built(name, generate, 11, 17, 1);
        for col in 0..grid.cols() {
            assert!(
                !cell::is_path(grid.get(Point::new(0, col))),
                "{name}: top frame open at col {col}"
            );
            assert!(
                !cell::is_path(grid.get(Point::new(grid.rows() - 1, col))),
                "{name}: bottom frame open at col {col}"
            );
        }
        for row in 0..grid.rows() {
            assert!(!cell::is_path(grid.get(Point::new(row, 0))), "{name}: left frame open");
            assert!(
                !cell::is_path(grid.get(Point::new(row, grid.cols() - 1))),
                "{name}: right frame open"
            );
        }
    }
}

#[test]
fn facing_walls_always_agree() {
    let pairs = [
        (Point::new(1, 0), SOUTH_WALL, NORTH_WALL),
        (Point::new(0, 1), EAST_WALL, WEST_WALL),
    ];
    for (name, generate) in ALL_BUILDERS {
        for seed in [2, 3] {
            let grid = built(name, generate, 13, 13, seed);
            for row in 0..grid.rows() - 1 {
                for col in 0..grid.cols() - 1 {
                    let p = Point::new(row, col);
                    if cell::is_path(grid.get(p)) {
                        continue;
                    }
                    for (step, mine, theirs) in pairs {
                        let neighbor = p + step;
                        if cell::is_path(grid.get(neighbor)) {
                            continue;
                        }
                        let here = cell::has_wall(grid.get(p), mine);
                        let there = cell::has_wall(grid.get(neighbor), theirs);
                        assert_eq!(
                            here, there,
                            "{name} seed {seed}: wall mismatch between {p:?} and {neighbor:?}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn perfect_builders_produce_spanning_trees() {
    for (name, generate) in PERFECT_BUILDERS {
        for (rows, cols, seed) in [(11, 11, 4), (21, 15, 5), (15, 31, 6)] {
            let grid = built(name, generate, rows, cols, seed);
            let lattice_cells = ((grid.rows() / 2) * (grid.cols() / 2)) as usize;
            let paths = path_cells(&grid);
            // n lattice cells joined by exactly n-1 opened walls.
            assert_eq!(
                paths.len(),
                lattice_cells * 2 - 1,
                "{name} {rows}x{cols}: wrong path count for a tree"
            );
            let component = reachable_from(&grid, paths[0]);
            assert_eq!(
                component.len(),
                paths.len(),
                "{name} {rows}x{cols}: path cells split into components"
            );
        }
    }
}

#[test]
fn subdivision_stays_connected() {
    for seed in [7, 8, 9] {
        let grid = built("subdivision", subdivision::generate, 17, 23, seed);
        let paths = path_cells(&grid);
        let component = reachable_from(&grid, paths[0]);
        assert_eq!(component.len(), paths.len(), "seed {seed} split the maze");
    }
}

#[test]
fn arena_is_an_open_room() {
    let grid = built("arena", arena::generate, 7, 7, 0);
    let interior = (grid.rows() - 2) * (grid.cols() - 2);
    assert_eq!(path_cells(&grid).len(), interior as usize);
}

#[test]
fn cross_modification_cuts_through_a_subdivided_maze() {
    let grid = built("subdivision", subdivision::generate, 9, 15, 10);
    maze_build::mods::add_cross(&grid);
    let mid_row = grid.rows() / 2;
    let mid_col = grid.cols() / 2;
    for col in 2..grid.cols() - 2 {
        assert!(
            cell::is_path(grid.get(Point::new(mid_row, col))),
            "cross left the middle row blocked at col {col}"
        );
    }
    for row in 2..grid.rows() - 2 {
        assert!(
            cell::is_path(grid.get(Point::new(row, mid_col))),
            "cross left the middle column blocked at row {row}"
        );
    }
    // Carving shortcuts must never breach the outer frame.
    for col in 0..grid.cols() {
        assert!(!cell::is_path(grid.get(Point::new(0, col))));
        assert!(!cell::is_path(grid.get(Point::new(grid.rows() - 1, col))));
    }
}

#[test]
fn fixed_seed_reproduces_identical_grids() {
    for (name, generate) in ALL_BUILDERS {
        let first = built(name, generate, 15, 19, 1234);
        let second = built(name, generate, 15, 19, 1234);
        for row in 0..first.rows() {
            for col in 0..first.cols() {
                let p = Point::new(row, col);
                assert_eq!(
                    first.get(p),
                    second.get(p),
                    "{name}: cell {p:?} differs between identically seeded runs"
                );
            }
        }
    }
}
