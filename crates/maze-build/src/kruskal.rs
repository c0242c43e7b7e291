//! Randomized Kruskal. Shuffle every wall separating two lattice cells,
//! then knock a wall down exactly when the disjoint set says the cells on
//! either side are not yet connected.

use ahash::AHashMap;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use maze_core::{Grid, Point, Speed};
use maze_render as render;

use crate::disjoint_set::DisjointSet;
use crate::util;

/// All between-cell walls: even columns on odd rows separate left/right
/// pairs, even rows on odd columns separate above/below pairs.
fn load_shuffled_walls(grid: &Grid, rng: &mut StdRng) -> Vec<Point> {
    let mut walls = Vec::new();
    let mut row = 1;
    while row < grid.rows() - 1 {
        let mut col = 2;
        while col < grid.cols() - 1 {
            walls.push(Point::new(row, col));
            col += 2;
        }
        row += 2;
    }
    let mut row = 2;
    while row < grid.rows() - 1 {
        let mut col = 1;
        while col < grid.cols() - 1 {
            walls.push(Point::new(row, col));
            col += 2;
        }
        row += 2;
    }
    walls.shuffle(rng);
    walls
}

/// Dense ids for the odd-cell lattice, assigned in scan order.
fn tag_cells(grid: &Grid) -> AHashMap<Point, usize> {
    let mut ids = AHashMap::new();
    let mut id = 0;
    let mut row = 1;
    while row < grid.rows() - 1 {
        let mut col = 1;
        while col < grid.cols() - 1 {
            ids.insert(Point::new(row, col), id);
            id += 1;
            col += 2;
        }
        row += 2;
    }
    ids
}

fn wall_endpoints(wall: Point) -> (Point, Point) {
    if wall.row % 2 == 0 {
        (
            Point::new(wall.row - 1, wall.col),
            Point::new(wall.row + 1, wall.col),
        )
    } else {
        (
            Point::new(wall.row, wall.col - 1),
            Point::new(wall.row, wall.col + 1),
        )
    }
}

pub fn generate(grid: &Grid, rng: &mut StdRng) -> Result<()> {
    util::fill_with_walls(grid);
    let walls = load_shuffled_walls(grid, rng);
    let ids = tag_cells(grid);
    let mut sets = DisjointSet::new(ids.len());
    for wall in walls {
        let (a, b) = wall_endpoints(wall);
        if sets.made_union(ids[&a], ids[&b]) {
            util::join_squares(grid, a, b);
        }
    }
    render::clear_and_flush_frame(grid)
}

pub fn animate(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<()> {
    let unit = speed.build_unit();
    util::fill_with_walls_animated(grid)?;
    render::clear_and_flush_frame(grid)?;
    let walls = load_shuffled_walls(grid, rng);
    let ids = tag_cells(grid);
    let mut sets = DisjointSet::new(ids.len());
    for wall in walls {
        let (a, b) = wall_endpoints(wall);
        if sets.made_union(ids[&a], ids[&b]) {
            util::join_squares_animated(grid, a, b, unit)?;
        }
    }
    Ok(())
}
