//! Randomized Prim over lazily assigned cell weights. Every cell draws a
//! random cost the first time the frontier sees it; the frontier is a
//! min-heap and each pop connects the cheapest unreached neighbor.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::Rng;

use maze_core::cell::BUILDER_BIT;
use maze_core::point::BUILD_STEPS;
use maze_core::{Grid, Point, Speed};
use maze_render as render;

use crate::util;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PriorityCell {
    priority: i32,
    cell: Point,
}

fn pick_random_odd_point(grid: &Grid, rng: &mut StdRng) -> Point {
    let row = rng.gen_range(1..=(grid.rows() - 2) / 2);
    let col = rng.gen_range(1..=(grid.cols() - 2) / 2);
    Point::new(2 * row + 1, 2 * col + 1)
}

fn grow(
    grid: &Grid,
    rng: &mut StdRng,
    mut join: impl FnMut(&Grid, Point, Point) -> Result<()>,
) -> Result<()> {
    let mut cell_cost: AHashMap<Point, i32> = AHashMap::new();
    let start = pick_random_odd_point(grid, rng);
    let mut cells: BinaryHeap<Reverse<PriorityCell>> = BinaryHeap::new();
    let start_cost = *cell_cost.entry(start).or_insert(0);
    cells.push(Reverse(PriorityCell {
        priority: start_cost,
        cell: start,
    }));
    while let Some(&Reverse(top)) = cells.peek() {
        let cur = top.cell;
        grid.set_bits(cur, BUILDER_BIT);
        let mut min_neighbor: Option<(Point, i32)> = None;
        for step in BUILD_STEPS {
            let next = cur + step;
            if !util::can_build_new_square(grid, next) {
                continue;
            }
            // Costs are drawn on demand; the entry API only rolls for
            // cells the frontier has never inspected.
            let weight = *cell_cost
                .entry(next)
                .or_insert_with(|| rng.gen_range(0..=100));
            if min_neighbor.is_none_or(|(_, best)| weight < best) {
                min_neighbor = Some((next, weight));
            }
        }
        match min_neighbor {
            Some((next, weight)) => {
                join(grid, cur, next)?;
                cells.push(Reverse(PriorityCell {
                    priority: weight,
                    cell: next,
                }));
            }
            None => {
                cells.pop();
            }
        }
    }
    Ok(())
}

pub fn generate(grid: &Grid, rng: &mut StdRng) -> Result<()> {
    util::fill_with_walls(grid);
    grow(grid, rng, |g, cur, next| {
        util::join_squares(g, cur, next);
        Ok(())
    })?;
    render::clear_and_flush_frame(grid)
}

pub fn animate(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<()> {
    let unit = speed.build_unit();
    util::fill_with_walls_animated(grid)?;
    render::clear_and_flush_frame(grid)?;
    grow(grid, rng, |g, cur, next| {
        util::join_squares_animated(g, cur, next, unit)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::{cell, WallStyle};
    use rand::SeedableRng;

    #[test]
    fn spans_every_odd_cell_exactly_once() {
        let grid = Grid::new(21, 21, WallStyle::Sharp);
        let mut rng = StdRng::seed_from_u64(13);
        generate(&grid, &mut rng).unwrap();
        let mut cells = 0;
        let mut row = 1;
        while row < grid.rows() {
            let mut col = 1;
            while col < grid.cols() {
                assert!(cell::is_path(grid.get(Point::new(row, col))));
                cells += 1;
                col += 2;
            }
            row += 2;
        }
        let path_squares = (0..grid.rows())
            .flat_map(|r| (0..grid.cols()).map(move |c| Point::new(r, c)))
            .filter(|&p| cell::is_path(grid.get(p)))
            .count();
        assert_eq!(path_squares, cells + (cells - 1));
    }
}
